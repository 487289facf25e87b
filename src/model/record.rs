// 该文件是 Biaozhu （标注） 项目的一部分。
// src/model/record.rs - 离线检测记录回放模型
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::Frame,
  model::{DetectResult, Detection, Model},
};

const RECORD_FIELDS: usize = 6;

#[derive(Error, Debug)]
pub enum RecordModelError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("无法从图像引用中获得文件名: {0}")]
  MissingStem(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("记录文件 {path} 第 {line} 行格式错误: {reason}")]
  ParseError {
    path: PathBuf,
    line: usize,
    reason: String,
  },
}

/// 回放检测器预先记录的结果
///
/// 每张图像对应目录下同名的 `.txt` 文件，每行一个检测框：
/// `class_id, score, xmin, ymin, xmax, ymax`，角点坐标归一化到 [0, 1]。
/// 文件不存在表示该图像没有检测结果。
pub struct RecordModel {
  directory: PathBuf,
}

impl FromUrlWithScheme for RecordModel {
  const SCHEME: &'static str = "record";
}

impl FromUrl for RecordModel {
  type Error = RecordModelError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(RecordModelError::SchemeMismatch);
    }

    info!("使用检测记录目录: {}", url.path());
    Ok(RecordModel {
      directory: PathBuf::from(url.path()),
    })
  }
}

impl RecordModel {
  pub fn new(directory: impl Into<PathBuf>) -> Self {
    Self {
      directory: directory.into(),
    }
  }
}

fn parse_line(line: &str, width: f64, height: f64) -> Result<Detection, String> {
  let fields: Vec<&str> = line.split(',').map(str::trim).collect();
  if fields.len() != RECORD_FIELDS {
    return Err(format!(
      "期望 {} 个字段，实际 {} 个",
      RECORD_FIELDS,
      fields.len()
    ));
  }

  let class_id = fields[0]
    .parse::<u32>()
    .map_err(|e| format!("类别编号 {:?} 无效: {}", fields[0], e))?;

  let mut values = [0f64; RECORD_FIELDS - 1];
  for (value, field) in values.iter_mut().zip(&fields[1..]) {
    *value = field
      .parse::<f64>()
      .map_err(|e| format!("数值 {:?} 无效: {}", field, e))?;
  }

  let [score, xmin, ymin, xmax, ymax] = values;
  Ok(Detection::from_corners(
    [xmin * width, ymin * height, xmax * width, ymax * height],
    score,
    class_id,
  ))
}

impl Model for RecordModel {
  type Input = Frame;
  type Output = DetectResult;
  type Error = RecordModelError;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    let stem = input
      .stem()
      .ok_or_else(|| RecordModelError::MissingStem(input.reference.clone()))?;
    let path = self.directory.join(format!("{}.txt", stem));

    if !path.exists() {
      debug!("没有检测记录: {}", path.display());
      return Ok(DetectResult::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let (width, height) = (input.width() as f64, input.height() as f64);

    let mut items = Vec::new();
    for (index, line) in content.lines().enumerate() {
      if line.trim().is_empty() {
        continue;
      }
      let detection =
        parse_line(line, width, height).map_err(|reason| RecordModelError::ParseError {
          path: path.clone(),
          line: index + 1,
          reason,
        })?;
      items.push(detection);
    }

    debug!("读取到 {} 个检测结果", items.len());
    Ok(DetectResult::from(items))
  }
}
