// 该文件是 Biaozhu （标注） 项目的一部分。
// src/model.rs - 检测模型接口
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

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// 模型输出的单个检测框，坐标单位为像素
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
  pub cx: f64,
  pub cy: f64,
  pub width: f64,
  pub height: f64,
  pub confidence: f64,
  pub class_id: u32,
}

impl Detection {
  pub fn new(cx: f64, cy: f64, width: f64, height: f64, confidence: f64, class_id: u32) -> Self {
    Self {
      cx,
      cy,
      width,
      height,
      confidence,
      class_id,
    }
  }

  /// 由左上、右下角点构造
  pub fn from_corners(bbox: [f64; 4], confidence: f64, class_id: u32) -> Self {
    let [xmin, ymin, xmax, ymax] = bbox;
    Self::new(
      (xmin + xmax) / 2.0,
      (ymin + ymax) / 2.0,
      xmax - xmin,
      ymax - ymin,
      confidence,
      class_id,
    )
  }
}

#[derive(Debug, Clone, Default)]
pub struct DetectResult {
  pub items: Box<[Detection]>,
}

impl DetectResult {
  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
    self.items.iter()
  }
}

impl From<Vec<Detection>> for DetectResult {
  fn from(items: Vec<Detection>) -> Self {
    Self {
      items: items.into_boxed_slice(),
    }
  }
}

#[cfg(feature = "record_model")]
mod record;
#[cfg(feature = "record_model")]
pub use self::record::{RecordModel, RecordModelError};
