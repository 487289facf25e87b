// 该文件是 Biaozhu （标注） 项目的一部分。
// src/output/folder_output.rs - 目录记录输出
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

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::{Datelike, Utc};
use thiserror::Error;
use tracing::info;

use crate::{
  FromUrl, FromUrlWithScheme,
  annotation::PredictionEnvelope,
  output::{Deliver, DeliveryStatus},
};

#[derive(Error, Debug)]
pub enum FolderOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

/// 将结果按日期写入目录，不回传标注工具
pub struct FolderOutput {
  directory: PathBuf,
}

impl FromUrlWithScheme for FolderOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for FolderOutput {
  type Error = FolderOutputError;

  fn from_url(uri: &url::Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(FolderOutputError::SchemeMismatch);
    }

    Ok(FolderOutput {
      directory: PathBuf::from(uri.path()),
    })
  }
}

impl FolderOutput {
  pub fn new(directory: impl Into<PathBuf>) -> Self {
    Self {
      directory: directory.into(),
    }
  }

  fn envelope_path(&self, task_id: u64) -> Result<PathBuf, FolderOutputError> {
    let now = Utc::now();
    let directory = self
      .directory
      .join(now.year().to_string())
      .join(format!("{:02}", now.month()))
      .join(format!("{:02}", now.day()));
    if !directory.exists() {
      std::fs::create_dir_all(&directory)?;
    }

    Ok(directory.join(format!("{}-task-{}.json", now.format("%H-%M-%S"), task_id)))
  }
}

impl Deliver for FolderOutput {
  type Error = FolderOutputError;

  fn deliver(&self, envelope: &PredictionEnvelope) -> Result<DeliveryStatus, Self::Error> {
    let path = self.envelope_path(envelope.task_id)?;
    let writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(writer, envelope)?;
    info!("任务 {} 的结果已写入 {}", envelope.task_id, path.display());
    Ok(DeliveryStatus::Stored(path))
  }
}
