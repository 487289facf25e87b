// 该文件是 Biaozhu （标注） 项目的一部分。
// src/output.rs - 标注结果输出
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
use url::Url;

use crate::FromUrl;
#[cfg(feature = "folder_output")]
use crate::FromUrlWithScheme;
use crate::annotation::PredictionEnvelope;
use crate::config::RepoConfig;

/// 单次投递的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
  /// 标注工具返回 200
  Accepted,
  /// 标注工具返回了其他状态码，已记录警告
  Rejected(u16),
  /// 已写入本地文件
  Stored(PathBuf),
}

pub trait Deliver {
  type Error;
  fn deliver(&self, envelope: &PredictionEnvelope) -> Result<DeliveryStatus, Self::Error>;
}

mod prediction_sender;
pub use self::prediction_sender::{PredictionSender, SenderError};

#[cfg(feature = "folder_output")]
mod folder_output;
#[cfg(feature = "folder_output")]
pub use self::folder_output::{FolderOutput, FolderOutputError};

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("标注回传错误: {0}")]
  SenderError(#[from] SenderError),
  #[cfg(feature = "folder_output")]
  #[error("目录输出错误: {0}")]
  FolderOutputError(#[from] FolderOutputError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

pub enum OutputWrapper {
  PredictionSender(PredictionSender),
  #[cfg(feature = "folder_output")]
  FolderOutput(FolderOutput),
}

impl OutputWrapper {
  /// 回传到 DagsHub 上的标注工具
  pub fn sender(config: &RepoConfig) -> Result<Self, OutputError> {
    Ok(OutputWrapper::PredictionSender(PredictionSender::new(
      config,
    )?))
  }
}

impl FromUrl for OutputWrapper {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      #[cfg(feature = "folder_output")]
      FolderOutput::SCHEME => {
        let output = FolderOutput::from_url(url)?;
        Ok(OutputWrapper::FolderOutput(output))
      }
      _ => Err(OutputError::SchemeMismatch),
    }
  }
}

impl Deliver for OutputWrapper {
  type Error = OutputError;

  fn deliver(&self, envelope: &PredictionEnvelope) -> Result<DeliveryStatus, Self::Error> {
    match self {
      OutputWrapper::PredictionSender(output) => {
        output.deliver(envelope).map_err(OutputError::from)
      }
      #[cfg(feature = "folder_output")]
      OutputWrapper::FolderOutput(output) => output.deliver(envelope).map_err(OutputError::from),
    }
  }
}
