// 该文件是 Biaozhu （标注） 项目的一部分。
// src/output/prediction_sender.rs - 标注结果回传
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

use reqwest::{StatusCode, blocking::Client};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::{
  annotation::PredictionEnvelope,
  config::{ConfigError, RepoConfig},
  output::{Deliver, DeliveryStatus},
};

#[derive(Error, Debug)]
pub enum SenderError {
  #[error("配置错误: {0}")]
  ConfigError(#[from] ConfigError),
  #[error("HTTP 请求错误: {0}")]
  TransportError(#[from] reqwest::Error),
}

/// 以 Basic 认证向标注接口 POST 结果
///
/// 非 200 状态码只记录警告，不重试；连接失败等传输错误向上返回。
pub struct PredictionSender {
  url: Url,
  user: String,
  token: String,
  client: Client,
}

impl PredictionSender {
  pub fn new(config: &RepoConfig) -> Result<Self, SenderError> {
    Ok(Self {
      url: config.predictions_url()?,
      user: config.user.clone(),
      token: config.token.clone(),
      client: config.http_client()?,
    })
  }
}

impl Deliver for PredictionSender {
  type Error = SenderError;

  fn deliver(&self, envelope: &PredictionEnvelope) -> Result<DeliveryStatus, Self::Error> {
    debug!(
      "回传任务 {} 的 {} 个标注到 {}",
      envelope.task_id,
      envelope.predictions.len(),
      self.url
    );

    let response = self
      .client
      .post(self.url.clone())
      .basic_auth(&self.user, Some(&self.token))
      .json(envelope)
      .send()?;

    let status = response.status();
    if status != StatusCode::OK {
      let body = response.text().unwrap_or_default();
      warn!(
        "任务 {} 回传失败: {} {}",
        envelope.task_id, status, body
      );
      return Ok(DeliveryStatus::Rejected(status.as_u16()));
    }

    Ok(DeliveryStatus::Accepted)
  }
}
