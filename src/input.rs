// 该文件是 Biaozhu （标注） 项目的一部分。
// src/input.rs - 仓库图像输入
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

use reqwest::blocking::Client;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, error, info};
use url::Url;

use crate::{
  config::{ConfigError, RepoConfig},
  frame::Frame,
};

/// 仓库内图像引用的方案，形如 `repo://<branch>/<path>`
pub const REPO_SCHEME: &str = "repo://";
/// 引用不带分支时使用的分支
pub const DEFAULT_BRANCH: &str = "main";

#[derive(Error, Debug)]
pub enum InputError {
  #[error("无效的图像引用: {0}")]
  InvalidReference(String),
  #[error("URL 错误: {0}")]
  ConfigError(#[from] ConfigError),
  #[error("HTTP 请求错误: {0}")]
  RequestError(#[from] reqwest::Error),
  #[error("下载 {url} 失败，状态码: {status}")]
  StatusError {
    url: Url,
    status: reqwest::StatusCode,
  },
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像解码错误: {0}")]
  ImageError(#[from] image::ImageError),
}

pub trait ImageSource {
  type Error;
  fn load(&self, reference: &str) -> Result<Frame, Self::Error>;
}

/// 将任务中的图像引用解析为可下载的 URL
///
/// - `repo://<branch>/<path>` 指向仓库原始文件接口
/// - `http://` 与 `https://` 原样返回
/// - 其余视为默认分支下的相对路径
pub fn resolve_image_url(reference: &str, config: &RepoConfig) -> Result<Url, InputError> {
  if let Some(rest) = reference.strip_prefix(REPO_SCHEME) {
    let (branch, path) = rest
      .split_once('/')
      .filter(|(branch, path)| !branch.is_empty() && !path.is_empty())
      .ok_or_else(|| InputError::InvalidReference(reference.to_string()))?;
    return Ok(config.raw_url(branch, path)?);
  }

  if let Ok(url) = Url::parse(reference) {
    return match url.scheme() {
      "http" | "https" => Ok(url),
      _ => Err(InputError::InvalidReference(reference.to_string())),
    };
  }

  let path = reference.trim_start_matches('/');
  if path.is_empty() {
    return Err(InputError::InvalidReference(reference.to_string()));
  }
  Ok(config.raw_url(DEFAULT_BRANCH, path)?)
}

/// 使用仓库凭据下载并解码图像
pub struct RepoImageSource {
  config: RepoConfig,
  client: Client,
}

impl RepoImageSource {
  pub fn new(config: RepoConfig) -> Result<Self, InputError> {
    let client = config.http_client()?;
    Ok(Self { config, client })
  }

  fn download(&self, url: &Url) -> Result<NamedTempFile, InputError> {
    info!("下载图像: {}", url);
    let mut response = self
      .client
      .get(url.clone())
      .basic_auth(&self.config.user, Some(&self.config.token))
      .send()?;

    let status = response.status();
    if !status.is_success() {
      error!("下载图像失败: {} ({})", url, status);
      return Err(InputError::StatusError {
        url: url.clone(),
        status,
      });
    }

    let mut file = NamedTempFile::new()?;
    let size = response.copy_to(&mut file)?;
    debug!("图像已保存到 {} ({} 字节)", file.path().display(), size);
    Ok(file)
  }
}

impl ImageSource for RepoImageSource {
  type Error = InputError;

  fn load(&self, reference: &str) -> Result<Frame, Self::Error> {
    let url = resolve_image_url(reference, &self.config)?;
    let file = self.download(&url)?;
    let frame = Frame::open(reference, file.path())?;
    debug!("图像尺寸: {}x{}", frame.width(), frame.height());
    Ok(frame)
  }
}
