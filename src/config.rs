// 该文件是 Biaozhu （标注） 项目的一部分。
// src/config.rs - DagsHub 仓库访问配置
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

use std::time::Duration;

use clap::Args;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://dagshub.com";

pub const ENV_USER_NAME: &str = "DAGSHUB_USER_NAME";
pub const ENV_TOKEN: &str = "DAGSHUB_TOKEN";
pub const ENV_REPO_NAME: &str = "DAGSHUB_REPO_NAME";
pub const ENV_REPO_OWNER: &str = "DAGSHUB_REPO_OWNER";

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("URL 错误: {0}")]
  InvalidUrl(#[from] url::ParseError),
}

/// DagsHub 仓库访问配置
///
/// 进程启动时加载一次，下载图像与回传标注共用同一组凭据。
#[derive(Args, Debug, Clone)]
pub struct RepoConfig {
  /// DagsHub 用户名
  #[arg(long, env = ENV_USER_NAME, value_name = "USER")]
  pub user: String,

  /// DagsHub 访问令牌
  #[arg(long, env = ENV_TOKEN, value_name = "TOKEN", hide_env_values = true)]
  pub token: String,

  /// 仓库名称
  #[arg(long, env = ENV_REPO_NAME, value_name = "REPO")]
  pub repo: String,

  /// 仓库所有者
  #[arg(long, env = ENV_REPO_OWNER, value_name = "OWNER")]
  pub owner: String,

  /// DagsHub 服务地址
  #[arg(long, default_value = DEFAULT_BASE_URL, value_name = "URL")]
  pub base_url: Url,

  /// HTTP 请求超时（秒），不设置则一直等待
  #[arg(long, value_name = "SECONDS")]
  pub timeout_secs: Option<u64>,
}

impl RepoConfig {
  /// 以 `/` 结尾的服务地址，保证 `join` 追加而不是替换最后一段
  fn base(&self) -> Url {
    let mut base = self.base_url.clone();
    if !base.path().ends_with('/') {
      let path = format!("{}/", base.path());
      base.set_path(&path);
    }
    base
  }

  /// 标注回传地址：`<base>/<owner>/<repo>/annotations/git/api/predictions/`
  pub fn predictions_url(&self) -> Result<Url, ConfigError> {
    let path = format!(
      "{}/{}/annotations/git/api/predictions/",
      urlencoding::encode(&self.owner),
      urlencoding::encode(&self.repo)
    );
    Ok(self.base().join(&path)?)
  }

  /// 仓库原始文件地址：`<base>/api/v1/repos/<owner>/<repo>/raw/<branch>/<path>`
  pub fn raw_url(&self, branch: &str, path: &str) -> Result<Url, ConfigError> {
    let segments = std::iter::once(branch)
      .chain(path.split('/'))
      .filter(|s| !s.is_empty())
      .map(|s| urlencoding::encode(s).into_owned())
      .collect::<Vec<_>>()
      .join("/");

    let path = format!(
      "api/v1/repos/{}/{}/raw/{}",
      urlencoding::encode(&self.owner),
      urlencoding::encode(&self.repo),
      segments
    );
    Ok(self.base().join(&path)?)
  }

  pub fn http_client(&self) -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
      .timeout(self.timeout_secs.map(Duration::from_secs))
      .build()
  }
}
