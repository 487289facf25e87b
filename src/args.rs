// 该文件是 Biaozhu （标注） 项目的一部分。
// src/args.rs - 项目参数配置
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

use biaozhu::config::RepoConfig;
use clap::Parser;
use url::Url;

/// Biaozhu 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// Label Studio 标注配置文件（XML）
  #[arg(long, value_name = "FILE")]
  pub label_config: PathBuf,

  /// 任务列表文件（JSON 数组）
  #[arg(long, value_name = "FILE")]
  pub tasks: PathBuf,

  /// 检测模型，例如 record:///path/to/records
  #[arg(long, value_name = "MODEL")]
  pub model: Url,

  /// 结果输出，例如 folder:///path/to/output；不设置则回传到 DagsHub
  #[arg(long, value_name = "OUTPUT")]
  pub output: Option<Url>,

  /// Label Studio 项目编号
  #[arg(long, default_value = "0", value_name = "PROJECT")]
  pub project: String,

  /// Label Studio 服务地址
  #[arg(long, value_name = "HOST")]
  pub hostname: Option<String>,

  /// Label Studio 访问令牌
  #[arg(
    long,
    env = "LABEL_STUDIO_ACCESS_TOKEN",
    value_name = "TOKEN",
    hide_env_values = true
  )]
  pub access_token: Option<String>,

  #[command(flatten)]
  pub repo: RepoConfig,
}
