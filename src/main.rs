// 该文件是 Biaozhu （标注） 项目的一部分。
// src/main.rs - 项目主程序
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

mod args;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use biaozhu::{
  FromUrl,
  annotation::Task,
  input::RepoImageSource,
  model::RecordModel,
  output::OutputWrapper,
  setup::{PredictionConfig, Setup},
  task::{BatchPrediction, Pipeline},
};

fn main() -> Result<()> {
  // .env 中的 DAGSHUB_* 变量需要在解析参数之前加载
  dotenv::dotenv().ok();
  tracing_subscriber::fmt::init();

  let args = args::Args::parse();

  info!("标注配置: {}", args.label_config.display());
  info!("任务列表: {}", args.tasks.display());
  info!("检测模型: {}", args.model);
  info!("仓库: {}/{}", args.repo.owner, args.repo.repo);

  let label_schema = std::fs::read_to_string(&args.label_config)
    .with_context(|| format!("无法读取标注配置: {}", args.label_config.display()))?;
  let setup = Setup {
    project: args.project.clone(),
    label_schema,
    hostname: args.hostname.clone(),
    access_token: args.access_token.clone(),
  };
  let config = PredictionConfig::from_setup(&setup)?;

  let tasks: Vec<Task> = {
    let content = std::fs::read_to_string(&args.tasks)
      .with_context(|| format!("无法读取任务列表: {}", args.tasks.display()))?;
    serde_json::from_str(&content)
      .with_context(|| format!("任务列表格式错误: {}", args.tasks.display()))?
  };

  let source = RepoImageSource::new(args.repo.clone())?;
  let model = RecordModel::from_url(&args.model)?;
  let output = match &args.output {
    Some(url) => OutputWrapper::from_url(url)?,
    None => OutputWrapper::sender(&args.repo)?,
  };

  let summary = BatchPrediction::new(&config).run(&tasks, &source, &model, &output)?;

  info!(
    "处理完成: {} 个任务, {} 个标注, {} 个未被接受",
    summary.tasks, summary.predictions, summary.rejected
  );

  Ok(())
}
