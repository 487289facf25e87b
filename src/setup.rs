// 该文件是 Biaozhu （标注） 项目的一部分。
// src/setup.rs - 标注工具初始化信息
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

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::schema::{ParsedSchema, SchemaError, parse_label_config};

pub const MODEL_VERSION: &str = "0.1";
pub const DEFAULT_IMAGE_KEY: &str = "image";

#[derive(Error, Debug)]
pub enum SetupError {
  #[error("标注配置错误: {0}")]
  SchemaError(#[from] SchemaError),
  #[error("标注配置中没有任何控件")]
  EmptySchema,
  #[error("控件 {0} 没有指定目标对象")]
  MissingTarget(String),
}

/// 标注工具在初始化时发送的信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setup {
  pub project: String,
  pub label_schema: String,
  #[serde(default)]
  pub hostname: Option<String>,
  #[serde(default)]
  pub access_token: Option<String>,
}

/// 由 [`Setup`] 生成的推理配置，构造后不再修改
#[derive(Debug, Clone)]
pub struct PredictionConfig {
  pub project: String,
  pub hostname: Option<String>,
  pub access_token: Option<String>,
  pub from_name: String,
  pub to_name: String,
  pub labels: Vec<String>,
  /// 任务数据中图像引用所在的键
  pub image_key: String,
  pub model_version: String,
  pub schema: ParsedSchema,
}

impl PredictionConfig {
  /// 取标注配置中的第一个控件作为预测目标
  pub fn from_setup(setup: &Setup) -> Result<Self, SetupError> {
    let schema = parse_label_config(&setup.label_schema)?;

    let (from_name, control) = schema.first().ok_or(SetupError::EmptySchema)?;
    let to_name = control
      .to_name
      .first()
      .cloned()
      .ok_or_else(|| SetupError::MissingTarget(from_name.to_string()))?;
    let image_key = control
      .inputs
      .first()
      .map(|input| input.value.clone())
      .unwrap_or_else(|| DEFAULT_IMAGE_KEY.to_string());

    info!(
      "项目 {} 初始化: {} -> {}, 标签: {:?}",
      setup.project, from_name, to_name, control.labels
    );

    Ok(PredictionConfig {
      project: setup.project.clone(),
      hostname: setup.hostname.clone(),
      access_token: setup.access_token.clone(),
      from_name: from_name.to_string(),
      to_name,
      labels: control.labels.clone(),
      image_key,
      model_version: MODEL_VERSION.to_string(),
      schema,
    })
  }

  pub fn label(&self, class_id: u32) -> Option<&str> {
    self.labels.get(class_id as usize).map(String::as_str)
  }
}
