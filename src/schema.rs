// 该文件是 Biaozhu （标注） 项目的一部分。
// src/schema.rs - 标注配置解析
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

use roxmltree::{Document, Node};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SchemaError {
  #[error("XML 解析错误: {0}")]
  XmlError(#[from] roxmltree::Error),
  #[error("控件名称重复: {0}")]
  DuplicateControl(String),
  #[error("控件 {control} 引用了不存在的对象: {to_name}")]
  UnknownObject { control: String, to_name: String },
}

/// 控件所引用的数据对象，例如 `<Image name="image" value="$image"/>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
  pub kind: String,
  /// 任务数据中的键名（已去掉前缀 `$`）
  pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSchema {
  pub kind: String,
  pub to_name: Vec<String>,
  pub inputs: Vec<InputSpec>,
  pub labels: Vec<String>,
}

/// 控件名到控件描述的映射，保持文档顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSchema {
  controls: Vec<(String, ControlSchema)>,
}

impl ParsedSchema {
  pub fn first(&self) -> Option<(&str, &ControlSchema)> {
    self
      .controls
      .first()
      .map(|(name, schema)| (name.as_str(), schema))
  }

  pub fn get(&self, name: &str) -> Option<&ControlSchema> {
    self
      .controls
      .iter()
      .find(|(n, _)| n == name)
      .map(|(_, schema)| schema)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &ControlSchema)> {
    self
      .controls
      .iter()
      .map(|(name, schema)| (name.as_str(), schema))
  }

  pub fn len(&self) -> usize {
    self.controls.len()
  }

  pub fn is_empty(&self) -> bool {
    self.controls.is_empty()
  }
}

fn is_control(node: &Node) -> bool {
  node.is_element() && node.has_attribute("name") && node.has_attribute("toName")
}

fn control_labels(control: &Node) -> Vec<String> {
  control
    .descendants()
    .skip(1)
    .filter(|n| n.is_element())
    .filter_map(|n| n.attribute("alias").or_else(|| n.attribute("value")))
    .map(str::to_string)
    .collect()
}

fn resolve_inputs(
  doc: &Document,
  control_name: &str,
  to_name: &[String],
) -> Result<Vec<InputSpec>, SchemaError> {
  let mut inputs = Vec::with_capacity(to_name.len());
  for target in to_name {
    let object = doc
      .descendants()
      .find(|n| n.is_element() && n.attribute("name") == Some(target.as_str()))
      .ok_or_else(|| SchemaError::UnknownObject {
        control: control_name.to_string(),
        to_name: target.clone(),
      })?;

    if let Some(value) = object.attribute("value") {
      inputs.push(InputSpec {
        kind: object.tag_name().name().to_string(),
        value: value.trim_start_matches('$').to_string(),
      });
    }
  }
  Ok(inputs)
}

/// 解析 Label Studio 的 XML 标注配置
///
/// 同时带有 `name` 与 `toName` 属性的元素视为控件，控件的标签取其后代元素的
/// `value`（存在 `alias` 时取 `alias`），顺序与文档一致。
pub fn parse_label_config(config: &str) -> Result<ParsedSchema, SchemaError> {
  let doc = Document::parse(config)?;
  let mut parsed = ParsedSchema::default();

  for node in doc.descendants().filter(is_control) {
    // is_control 已保证属性存在
    let (Some(name), Some(to_name)) = (node.attribute("name"), node.attribute("toName")) else {
      continue;
    };

    if parsed.get(name).is_some() {
      return Err(SchemaError::DuplicateControl(name.to_string()));
    }

    let to_name: Vec<String> = to_name
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_string)
      .collect();
    let inputs = resolve_inputs(&doc, name, &to_name)?;
    let schema = ControlSchema {
      kind: node.tag_name().name().to_string(),
      labels: control_labels(&node),
      to_name,
      inputs,
    };

    debug!("解析到控件 {}: {:?}", name, schema);
    parsed.controls.push((name.to_string(), schema));
  }

  Ok(parsed)
}
