// 该文件是 Biaozhu （标注） 项目的一部分。
// src/annotation.rs - 任务与标注结果格式
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
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
  model::{DetectResult, Detection},
  setup::{DEFAULT_IMAGE_KEY, PredictionConfig},
};

pub const RECTANGLE_LABELS: &str = "rectanglelabels";

#[derive(Error, Debug)]
pub enum AnnotationError {
  #[error("任务 {task_id} 的数据中没有图像引用 {key:?}")]
  MissingImage { task_id: u64, key: String },
  #[error("类别编号 {class_id} 超出标签范围（共 {labels} 个标签）")]
  LabelOutOfRange { class_id: u32, labels: usize },
}

/// 标注工具下发的单个任务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
  pub id: u64,
  #[serde(default)]
  pub data: Map<String, Value>,
}

impl Task {
  /// 先按标注配置中的键查找，找不到时回退到 `image`
  pub fn image_reference(&self, key: &str) -> Result<&str, AnnotationError> {
    self
      .data
      .get(key)
      .or_else(|| self.data.get(DEFAULT_IMAGE_KEY))
      .and_then(Value::as_str)
      .ok_or_else(|| AnnotationError::MissingImage {
        task_id: self.id,
        key: key.to_string(),
      })
  }
}

/// 以图像宽高百分比表示的矩形框
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleValue {
  pub rectanglelabels: Vec<String>,
  pub x: f64,
  pub y: f64,
  pub width: f64,
  pub height: f64,
}

impl RectangleValue {
  /// 中心点坐标转换为左上角坐标并按图像尺寸归一化，不做截断
  pub fn from_detection(detection: &Detection, label: &str, image_w: u32, image_h: u32) -> Self {
    let (image_w, image_h) = (image_w as f64, image_h as f64);
    Self {
      rectanglelabels: vec![label.to_string()],
      x: 100.0 * (detection.cx - detection.width / 2.0) / image_w,
      y: 100.0 * (detection.cy - detection.height / 2.0) / image_h,
      width: 100.0 * detection.width / image_w,
      height: 100.0 * detection.height / image_h,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
  pub from_name: String,
  pub to_name: String,
  #[serde(rename = "type")]
  pub kind: String,
  pub value: RectangleValue,
  pub score: f64,
}

/// 单个任务回传给标注工具的完整结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionEnvelope {
  pub task_id: u64,
  pub predictions: Vec<AnnotationRecord>,
  pub model_version: String,
  /// 最低置信度，仅在低于 1.0 时出现
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub score: Option<f64>,
}

impl PredictionEnvelope {
  pub fn build(
    task_id: u64,
    image_size: (u32, u32),
    result: &DetectResult,
    config: &PredictionConfig,
  ) -> Result<Self, AnnotationError> {
    let (image_w, image_h) = image_size;
    let mut lowest: Option<f64> = None;
    let mut predictions = Vec::with_capacity(result.len());

    for detection in result.iter() {
      let label = config
        .label(detection.class_id)
        .ok_or(AnnotationError::LabelOutOfRange {
          class_id: detection.class_id,
          labels: config.labels.len(),
        })?;

      lowest = Some(lowest.map_or(detection.confidence, |l| l.min(detection.confidence)));

      predictions.push(AnnotationRecord {
        from_name: config.from_name.clone(),
        to_name: config.to_name.clone(),
        kind: RECTANGLE_LABELS.to_string(),
        value: RectangleValue::from_detection(detection, label, image_w, image_h),
        score: detection.confidence,
      });
    }

    Ok(PredictionEnvelope {
      task_id,
      predictions,
      model_version: config.model_version.clone(),
      score: lowest.filter(|&l| l < 1.0),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::setup::tests::cat_dog_setup;

  fn config() -> PredictionConfig {
    PredictionConfig::from_setup(&cat_dog_setup()).unwrap()
  }

  #[test]
  fn normalizes_to_percentages() {
    let det = Detection::new(100.0, 50.0, 40.0, 20.0, 0.9, 0);
    let value = RectangleValue::from_detection(&det, "cat", 200, 100);
    assert_eq!(value.x, 40.0);
    assert_eq!(value.y, 40.0);
    assert_eq!(value.width, 20.0);
    assert_eq!(value.height, 20.0);
    assert_eq!(value.rectanglelabels, vec!["cat"]);
  }

  #[test]
  fn out_of_bounds_boxes_are_not_clamped() {
    let det = Detection::new(0.0, 0.0, 40.0, 20.0, 0.9, 0);
    let value = RectangleValue::from_detection(&det, "cat", 200, 100);
    assert_eq!(value.x, -10.0);
    assert_eq!(value.y, -10.0);
  }

  #[test]
  fn aggregate_score_is_lowest_confidence() {
    let result = DetectResult::from(vec![
      Detection::new(100.0, 50.0, 40.0, 20.0, 0.95, 0),
      Detection::new(50.0, 50.0, 10.0, 10.0, 0.99, 1),
    ]);
    let envelope = PredictionEnvelope::build(3, (200, 100), &result, &config()).unwrap();
    assert_eq!(envelope.score, Some(0.95));
    assert_eq!(envelope.predictions.len(), 2);
  }

  #[test]
  fn fully_confident_task_omits_score() {
    let result = DetectResult::from(vec![Detection::new(10.0, 10.0, 4.0, 4.0, 1.0, 1)]);
    let envelope = PredictionEnvelope::build(3, (200, 100), &result, &config()).unwrap();
    assert_eq!(envelope.score, None);
    assert_eq!(envelope.predictions[0].score, 1.0);

    let json = serde_json::to_value(&envelope).unwrap();
    assert!(json.get("score").is_none());
  }

  #[test]
  fn empty_result_has_no_score() {
    let envelope =
      PredictionEnvelope::build(4, (200, 100), &DetectResult::default(), &config()).unwrap();
    assert!(envelope.predictions.is_empty());
    assert_eq!(envelope.score, None);
  }

  #[test]
  fn class_index_maps_to_label_in_order() {
    let result = DetectResult::from(vec![
      Detection::new(10.0, 10.0, 4.0, 4.0, 0.5, 1),
      Detection::new(10.0, 10.0, 4.0, 4.0, 0.5, 0),
    ]);
    let envelope = PredictionEnvelope::build(1, (200, 100), &result, &config()).unwrap();
    assert_eq!(envelope.predictions[0].value.rectanglelabels, vec!["dog"]);
    assert_eq!(envelope.predictions[1].value.rectanglelabels, vec!["cat"]);
  }

  #[test]
  fn class_index_out_of_range_fails() {
    let result = DetectResult::from(vec![Detection::new(10.0, 10.0, 4.0, 4.0, 0.5, 2)]);
    let err = PredictionEnvelope::build(1, (200, 100), &result, &config()).unwrap_err();
    assert!(matches!(
      err,
      AnnotationError::LabelOutOfRange {
        class_id: 2,
        labels: 2
      }
    ));
  }

  #[test]
  fn envelope_serializes_in_tool_schema() {
    let result = DetectResult::from(vec![Detection::new(100.0, 50.0, 40.0, 20.0, 0.5, 0)]);
    let envelope = PredictionEnvelope::build(9, (200, 100), &result, &config()).unwrap();
    let json = serde_json::to_value(&envelope).unwrap();

    assert_eq!(
      json,
      serde_json::json!({
        "task_id": 9,
        "predictions": [{
          "from_name": "label",
          "to_name": "Image",
          "type": "rectanglelabels",
          "value": {
            "rectanglelabels": ["cat"],
            "x": 40.0,
            "y": 40.0,
            "width": 20.0,
            "height": 20.0
          },
          "score": 0.5
        }],
        "model_version": "0.1",
        "score": 0.5
      })
    );
  }

  #[test]
  fn raw_confidence_keeps_double_precision() {
    let confidence = 0.123_456_789_012_345_6;
    let result = DetectResult::from(vec![Detection::new(10.0, 10.0, 4.0, 4.0, confidence, 0)]);
    let envelope = PredictionEnvelope::build(1, (3, 7), &result, &config()).unwrap();
    assert_eq!(envelope.predictions[0].score, confidence);
    assert_eq!(envelope.score, Some(confidence));
    assert_eq!(envelope.predictions[0].value.y, 100.0 * 8.0 / 7.0);

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["predictions"][0]["score"].as_f64(), Some(confidence));
  }

  #[test]
  fn image_key_falls_back_to_image() {
    let task: Task =
      serde_json::from_str(r#"{"id": 1, "data": {"image": "repo://main/a.jpg"}}"#).unwrap();
    assert_eq!(task.image_reference("photo").unwrap(), "repo://main/a.jpg");

    let task: Task = serde_json::from_str(
      r#"{"id": 2, "data": {"photo": "repo://main/p.jpg", "image": "repo://main/i.jpg"}}"#,
    )
    .unwrap();
    assert_eq!(task.image_reference("photo").unwrap(), "repo://main/p.jpg");

    let task: Task = serde_json::from_str(r#"{"id": 3, "data": {"text": "x"}}"#).unwrap();
    assert!(matches!(
      task.image_reference("photo"),
      Err(AnnotationError::MissingImage { task_id: 3, key }) if key == "photo"
    ));
  }

  #[test]
  fn task_without_image_is_an_error() {
    let task: Task = serde_json::from_str(r#"{"id": 5, "data": {"text": "x"}}"#).unwrap();
    assert!(matches!(
      task.image_reference("image"),
      Err(AnnotationError::MissingImage { task_id: 5, .. })
    ));

    let task: Task =
      serde_json::from_str(r#"{"id": 6, "data": {"image": "repo://main/a.jpg"}}"#).unwrap();
    assert_eq!(task.image_reference("image").unwrap(), "repo://main/a.jpg");
  }
}
