// 该文件是 Biaozhu （标注） 项目的一部分。
// src/task.rs - 批量预测流程
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

use std::error::Error as StdError;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
  annotation::{AnnotationError, PredictionEnvelope, Task},
  frame::Frame,
  input::ImageSource,
  model::{DetectResult, Model},
  output::{Deliver, DeliveryStatus},
  setup::PredictionConfig,
};

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum PredictError {
  #[error("任务 {task_id} 图像读取失败: {source}")]
  Input { task_id: u64, source: BoxError },
  #[error("任务 {task_id} 推理失败: {source}")]
  Model { task_id: u64, source: BoxError },
  #[error("标注转换失败: {0}")]
  Annotation(#[from] AnnotationError),
  #[error("任务 {task_id} 结果输出失败: {source}")]
  Output { task_id: u64, source: BoxError },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
  pub tasks: usize,
  pub predictions: usize,
  /// 标注工具返回非 200 的任务数
  pub rejected: usize,
}

pub trait Pipeline<S, M, O> {
  type Error;
  fn run(
    &self,
    tasks: &[Task],
    source: &S,
    model: &M,
    output: &O,
  ) -> Result<BatchSummary, Self::Error>;
}

/// 逐个处理任务，任一任务出错即中止整批
pub struct BatchPrediction<'a> {
  config: &'a PredictionConfig,
}

impl<'a> BatchPrediction<'a> {
  pub fn new(config: &'a PredictionConfig) -> Self {
    Self { config }
  }
}

impl<
  SE: StdError + Send + Sync + 'static,
  ME: StdError + Send + Sync + 'static,
  OE: StdError + Send + Sync + 'static,
  S: ImageSource<Error = SE>,
  M: Model<Input = Frame, Output = DetectResult, Error = ME>,
  O: Deliver<Error = OE>,
> Pipeline<S, M, O> for BatchPrediction<'_>
{
  type Error = PredictError;

  fn run(
    &self,
    tasks: &[Task],
    source: &S,
    model: &M,
    output: &O,
  ) -> Result<BatchSummary, Self::Error> {
    info!("开始处理 {} 个任务...", tasks.len());
    let mut summary = BatchSummary::default();

    for task in tasks {
      let reference = task.image_reference(&self.config.image_key)?;
      let frame = source.load(reference).map_err(|e| PredictError::Input {
        task_id: task.id,
        source: Box::new(e),
      })?;

      let now = std::time::Instant::now();
      let result = model.infer(&frame).map_err(|e| PredictError::Model {
        task_id: task.id,
        source: Box::new(e),
      })?;
      info!(
        "任务 {} 推理完成，检测到 {} 个对象，耗时: {:.2?}",
        task.id,
        result.len(),
        now.elapsed()
      );

      let envelope = PredictionEnvelope::build(
        task.id,
        (frame.width(), frame.height()),
        &result,
        self.config,
      )?;

      let status = output.deliver(&envelope).map_err(|e| PredictError::Output {
        task_id: task.id,
        source: Box::new(e),
      })?;
      if let DeliveryStatus::Rejected(code) = status {
        warn!("任务 {} 的结果未被接受 ({})，继续处理后续任务", task.id, code);
        summary.rejected += 1;
      }

      summary.tasks += 1;
      summary.predictions += envelope.predictions.len();
    }

    info!(
      "任务完成: {} 个任务, {} 个标注, {} 个被拒绝",
      summary.tasks, summary.predictions, summary.rejected
    );
    Ok(summary)
  }
}
