// 该文件是 Biaozhu （标注） 项目的一部分。
// src/frame.rs - 解码后的图像帧
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

use std::path::Path;

use image::{ImageReader, RgbImage};

/// 一张待推理的图像及其来源引用
#[derive(Debug, Clone)]
pub struct Frame {
  /// 任务中的原始图像引用
  pub reference: String,
  pub image: RgbImage,
}

impl Frame {
  pub fn new(reference: impl Into<String>, image: RgbImage) -> Self {
    Self {
      reference: reference.into(),
      image,
    }
  }

  /// 从本地文件解码
  pub fn open(reference: impl Into<String>, path: &Path) -> Result<Self, image::ImageError> {
    let image = ImageReader::open(path)?
      .with_guessed_format()?
      .decode()?
      .to_rgb8();
    Ok(Self::new(reference, image))
  }

  pub fn width(&self) -> u32 {
    self.image.width()
  }

  pub fn height(&self) -> u32 {
    self.image.height()
  }

  /// 引用路径中的文件名（不含扩展名）
  pub fn stem(&self) -> Option<&str> {
    let path = self.reference.rsplit(['/', '\\']).next()?;
    Path::new(path).file_stem().and_then(|s| s.to_str())
  }
}
