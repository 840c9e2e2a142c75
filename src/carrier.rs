//! # 载体图像读写
//!
//! 图像统一转换为 8 位 RGB；其扁平缓冲区 (行优先、通道交错)
//! 即隐写使用的像素通道序列。只编译了无损编码器，有损目标格式会被拒绝。

use anyhow::{Context, Result};
use colored::Colorize;
use image::RgbImage;
use log::debug;
use std::path::Path;

/// 读取并解码载体图像。
pub fn load(path: &Path) -> Result<RgbImage> {
    let image = image::open(path)
        .with_context(|| {
            format!(
                "Unable to read image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?
        .to_rgb8();

    debug!(
        "Loaded {}x{} image with {} channel bytes",
        image.width(),
        image.height(),
        image.len()
    );
    Ok(image)
}

/// 按输出路径的扩展名编码并写入图像。
pub fn save(image: &RgbImage, path: &Path) -> Result<()> {
    image.save(path).with_context(|| {
        format!(
            "Unable to write to target image file: {}. \nUse a lossless format such as PNG or BMP.",
            path.to_string_lossy().red().bold()
        )
    })
}
