//! # lsb_crypt 库
//!
//! 本库包含带密码保护的 LSB 隐写工具的核心逻辑：
//! 载荷帧编码、基于密码的认证加密，以及像素通道最低位的位流编解码。

// 声明库包含的所有模块。

pub mod carrier;
pub mod cli;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod handler;
pub mod payload;
pub mod steganography;

pub use error::{Result, StegoError};
