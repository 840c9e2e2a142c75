//! # 错误类型
//!
//! 核心模块 (`steganography`, `crypto`, `payload`) 的所有失败都以
//! [`StegoError`] 返回，由命令处理层附加上下文后呈现给用户。

use std::string::FromUtf8Error;
use thiserror::Error;

/// 核心操作的结果类型。
pub type Result<T> = std::result::Result<T, StegoError>;

/// 隐写、加密与帧解析过程中可能出现的错误。
#[derive(Error, Debug)]
pub enum StegoError {
    /// 载荷位数超过图像容量，嵌入前检查，图像未被修改。
    #[error("payload needs {required_bits} bits but the image only has {available_bits}")]
    CapacityExceeded {
        required_bits: u64,
        available_bits: usize,
    },

    /// 长度头声明的数据超出图像容量，图像损坏或不含隐藏数据。
    #[error("length header declares {required_bits} bits but the image only has {available_bits}")]
    CorruptHeader {
        required_bits: u64,
        available_bits: usize,
    },

    /// 加密数据块短于盐长度。
    #[error("encrypted blob is {len} bytes, shorter than its salt")]
    MalformedBlob { len: usize },

    /// 密码错误或密文被篡改，两者刻意不作区分。
    #[error("authentication failed")]
    AuthenticationFailed,

    /// 加密提供者拒绝加密。
    #[error("encryption failed")]
    EncryptionFailed,

    #[error("framed payload is {len} bytes, too short for the filename length field")]
    TruncatedHeader { len: usize },

    #[error("filename length {declared} exceeds the {available} bytes that follow")]
    TruncatedBody { declared: usize, available: usize },

    #[error("filename is {len} bytes, the limit is 65535")]
    FilenameTooLong { len: usize },

    #[error("embedded filename is not valid UTF-8")]
    InvalidFilenameEncoding(#[from] FromUtf8Error),
}
