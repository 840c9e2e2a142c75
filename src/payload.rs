//! # 载荷帧
//!
//! 加密前的明文格式：
//!
//! ```text
//! [2 bytes] filename_len (大端，0 表示文本消息)
//! [N bytes] filename (UTF-8)
//! [...]     content
//! ```

use crate::constants::{FILENAME_LEN_BYTES, MAX_FILENAME_LEN};
use crate::error::{Result, StegoError};

/// 解帧后的逻辑内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// 隐藏文件时的原始文件名；文本消息为 `None`。
    pub filename: Option<String>,
    pub content: Vec<u8>,
}

/// 将内容和可选文件名编码为帧。
///
/// 空文件名与 `None` 编码相同，解帧后都得到 `None`。
///
/// # Errors
///
/// 文件名的 UTF-8 编码超过 65535 字节时返回 [`StegoError::FilenameTooLong`]。
pub fn frame(content: &[u8], filename: Option<&str>) -> Result<Vec<u8>> {
    let name = filename.unwrap_or_default().as_bytes();
    if name.len() > MAX_FILENAME_LEN {
        return Err(StegoError::FilenameTooLong { len: name.len() });
    }

    let mut buffer = Vec::with_capacity(FILENAME_LEN_BYTES + name.len() + content.len());
    buffer.extend_from_slice(&(name.len() as u16).to_be_bytes());
    buffer.extend_from_slice(name);
    buffer.extend_from_slice(content);
    Ok(buffer)
}

/// 将帧拆分为文件名和内容。
///
/// # Errors
///
/// * 不足 2 字节：[`StegoError::TruncatedHeader`]。
/// * 声明的文件名长度超过剩余字节：[`StegoError::TruncatedBody`]。
/// * 文件名不是合法 UTF-8：[`StegoError::InvalidFilenameEncoding`]。
pub fn unframe(buffer: &[u8]) -> Result<Payload> {
    let Some((len_bytes, rest)) = buffer.split_first_chunk::<FILENAME_LEN_BYTES>() else {
        return Err(StegoError::TruncatedHeader { len: buffer.len() });
    };

    let declared = usize::from(u16::from_be_bytes(*len_bytes));
    if declared > rest.len() {
        return Err(StegoError::TruncatedBody {
            declared,
            available: rest.len(),
        });
    }

    let (name, content) = rest.split_at(declared);
    let filename = match declared {
        0 => None,
        _ => Some(String::from_utf8(name.to_vec())?),
    };

    Ok(Payload {
        filename,
        content: content.to_vec(),
    })
}
