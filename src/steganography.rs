//! # LSB 位流编解码
//!
//! 将任意字节载荷写入像素通道字节的最低有效位，或从中读回。
//!
//! 位布局 (按通道字节顺序，每个字节 1 bit)：
//!
//! ```text
//! bits[0..32)        大端 u32 载荷长度 N
//! bits[32..32 + 8N)  载荷字节，每字节高位在前
//! ```

use crate::constants::{BITS_PER_BYTE, HEADER_BITS};
use crate::error::{Result, StegoError};
use log::debug;

/// 计算嵌入 `payload_len` 字节所需的位数 (含长度头)。
///
/// 溢出时返回 `None`。
pub fn required_bits(payload_len: usize) -> Option<u64> {
    u64::try_from(payload_len)
        .ok()?
        .checked_mul(BITS_PER_BYTE as u64)?
        .checked_add(HEADER_BITS as u64)
}

/// 一个含有 `grid_len` 个通道字节的图像最多能承载的载荷字节数。
pub fn payload_capacity(grid_len: usize) -> usize {
    grid_len.saturating_sub(HEADER_BITS) / BITS_PER_BYTE
}

/// 将 `payload` 连同长度头写入 `grid` 的最低有效位。
///
/// 容量在修改任何字节之前检查；失败时 `grid` 保持原样。
/// 每个被写入的字节只改变最低位，写入区间之后的字节不受影响。
///
/// # Errors
///
/// 载荷所需位数超过 `grid.len()`，或载荷长度无法用 `u32` 表示时，
/// 返回 [`StegoError::CapacityExceeded`]。
pub fn embed(grid: &mut [u8], payload: &[u8]) -> Result<()> {
    let available_bits = grid.len();
    let capacity_exceeded = |required_bits| StegoError::CapacityExceeded {
        required_bits,
        available_bits,
    };

    let required = required_bits(payload.len()).unwrap_or(u64::MAX);
    let header = u32::try_from(payload.len()).map_err(|_| capacity_exceeded(required))?;
    if required > available_bits as u64 {
        return Err(capacity_exceeded(required));
    }

    debug!(
        "Embedding {} payload bytes into {} of {} channel bytes",
        payload.len(),
        required,
        available_bits
    );

    let bits = header
        .to_be_bytes()
        .into_iter()
        .chain(payload.iter().copied())
        .flat_map(byte_to_bits);

    grid.iter_mut()
        .zip(bits)
        .for_each(|(byte, bit)| *byte = (*byte & 0xFE) | bit);

    Ok(())
}

/// 从 `grid` 的最低有效位中读出长度头及其后的载荷。
///
/// # Errors
///
/// `grid` 不足以容纳长度头，或长度头声明的位数超过 `grid.len()` 时，
/// 返回 [`StegoError::CorruptHeader`]。
pub fn extract(grid: &[u8]) -> Result<Vec<u8>> {
    let available_bits = grid.len();
    if available_bits < HEADER_BITS {
        return Err(StegoError::CorruptHeader {
            required_bits: HEADER_BITS as u64,
            available_bits,
        });
    }

    let declared = grid[..HEADER_BITS]
        .iter()
        .fold(0u32, |acc, &byte| (acc << 1) | u32::from(byte & 1));

    let required = HEADER_BITS as u64 + u64::from(declared) * BITS_PER_BYTE as u64;
    if required > available_bits as u64 {
        return Err(StegoError::CorruptHeader {
            required_bits: required,
            available_bits,
        });
    }

    debug!("Length header declares {} payload bytes", declared);

    let end = HEADER_BITS + declared as usize * BITS_PER_BYTE;
    Ok(grid[HEADER_BITS..end]
        .chunks_exact(BITS_PER_BYTE)
        .map(bits_to_byte)
        .collect())
}

fn byte_to_bits(byte: u8) -> impl Iterator<Item = u8> {
    (0..BITS_PER_BYTE).rev().map(move |shift| (byte >> shift) & 1)
}

fn bits_to_byte(chunk: &[u8]) -> u8 {
    chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_writes_header_then_payload_msb_first() {
        let mut grid = vec![0xAAu8; 48];
        embed(&mut grid, &[0b1000_0001, 0x00]).unwrap();

        let lsbs: Vec<u8> = grid.iter().map(|b| b & 1).collect();
        // header = 2
        assert_eq!(&lsbs[..30], &[0u8; 30][..]);
        assert_eq!(&lsbs[30..32], &[1, 0]);
        assert_eq!(&lsbs[32..40], &[1, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(&lsbs[40..48], &[0u8; 8][..]);
        assert!(grid.iter().all(|b| b & 0xFE == 0xAA));
    }

    #[test]
    fn embed_leaves_bytes_past_payload_untouched() {
        let mut grid: Vec<u8> = (0..=255).collect();
        let original = grid.clone();
        embed(&mut grid, b"hi").unwrap();

        assert_eq!(&grid[48..], &original[48..]);
        assert!(
            grid.iter()
                .zip(&original)
                .all(|(a, b)| a.abs_diff(*b) <= 1)
        );
    }

    #[test]
    fn extract_recovers_embedded_payload() {
        let mut grid: Vec<u8> = (0..4096u32).map(|i| (i * 37 % 251) as u8).collect();
        let payload = b"The quick brown fox \x00\xff jumps";
        embed(&mut grid, payload).unwrap();
        assert_eq!(extract(&grid).unwrap(), payload);
    }

    #[test]
    fn empty_payload_uses_only_the_header() {
        let mut grid = vec![0xFFu8; HEADER_BITS];
        embed(&mut grid, &[]).unwrap();
        assert!(extract(&grid).unwrap().is_empty());
    }

    #[test]
    fn payload_filling_capacity_exactly_fits() {
        let mut grid = vec![0u8; HEADER_BITS + 8 * 10];
        let payload = [0x5Au8; 10];
        embed(&mut grid, &payload).unwrap();
        assert_eq!(extract(&grid).unwrap(), payload);
    }

    #[test]
    fn one_byte_over_capacity_fails_without_mutation() {
        let mut grid = vec![0x11u8; HEADER_BITS + 8 * 10 + 7];
        let before = grid.clone();

        let err = embed(&mut grid, &[0xFFu8; 11]).unwrap_err();
        assert!(matches!(
            err,
            StegoError::CapacityExceeded {
                required_bits: 120,
                available_bits: 119
            }
        ));
        assert_eq!(grid, before);
    }

    #[test]
    fn oversized_header_is_corrupt() {
        let mut grid = vec![0u8; 64];
        grid[..HEADER_BITS].iter_mut().for_each(|b| *b = 1);
        assert!(matches!(
            extract(&grid),
            Err(StegoError::CorruptHeader { .. })
        ));
    }

    #[test]
    fn grid_smaller_than_header_is_corrupt() {
        assert!(matches!(
            extract(&[0u8; 31]),
            Err(StegoError::CorruptHeader {
                required_bits: 32,
                available_bits: 31
            })
        ));
    }

    #[test]
    fn capacity_helpers() {
        assert_eq!(payload_capacity(0), 0);
        assert_eq!(payload_capacity(31), 0);
        assert_eq!(payload_capacity(32 + 8 * 3 + 5), 3);
        assert_eq!(required_bits(4), Some(64));
    }
}
