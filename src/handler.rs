//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`reveal` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、串联帧编码、加密与隐写核心函数，并向用户报告结果。

use crate::carrier;
use crate::cli::{CapacityArgs, HideArgs, RevealArgs};
use crate::constants::FILENAME_LEN_BYTES;
use crate::crypto::{self, sealed_len};
use crate::payload::{self, Payload};
use crate::steganography::{embed, extract, payload_capacity};
use anyhow::{Context, Result};
use colored::Colorize;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 读取要隐藏的文件或消息，编码为帧后交给 [`hide_bytes`]，
/// 最后输出一行确认信息。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输出文件已存在且未指定 `--force`。
/// * 无法读取输入图像或要隐藏的文件。
/// * 图像没有足够的空间。
/// * 无法写入目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    ensure_writable(&args.output, args.force)?;

    let (content, filename) = match (&args.secret.file, &args.secret.message) {
        (Some(path), _) => {
            let content = fs::read(path).with_context(|| {
                format!(
                    "Unable to read file: {}",
                    path.to_string_lossy().red().bold()
                )
            })?;
            let filename = match path.file_name() {
                Some(name) => Some(
                    name.to_str()
                        .with_context(|| {
                            format!(
                                "The file name {} is not valid UTF-8 and cannot be stored.",
                                name.to_string_lossy().red().bold()
                            )
                        })?
                        .to_owned(),
                ),
                None => None,
            };
            (content, filename)
        }
        (None, Some(message)) => (message.as_bytes().to_vec(), None),
        (None, None) => anyhow::bail!("Either --file or --message must be given."),
    };

    let framed = payload::frame(&content, filename.as_deref())
        .context("The file name cannot be stored in the hidden payload.")?;

    hide_bytes(&args.input, &args.output, &framed, &args.password)?;

    let kind = if filename.is_some() { "file" } else { "message" };
    println!(
        "The {} has been successfully hidden and saved: {}",
        kind,
        args.output.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 加密已编码的帧并将其隐藏到 `input` 图像中，结果写入 `output`。
///
/// 在执行耗时的密钥派生之前先检查容量。
pub fn hide_bytes(input: &Path, output: &Path, framed: &[u8], password: &str) -> Result<()> {
    let mut image = carrier::load(input)?;

    let required_space = sealed_len(framed.len());
    let available_space = payload_capacity(image.len());
    anyhow::ensure!(
        available_space >= required_space,
        "Not enough space in the image to hide the data. \nRequired: {} bytes, Available: {} bytes",
        required_space.to_string().red().bold(),
        available_space.to_string().green().bold()
    );

    let blob = crypto::encrypt(framed, password).context("Failed to encrypt the payload.")?;
    info!("Encrypted {} bytes into a {} byte blob", framed.len(), blob.len());

    embed(&mut image, &blob).with_context(|| {
        format!(
            "Failed to hide the data in '{}'.",
            input.to_string_lossy().red().bold()
        )
    })?;

    carrier::save(&image, output)
}

/// 从 `input` 图像中提取、解密并解帧隐藏的数据。
///
/// # Errors
///
/// 图像无法读取、不含隐藏数据、密码错误或数据损坏时返回错误。
pub fn reveal_payload(input: &Path, password: &str) -> Result<Payload> {
    let image = carrier::load(input)?;

    let blob = extract(&image).with_context(|| {
        format!(
            "Failed to recover hidden data from '{}'. \nThe image may not contain a hidden message or is corrupted.",
            input.to_string_lossy().red().bold()
        )
    })?;
    info!("Extracted a {} byte blob", blob.len());

    let plaintext = crypto::decrypt(&blob, password)
        .context("Decryption failed (wrong password or corrupted data).")?;

    payload::unframe(&plaintext).context("Corrupt data in the decrypted payload.")
}

/// 处理 'Reveal' 命令的执行逻辑。
///
/// 若隐藏的是文件，将内容写入 `--out` 或记录的文件名；
/// 若隐藏的是消息，直接打印文本。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件，或其中没有可识别的隐藏数据。
/// * 密码错误或数据被篡改。
/// * 目标文件已存在且未指定 `--force`，或无法写入目标文件。
pub fn handle_reveal(args: RevealArgs) -> Result<()> {
    let Payload { filename, content } = reveal_payload(&args.input, &args.password)?;

    match filename {
        Some(name) => {
            let dest = match args.out {
                Some(out) => out,
                None => local_file_name(&name)?,
            };
            write_output(&dest, &content, args.force)?;
            println!(
                "The file has been successfully recovered and saved: {}",
                dest.to_string_lossy().green().bold()
            );
        }
        None => match String::from_utf8(content) {
            Ok(text) => {
                println!("{}", "Recovered message:".green().bold());
                println!("{text}");
            }
            Err(err) => {
                let bytes = err.into_bytes();
                match args.out {
                    Some(out) => {
                        write_output(&out, &bytes, args.force)?;
                        println!(
                            "The raw data has been successfully recovered and saved: {}",
                            out.to_string_lossy().green().bold()
                        );
                    }
                    None => {
                        println!(
                            "{}",
                            "The decrypted payload is not UTF-8 text. Use --out to save it as a file."
                                .yellow()
                                .bold()
                        );
                        println!("{}", bytes.escape_ascii());
                    }
                }
            }
        },
    }

    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let image = carrier::load(&args.input)?;

    let channel_bytes = image.len();
    let raw = payload_capacity(channel_bytes);
    let secret = secret_capacity(channel_bytes);

    println!(
        "{}: {}x{}, {} channel bytes",
        args.input.to_string_lossy().bold(),
        image.width(),
        image.height(),
        channel_bytes
    );
    println!("Raw capacity: {} bytes", raw.to_string().green().bold());
    println!(
        "Largest secret (content + file name): {} bytes",
        secret.to_string().green().bold()
    );

    Ok(())
}

/// 一个含有 `channel_bytes` 个通道字节的图像在加密和帧开销之后
/// 能隐藏的最大内容 (含文件名) 字节数。
pub fn secret_capacity(channel_bytes: usize) -> usize {
    payload_capacity(channel_bytes).saturating_sub(sealed_len(0) + FILENAME_LEN_BYTES)
}

/// 将记录的文件名限制为当前目录下的文件名，去除任何目录部分。
pub(crate) fn local_file_name(name: &str) -> Result<PathBuf> {
    let base = Path::new(name).file_name().with_context(|| {
        format!(
            "The embedded file name '{}' is not usable. \nUse --out to choose an output path.",
            name.red().bold()
        )
    })?;

    if base != name {
        warn!("Stripped directory components from embedded file name '{name}'");
    }
    Ok(PathBuf::from(base))
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn write_output(path: &Path, content: &[u8], force: bool) -> Result<()> {
    ensure_writable(path, force)?;
    fs::write(path, content).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_name_keeps_only_its_final_component() {
        assert_eq!(
            local_file_name("../../evil.txt").unwrap(),
            PathBuf::from("evil.txt")
        );
        assert_eq!(local_file_name("a/b.txt").unwrap(), PathBuf::from("b.txt"));
        assert_eq!(
            local_file_name("/etc/passwd").unwrap(),
            PathBuf::from("passwd")
        );
        assert_eq!(local_file_name("plain.txt").unwrap(), PathBuf::from("plain.txt"));
    }

    #[test]
    fn embedded_name_without_file_component_is_rejected() {
        for name in ["..", "/", "a/.."] {
            let err = local_file_name(name).unwrap_err();
            assert!(err.to_string().contains("is not usable"), "{name}");
        }
    }

    #[test]
    fn secret_capacity_subtracts_envelope_and_frame_overhead() {
        // 1200 通道字节 -> 146 字节原始容量
        assert_eq!(secret_capacity(1200), 146 - sealed_len(0) - FILENAME_LEN_BYTES);
        assert_eq!(secret_capacity(100), 0);
    }
}
