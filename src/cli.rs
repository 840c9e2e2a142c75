//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，在无损格式图像 (如 PNG, BMP) 中隐藏经过密码加密的消息或文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，在无损格式图像 (如 PNG, BMP) 中隐藏经过密码加密的消息或文件。"
)]
pub struct Cli {
    /// 提高日志详细程度 (-v, -vv, -vvv)。
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、reveal (恢复) 和 capacity (容量)。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 将消息或文件加密后隐藏到图像中。
    Hide(HideArgs),

    /// 从经过隐写的图像中解密并恢复消息或文件。
    Reveal(RevealArgs),

    /// 显示图像可以隐藏的最大数据量。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Args, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    pub input: PathBuf,

    /// 隐写完成后，保存结果图像的输出路径。
    pub output: PathBuf,

    #[command(flatten)]
    pub secret: Secret,

    /// 用于加密隐藏数据的密码。
    #[arg(short, long)]
    pub password: String,

    /// 输出文件已存在时强制覆盖。
    #[arg(long)]
    pub force: bool,
}

/// 要隐藏的内容：文件或文本消息，二选一。
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct Secret {
    /// 要隐藏的文件路径 (任意二进制内容)。
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// 要隐藏的文本消息。
    #[arg(short, long)]
    pub message: Option<String>,
}

/// 'reveal' 命令所需的参数。
#[derive(Args, Debug)]
pub struct RevealArgs {
    /// 已隐藏数据的图像文件路径。
    pub input: PathBuf,

    /// 用于解密的密码。
    #[arg(short, long)]
    pub password: String,

    /// 恢复内容的保存路径，默认使用隐藏时记录的文件名。
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// 要检查的图像文件路径。
    pub input: PathBuf,
}
