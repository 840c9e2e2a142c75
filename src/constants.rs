//! # 格式常量
//!
//! 嵌入位布局、加密信封与载荷帧的全部参数都集中在这里，
//! 以便审计和按版本演进。

/// 长度头占用的位数 (一个大端 `u32`)。
/// 每个通道字节只存储 1 bit，因此长度头占用前 32 个通道字节。
pub const HEADER_BITS: usize = 32;

/// 每个载荷字节需要的通道字节数 (每字节 8 bit，每通道 1 bit)。
pub const BITS_PER_BYTE: usize = 8;

/// 每次加密随机生成的盐长度 (字节)。
pub const SALT_LEN: usize = 16;

/// 派生出的对称密钥长度 (字节)。
pub const KEY_LEN: usize = 32;

/// PBKDF2-HMAC-SHA256 的迭代次数。
pub const KDF_ITERATIONS: u32 = 390_000;

/// ChaCha20-Poly1305 随机数长度 (字节)。
pub const NONCE_LEN: usize = 12;

/// Poly1305 认证标签长度 (字节)。
pub const TAG_LEN: usize = 16;

/// 令牌格式版本号，位于令牌首字节并作为关联数据参与认证。
pub const TOKEN_VERSION: u8 = 0x01;

/// 载荷帧中文件名长度字段的宽度 (字节，大端)。
pub const FILENAME_LEN_BYTES: usize = 2;

/// 文件名的最大 UTF-8 字节数。
pub const MAX_FILENAME_LEN: usize = u16::MAX as usize;
