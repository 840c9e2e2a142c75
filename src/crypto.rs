//! # 密码信封
//!
//! 由三部分组成：
//!
//! - **密钥派生**：PBKDF2-HMAC-SHA256，将密码和 16 字节盐派生为 32 字节密钥。
//! - **认证加密**：ChaCha20-Poly1305，令牌格式为
//!   `version[1] ‖ nonce[12] ‖ ciphertext ‖ tag[16]`，版本字节作为关联数据参与认证。
//! - **信封**：每次加密生成新盐，输出 `salt[16] ‖ token`。
//!
//! 密码错误与数据被篡改统一报告为 [`StegoError::AuthenticationFailed`]。

use crate::constants::{KDF_ITERATIONS, KEY_LEN, NONCE_LEN, SALT_LEN, TAG_LEN, TOKEN_VERSION};
use crate::error::{Result, StegoError};
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use log::debug;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

/// 令牌中除密文外的固定开销 (版本 + 随机数 + 标签)。
const TOKEN_OVERHEAD: usize = 1 + NONCE_LEN + TAG_LEN;

/// 对称密钥，离开作用域时清零。
pub type SecretKey = Zeroizing<[u8; KEY_LEN]>;

/// 由密码和盐派生对称密钥。
///
/// 相同输入总是得到相同密钥。盐长度由类型保证。
pub fn derive_key(password: &str, salt: &[u8; SALT_LEN], iterations: u32) -> SecretKey {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut *key);
    key
}

/// 用 `key` 加密 `plaintext`，返回自描述的认证令牌。
///
/// # Errors
///
/// 仅当底层 AEAD 拒绝加密时返回 [`StegoError::EncryptionFailed`]。
pub fn seal(key: &SecretKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_slice()));

    let mut nonce = [0u8; NONCE_LEN];
    rand::rng().fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: &[TOKEN_VERSION],
            },
        )
        .map_err(|_| StegoError::EncryptionFailed)?;

    let mut token = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
    token.push(TOKEN_VERSION);
    token.extend_from_slice(&nonce);
    token.extend_from_slice(&ciphertext);
    Ok(token)
}

/// 用 `key` 解开 [`seal`] 产生的令牌。
///
/// # Errors
///
/// 令牌过短、版本未知、密钥错误或任何一位被修改时，
/// 返回 [`StegoError::AuthenticationFailed`]，不会返回部分明文。
pub fn open(key: &SecretKey, token: &[u8]) -> Result<Vec<u8>> {
    if token.len() < TOKEN_OVERHEAD || token[0] != TOKEN_VERSION {
        return Err(StegoError::AuthenticationFailed);
    }

    let (nonce, ciphertext) = token[1..].split_at(NONCE_LEN);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_slice()));

    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad: &token[..1],
            },
        )
        .map_err(|_| StegoError::AuthenticationFailed)
}

/// 加密 `plaintext_len` 字节明文后得到的数据块长度。
pub fn sealed_len(plaintext_len: usize) -> usize {
    SALT_LEN + TOKEN_OVERHEAD + plaintext_len
}

/// 基于密码的加密信封，持有密钥派生的工作量参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    iterations: u32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            iterations: KDF_ITERATIONS,
        }
    }
}

impl Envelope {
    /// 使用自定义迭代次数创建信封。加解密双方必须使用相同的值。
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// 生成新盐、派生密钥并加密，返回 `salt ‖ token`。
    pub fn encrypt(&self, plaintext: &[u8], password: &str) -> Result<Vec<u8>> {
        let mut salt = [0u8; SALT_LEN];
        rand::rng().fill_bytes(&mut salt);

        debug!(
            "Deriving key with {} PBKDF2 iterations for {} plaintext bytes",
            self.iterations,
            plaintext.len()
        );
        let key = derive_key(password, &salt, self.iterations);
        let token = seal(&key, plaintext)?;

        let mut blob = Vec::with_capacity(SALT_LEN + token.len());
        blob.extend_from_slice(&salt);
        blob.extend_from_slice(&token);
        Ok(blob)
    }

    /// 读取前导盐、派生密钥并解密。
    ///
    /// # Errors
    ///
    /// * 数据块短于盐长度：[`StegoError::MalformedBlob`]。
    /// * 密码错误或数据损坏：[`StegoError::AuthenticationFailed`]。
    pub fn decrypt(&self, blob: &[u8], password: &str) -> Result<Vec<u8>> {
        let Some((salt, token)) = blob.split_first_chunk::<SALT_LEN>() else {
            return Err(StegoError::MalformedBlob { len: blob.len() });
        };

        debug!(
            "Deriving key with {} PBKDF2 iterations for a {} byte token",
            self.iterations,
            token.len()
        );
        let key = derive_key(password, salt, self.iterations);
        open(&key, token)
    }
}

/// 使用默认工作量加密。
pub fn encrypt(plaintext: &[u8], password: &str) -> Result<Vec<u8>> {
    Envelope::default().encrypt(plaintext, password)
}

/// 使用默认工作量解密。
pub fn decrypt(blob: &[u8], password: &str) -> Result<Vec<u8>> {
    Envelope::default().decrypt(blob, password)
}
