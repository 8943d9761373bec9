use sha2::{Digest, Sha256};

/// 计算文件原始字节的内容指纹，仅用于判断脚本是否变化
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
