use sha3::{Digest, Sha3_256};
use uuid::Uuid;

const SALT_SEPARATOR: char = '$';

pub fn get_sha3_256_hash(data: &str) -> String {
    let mut hasher = Sha3_256::default();
    hasher.update(data);
    format!("{:X}", hasher.finalize())
}

/// Returns `salt$HASH`.
pub fn hash_password(pwd: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let hash = get_sha3_256_hash(&format!("{salt}{pwd}"));
    format!("{salt}{SALT_SEPARATOR}{hash}")
}

pub fn verify_password(pwd: &str, stored: &str) -> bool {
    match stored.split_once(SALT_SEPARATOR) {
        Some((salt, hash)) => get_sha3_256_hash(&format!("{salt}{pwd}")) == hash,
        None => false,
    }
}
