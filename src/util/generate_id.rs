use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};

/// Length of every identifier produced by [`generate_id`].
pub const ID_LEN: usize = 20;

/// Derive a stable 20 character base62 identifier from `name`.
pub fn generate_id(name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    let hash = hasher.finalize();

    // First 128 bits of the digest, shifted down to 119 bits so that
    // 20 base62 digits always cover the whole value.
    let mut num = [0u8; 16];
    num.copy_from_slice(&hash[..16]);
    let mut value = u128::from_be_bytes(num);
    value >>= 9;

    let mut id = String::with_capacity(ID_LEN);
    for _ in 0..ID_LEN {
        let remainder = (value % 62) as u8;
        value /= 62;

        let c = if remainder < 10 {
            (remainder + b'0') as char
        } else if remainder < 36 {
            (remainder - 10 + b'A') as char
        } else {
            (remainder - 36 + b'a') as char
        };
        id.push(c);
    }

    id
}

/// Returns true when `id` has the shape of an identifier we hand out.
/// Anything else can never match a stored record.
pub fn is_valid_id(id: &str) -> bool {
    static ID_RE: OnceLock<Regex> = OnceLock::new();
    ID_RE
        .get_or_init(|| Regex::new(r"^[0-9A-Za-z]{20}$").expect("static regex"))
        .is_match(id)
}
