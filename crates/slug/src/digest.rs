use sha2::{Digest, Sha256};

/// Lower-hex SHA-256 of `content`
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex_encode_lower(&hasher.finalize())
}

/// First 8 hex chars of [`content_hash`]
pub fn hash8(content: &str) -> String {
    let mut hash = content_hash(content);
    hash.truncate(8);
    hash
}

fn hex_encode_lower(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len().saturating_mul(2));
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash8_is_prefix_of_content_hash() {
        let full = content_hash("status/rot.png");
        assert_eq!(full.len(), 64);
        assert_eq!(hash8("status/rot.png"), full[..8]);
    }

    #[test]
    fn empty_payload_hashes() {
        // SHA-256 of the empty string
        assert_eq!(hash8(""), "e3b0c442");
    }
}
