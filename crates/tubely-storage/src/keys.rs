//! Storage key generation.
//!
//! Key format: `[{prefix}/]{hex}.{extension}` where `hex` encodes
//! [`STORAGE_KEY_RANDOM_BYTES`] bytes drawn from the operating system's CSPRNG.

use rand::rngs::OsRng;
use rand::TryRngCore;
use tubely_core::constants::STORAGE_KEY_RANDOM_BYTES;

use crate::traits::{StorageError, StorageResult};

/// Generate a fresh storage key.
///
/// Fails with [`StorageError::RandomSource`] when the OS random source is unavailable;
/// there is no fallback generator.
pub fn generate_key(extension: &str, prefix: Option<&str>) -> StorageResult<String> {
    let mut bytes = [0u8; STORAGE_KEY_RANDOM_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| StorageError::RandomSource(e.to_string()))?;

    Ok(compose_key(&hex::encode(bytes), extension, prefix))
}

fn compose_key(encoded: &str, extension: &str, prefix: Option<&str>) -> String {
    let extension = extension.trim_start_matches('.');
    match prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{}/{}.{}", prefix, encoded, extension),
        None => format!("{}.{}", encoded, extension),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_hex_name(name: &str, extension: &str) {
        let (stem, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, extension);
        assert_eq!(stem.len(), STORAGE_KEY_RANDOM_BYTES * 2);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_key_without_prefix() {
        let key = generate_key("png", None).unwrap();
        assert!(!key.contains('/'));
        assert!(!key.contains(','));
        assert_hex_name(&key, "png");
    }

    #[test]
    fn test_key_with_orientation_prefix() {
        let key = generate_key("mp4", Some("landscape")).unwrap();
        let (prefix, name) = key.split_once('/').unwrap();
        assert_eq!(prefix, "landscape");
        assert_hex_name(name, "mp4");
    }

    #[test]
    fn test_empty_prefix_is_ignored() {
        let key = generate_key(".jpg", Some("")).unwrap();
        assert!(!key.contains('/'));
        assert_hex_name(&key, "jpg");
    }

    #[test]
    fn test_ten_thousand_keys_are_unique() {
        let keys: HashSet<String> = (0..10_000)
            .map(|_| generate_key("mp4", Some("portrait")).unwrap())
            .collect();
        assert_eq!(keys.len(), 10_000);
    }
}
