//! Stored-name and storage-key generation.
//!
//! Key format: `{code}/{stored_name}` under the upload root. Stored names are
//! assigned at write time and never derived from the client-supplied filename
//! beyond its extension.

use rand::Rng;

/// Generate a collision-resistant stored name for an upload: unix-millis
/// write timestamp, a random numeric suffix, and the original extension
/// (lowercased). The original name itself never reaches the filesystem.
pub fn generate_stored_name(original_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    match extension_of(original_name) {
        Some(ext) => format!("{}-{}.{}", millis, suffix, ext),
        None => format!("{}-{}", millis, suffix),
    }
}

/// Storage key for a stored upload, scoped under its pairing code.
pub fn storage_key(code: &str, stored_name: &str) -> String {
    format!("{}/{}", code, stored_name)
}

fn extension_of(name: &str) -> Option<String> {
    std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_name_keeps_lowercased_extension() {
        let name = generate_stored_name("Holiday Photo.PNG");
        assert!(name.ends_with(".png"));
        assert!(!name.contains("Holiday"));
    }

    #[test]
    fn test_stored_name_without_extension() {
        let name = generate_stored_name("README");
        assert!(!name.contains('.'));
        assert!(name.contains('-'));
    }

    #[test]
    fn test_stored_names_are_distinct() {
        let a = generate_stored_name("a.png");
        let b = generate_stored_name("a.png");
        assert_ne!(a, b);
    }

    #[test]
    fn test_stored_name_never_contains_path_separators() {
        let name = generate_stored_name("../../etc/passwd.png");
        assert!(!name.contains('/'));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_storage_key_shape() {
        assert_eq!(storage_key("123456", "17-9.png"), "123456/17-9.png");
    }
}
