//! Unique path generation for new-file writes
//!
//! A `new_file` write must never collide with or overwrite an existing
//! artifact, so a unique token is inserted just before the file extension.
//! Locations may be URIs; the `scheme://` prefix is split off before any
//! path manipulation and re-joined afterwards, because path libraries
//! normalize `//` to `/` and would corrupt it.

use uuid::Uuid;

/// Insert a unique token before the extension of a path or URI
///
/// Everything except the token is deterministic: directory, stem, extension,
/// and any `scheme://` prefix are preserved byte-for-byte.
///
/// # Example
/// ```
/// use mallard::storage::uniquify;
///
/// let unique = uniquify("s3://bucket/out/data.parquet");
/// assert!(unique.starts_with("s3://bucket/out/data__"));
/// assert!(unique.ends_with(".parquet"));
/// assert_ne!(unique, "s3://bucket/out/data.parquet");
/// ```
pub fn uniquify(location: &str) -> String {
    let (scheme, rest) = match location.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, location),
    };

    let (dir, file) = match rest.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, rest),
    };

    let token = Uuid::new_v4();
    // a leading dot is a hidden file, not an extension
    let file = match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}__{}.{}", stem, token, ext),
        _ => format!("{}__{}", file, token),
    };

    let path = match dir {
        Some(dir) => format!("{}/{}", dir, file),
        None => file,
    };

    match scheme {
        Some(scheme) => format!("{}://{}", scheme, path),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_differs_from_input() {
        let path = "data/out.csv";
        assert_ne!(uniquify(path), path);
    }

    #[test]
    fn test_extension_and_directory_preserved() {
        let unique = uniquify("data/nested/out.csv");
        assert!(unique.starts_with("data/nested/out__"));
        assert!(unique.ends_with(".csv"));
    }

    #[test]
    fn test_scheme_prefix_preserved() {
        let unique = uniquify("s3://bucket/prefix/file.parquet");
        assert!(unique.starts_with("s3://bucket/prefix/file__"));
        assert!(unique.ends_with(".parquet"));
    }

    #[test]
    fn test_two_calls_differ() {
        assert_ne!(uniquify("out.json"), uniquify("out.json"));
    }

    #[test]
    fn test_no_extension() {
        let unique = uniquify("data/outfile");
        assert!(unique.starts_with("data/outfile__"));
        assert!(!unique.contains('.'));
    }

    #[test]
    fn test_hidden_file_is_not_an_extension() {
        let unique = uniquify("data/.env");
        assert!(unique.starts_with("data/.env__"));
    }

    #[test]
    fn test_bare_filename() {
        let unique = uniquify("out.csv");
        assert!(unique.starts_with("out__"));
        assert!(unique.ends_with(".csv"));
        assert!(!unique.contains('/'));
    }
}
