//! Header normalization for capture files.
//!
//! Capture tools only sometimes print a column header. Process and disk
//! captures without one get a synthetic header prepended in place.

use crate::error::CaptureError;
use crate::models::Category;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Ensure the capture at `path` starts with a header for `category`.
///
/// Returns `true` when a header was inserted. Files whose category has no
/// template are left untouched. All original bytes are kept below the
/// inserted header.
pub fn normalize_header(path: &Path, category: Category) -> Result<bool, CaptureError> {
    let (Some(template), Some(token)) = (category.header_template(), category.sniff_token())
    else {
        debug!("No header template for {} ({})", path.display(), category);
        return Ok(false);
    };

    let contents = fs::read(path).map_err(|e| CaptureError::read(path, e))?;

    if !needs_header(&contents, token) {
        debug!("{} already has a {} header", path.display(), category);
        return Ok(false);
    }

    info!("Adding header to {} file", category);

    let mut updated = Vec::with_capacity(template.len() + contents.len());
    updated.extend_from_slice(template.as_bytes());
    updated.extend_from_slice(&contents);

    fs::write(path, updated).map_err(|e| CaptureError::write(path, e))?;

    Ok(true)
}

/// Check whether the first line lacks the sniff token.
fn needs_header(contents: &[u8], token: &str) -> bool {
    let first_line = match contents.iter().position(|&b| b == b'\n') {
        Some(end) => &contents[..end],
        None => contents,
    };

    !String::from_utf8_lossy(first_line).contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROCESS_DATA: &str = "10:00:02 AM 1234 root 20 0 1000 500 300 S 0.0 0.1 00:00 bash\n\
                                10:00:03 AM 1234 root 20 0 1000 500 300 S 1.5 0.1 00:00 bash\n";

    #[test]
    fn test_inserts_processes_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("host_processes.log");
        std::fs::write(&path, PROCESS_DATA).unwrap();

        let inserted = normalize_header(&path, Category::Processes).unwrap();
        assert!(inserted);

        let content = std::fs::read_to_string(&path).unwrap();
        let template = Category::Processes.header_template().unwrap();
        assert!(content.starts_with(template));
        assert_eq!(&content[template.len()..], PROCESS_DATA);
    }

    #[test]
    fn test_processes_header_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("host_processes.log");
        std::fs::write(&path, PROCESS_DATA).unwrap();

        assert!(normalize_header(&path, Category::Processes).unwrap());
        let once = std::fs::read(&path).unwrap();

        assert!(!normalize_header(&path, Category::Processes).unwrap());
        let twice = std::fs::read(&path).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_existing_pid_header_left_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("processes");
        let original = "10:00:01 AM PID USER PR NI\n10:00:02 AM 1 root 20 0\n";
        std::fs::write(&path, original).unwrap();

        assert!(!normalize_header(&path, Category::Processes).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_disk_header_reinserted_on_every_run() {
        // Known quirk: the disk sniff looks for `Filesystem`, which the
        // inserted `DEV` header never contains.
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("disk.log");
        std::fs::write(&path, "10:00:01 AM sda 1.0 2.0\n").unwrap();

        assert!(normalize_header(&path, Category::Disk).unwrap());
        assert!(normalize_header(&path, Category::Disk).unwrap());

        let content = std::fs::read_to_string(&path).unwrap();
        let template = Category::Disk.header_template().unwrap();
        assert_eq!(content.matches(template).count(), 2);
    }

    #[test]
    fn test_disk_with_filesystem_token_left_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("disk.log");
        let original = "Filesystem Size Used\n/dev/sda1 10G 5G\n";
        std::fs::write(&path, original).unwrap();

        assert!(!normalize_header(&path, Category::Disk).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_generic_category_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cpu.log");
        let original = "10:00:01 AM 1.0 2.0\n";
        std::fs::write(&path, original).unwrap();

        assert!(!normalize_header(&path, Category::Cpu).unwrap());
        assert!(!normalize_header(&path, Category::Generic).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_empty_file_gets_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("processes");
        std::fs::write(&path, "").unwrap();

        assert!(normalize_header(&path, Category::Processes).unwrap());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            Category::Processes.header_template().unwrap()
        );
    }

    #[test]
    fn test_only_first_line_is_sniffed() {
        assert!(needs_header(b"10:00 AM 1 root\n PID later\n", "PID"));
        assert!(!needs_header(b"Time PM PID USER", "PID"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("processes");

        let err = normalize_header(&path, Category::Processes).unwrap_err();
        assert!(matches!(err, CaptureError::Read { .. }));
    }
}
