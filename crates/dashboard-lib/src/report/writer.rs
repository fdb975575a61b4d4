//! Atomic artifact writes

use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `contents` to `path` through a temp file in the same directory
///
/// The target only appears once the whole document is on disk; a failure
/// at any point drops the temp file and leaves `path` untouched.
pub fn write_atomically(path: &Path, contents: &str) -> Result<u64> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    Ok(contents.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_and_replaces() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("report.html");

        let written = write_atomically(&target, "<html>first</html>").unwrap();
        assert_eq!(written, 18);
        write_atomically(&target, "<html>second</html>").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "<html>second</html>");
        // only the target remains, no stray temp files
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_directory_fails_without_output() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing").join("report.html");

        assert!(write_atomically(&target, "<html></html>").is_err());
        assert!(!target.exists());
    }
}
