//! Atomic file output.
//!
//! Content goes to a temporary file in the destination directory, which is
//! then renamed over the final path. Readers never see a partial file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::error::{EnumgenError, EnumgenResult};

/// Temporary sibling of `path`: `.<name>.<pid>.<nanos>.tmp`.
fn temp_path_for(path: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), nanos))
}

/// Writes `content` to `path` through a temporary file and a rename.
///
/// The temporary file is removed if the rename fails.
pub fn write_atomic(path: &Path, content: &str) -> EnumgenResult<()> {
    let temp_path = temp_path_for(path);

    fs::write(&temp_path, content).map_err(|e| EnumgenError::write(&temp_path, e))?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(EnumgenError::write(path, e));
    }

    debug!(file = %path.display(), bytes = content.len(), "Wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "enumgen_write_test_{}_{}",
            name,
            std::process::id()
        ));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".tmp"))
            .collect()
    }

    #[test]
    fn test_write_and_overwrite() {
        let dir = temp_dir("overwrite");
        let path = dir.join("enumgen_StatusEnum.go");

        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(leftovers(&dir).is_empty());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_failed_rename_cleans_up() {
        let dir = temp_dir("rename");
        // A non-empty directory cannot be replaced by a file.
        let target = dir.join("occupied");
        fs::create_dir_all(target.join("inner")).unwrap();

        let err = write_atomic(&target, "content").unwrap_err();
        assert!(matches!(err, EnumgenError::Write { .. }));
        assert!(leftovers(&dir).is_empty());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = temp_dir("missing");
        let err = write_atomic(&dir.join("nope/file.go"), "x").unwrap_err();
        assert!(matches!(err, EnumgenError::Write { .. }));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("/a/b/enumgen.go"));
        assert_eq!(temp.parent(), Some(Path::new("/a/b")));
        let name = temp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".enumgen.go."));
        assert!(name.ends_with(".tmp"));
    }
}
