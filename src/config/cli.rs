use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Storage for LocalStorage {
    fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let full_path = Path::new(&self.base_path).join(path);
        let display = full_path.display().to_string();
        let write_error = |e: std::io::Error| EtlError::OutputWriteError {
            path: display.clone(),
            message: e.to_string(),
        };

        let parent = match full_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };
        fs::create_dir_all(&parent).map_err(write_error)?;

        // 寫入同目錄的暫存檔後再改名，目標檔案不會只寫一半
        let mut temp = NamedTempFile::new_in(&parent).map_err(write_error)?;
        temp.write_all(data).map_err(write_error)?;
        temp.as_file().sync_all().map_err(write_error)?;
        temp.persist(&full_path).map_err(|e| write_error(e.error))?;

        Ok(display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_str().unwrap());

        let written = storage.write_file("out/transactions.json", b"[]").unwrap();

        let expected = dir.path().join("out/transactions.json");
        assert_eq!(written, expected.display().to_string());
        assert_eq!(fs::read(expected).unwrap(), b"[]");
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_str().unwrap());

        storage.write_file("transactions.json", b"[1, 2, 3]").unwrap();
        storage.write_file("transactions.json", b"[]").unwrap();

        let content = fs::read_to_string(dir.path().join("transactions.json")).unwrap();
        assert_eq!(content, "[]");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_into_a_file_path_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("blocker"), b"x").unwrap();
        let storage = LocalStorage::new(dir.path().to_str().unwrap());

        let err = storage.write_file("blocker/transactions.json", b"[]").unwrap_err();
        assert!(matches!(err, EtlError::OutputWriteError { .. }));
    }
}
