use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Write `data` to a sibling temp file and rename it over `path`, so readers
/// never see a half-written report.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    std::fs::rename(&tmp_path, path)
}

fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a file path", path.display()),
        )
    })?;
    Ok(path.with_file_name(format!("{}.tmp", file_name.to_string_lossy())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_file() {
        let dir = std::env::temp_dir().join(format!("mqa_out_{}", uuid::Uuid::new_v4()));
        let path = dir.join("reports").join("report.json");

        write_atomic(&path, b"{\"totalScore\":1}").expect("first write");
        write_atomic(&path, b"{\"totalScore\":2}").expect("second write");

        let content = std::fs::read_to_string(&path).expect("read report");
        assert_eq!(content, "{\"totalScore\":2}");
        assert!(!path.with_file_name("report.json.tmp").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_directory_like_paths() {
        assert!(temp_path(Path::new("/")).is_err());
    }
}
