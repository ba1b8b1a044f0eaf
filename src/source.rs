//! File read/write for the patch run.
//!
//! The engine never touches the filesystem; the whole file is read once
//! before the rule pass and written once after. Writes are atomic
//! (tempfile + fsync + rename) so a failed write never leaves a
//! half-patched file behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("source file not found: {0}")]
    NotFound(PathBuf),

    #[error("source file is not valid UTF-8: {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read the whole file as UTF-8 text.
pub fn read(path: impl AsRef<Path>) -> Result<String, SourceError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound(path.to_path_buf())
        } else {
            SourceError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    String::from_utf8(bytes).map_err(|source| SourceError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `text` back atomically: tempfile in the same directory, fsync,
/// rename over the target.
pub fn write(path: impl AsRef<Path>, text: &str) -> Result<(), SourceError> {
    let path = path.as_ref();
    let io_err = |source| SourceError::Write {
        path: path.to_path_buf(),
        source,
    };

    // Tempfile must live in the same directory so the rename stays on one
    // filesystem.
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
    temp.write_all(text.as_bytes()).map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(path).map_err(|e| io_err(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(dir.path().join("absent.ts")).unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[test]
    fn read_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.ts");
        fs::write(&path, [0x66, 0x6f, 0xff, 0xfe]).unwrap();

        let err = read(&path).unwrap_err();
        assert!(matches!(err, SourceError::Decode { .. }));
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ts");

        write(&path, "const a = 1;\n").unwrap();
        assert_eq!(read(&path).unwrap(), "const a = 1;\n");
    }

    #[test]
    fn write_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ts");
        fs::write(&path, "old content").unwrap();

        write(&path, "new content").unwrap();
        assert_eq!(read(&path).unwrap(), "new content");
    }
}
