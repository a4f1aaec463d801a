// src/file.rs

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::config::consts::{DEFAULT_OUT_DIR, DEFAULT_SNAPSHOT_FILE};
use crate::error::{Error, Result};

/// Read a capture/dump/snapshot file as UTF-8 (lossy: old pages are often Latin-1).
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            logd!("File: {} is not UTF-8, decoding lossily", path.display());
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}

/// Ensure parent dir exists; create/truncate file.
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    fs::write(path, contents).map_err(|e| Error::io(path, e))
}

/// Pretty JSON of any report (snapshot, distances, diagnostics) to `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<PathBuf> {
    let text = serde_json::to_string_pretty(value)?;
    write_text(path, &text)?;
    logf!("File: wrote {}", path.display());
    Ok(path.to_path_buf())
}

/// Where `--save-snapshot` writes when given a directory (or nothing).
pub fn resolve_snapshot_path(user_o: &str) -> Result<PathBuf> {
    if user_o.is_empty() {
        return Ok(PathBuf::from(DEFAULT_OUT_DIR).join(DEFAULT_SNAPSHOT_FILE));
    }
    let p = PathBuf::from(normalize_separators(user_o));
    if looks_like_dir_hint(&p) || p.is_dir() {
        ensure_directory(&p)?;
        Ok(p.join(DEFAULT_SNAPSHOT_FILE))
    } else {
        Ok(p)
    }
}

pub fn normalize_separators(p: &str) -> String {
    let sep = std::path::MAIN_SEPARATOR;
    p.chars().map(|c| if c == '/' || c == '\\' { sep } else { c }).collect()
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "path exists but is not a directory"),
        ));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    Ok(())
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("chapero-file-{}-{}", name, std::process::id()))
    }

    #[test]
    fn write_then_read_creates_dirs() {
        let dir = scratch("rw");
        let path = dir.join("nested").join("a.txt");
        write_text(&path, "LAB 2636").unwrap();
        assert_eq!(read_text(&path).unwrap(), "LAB 2636");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn latin1_is_read_lossily() {
        let dir = scratch("latin1");
        ensure_directory(&dir).unwrap();
        let path = dir.join("board.html");
        fs::write(&path, b"Antig\xfcedad 2636").unwrap();
        let text = read_text(&path).unwrap();
        assert!(text.starts_with("Antig"));
        assert!(text.ends_with("edad 2636"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_names_path() {
        let err = read_text(Path::new("definitely/not/here.html")).unwrap_err();
        assert!(err.to_string().contains("here.html"));
    }

    #[test]
    fn snapshot_path_defaults_and_dir_hints() {
        assert_eq!(
            resolve_snapshot_path("").unwrap(),
            PathBuf::from(DEFAULT_OUT_DIR).join(DEFAULT_SNAPSHOT_FILE)
        );
        assert_eq!(resolve_snapshot_path("snap.json").unwrap(), PathBuf::from("snap.json"));
        let dir = scratch("hint");
        let hinted = format!("{}/", dir.display());
        assert_eq!(resolve_snapshot_path(&hinted).unwrap(), dir.join(DEFAULT_SNAPSHOT_FILE));
        let _ = fs::remove_dir_all(&dir);
    }
}
