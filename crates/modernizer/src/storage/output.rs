use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::StorageError;
use crate::sanitize;

/// Writes modernized files under an output root, mirroring each file's path
/// relative to the scanned root.
#[derive(Debug, Clone)]
pub struct OutputStore {
    output_directory: PathBuf,
}

impl OutputStore {
    pub fn new<P: AsRef<Path>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.as_ref().to_path_buf(),
        }
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Target path for `relative_path`, or an error if it would land outside
    /// the output root.
    pub fn resolve(&self, relative_path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(relative_path);

        if relative_path.trim().is_empty() {
            return Err(StorageError::InvalidOutputPath(
                "Relative path is empty".to_string(),
            ));
        }
        if relative.is_absolute() || relative_path.starts_with('/') || relative_path.starts_with('\\') {
            return Err(StorageError::InvalidOutputPath(format!(
                "Path is absolute: {}",
                relative_path
            )));
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(StorageError::InvalidOutputPath(format!(
                        "Path contains traversal: {}",
                        relative_path
                    )));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(StorageError::InvalidOutputPath(format!(
                        "Path is absolute: {}",
                        relative_path
                    )));
                }
            }
        }
        if relative.file_name().is_none() {
            return Err(StorageError::InvalidOutputPath(format!(
                "Path has no file name: {}",
                relative_path
            )));
        }

        Ok(self.output_directory.join(relative))
    }

    /// Writes `content` to `<output>/<relative_path>`, replacing any existing
    /// file. Parent directories are created as needed.
    pub fn store(&self, relative_path: &str, content: &str) -> Result<PathBuf, StorageError> {
        let target = self.resolve(relative_path)?;
        let parent = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.output_directory.clone());
        ensure_directory(&parent)?;

        // Symlinked directories inside the output root may still point outside it
        if let (Ok(canonical_root), Ok(canonical_parent)) =
            (self.output_directory.canonicalize(), parent.canonicalize())
        {
            if !canonical_parent.starts_with(&canonical_root) {
                return Err(StorageError::InvalidOutputPath(format!(
                    "Resolved path escapes output directory: {}",
                    canonical_parent.display()
                )));
            }
        }

        let mut staged =
            tempfile::NamedTempFile::new_in(&parent).map_err(|e| StorageError::WriteFile {
                path: target.clone(),
                source: e,
            })?;
        staged
            .write_all(content.as_bytes())
            .map_err(|e| StorageError::WriteFile {
                path: target.clone(),
                source: e,
            })?;
        staged.persist(&target).map_err(|e| StorageError::WriteFile {
            path: target.clone(),
            source: e.error,
        })?;

        debug!("Stored {}", sanitize::redact_path(&target));
        Ok(target)
    }
}

fn ensure_directory(path: &Path) -> Result<(), StorageError> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| StorageError::CreateDirectory {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}
