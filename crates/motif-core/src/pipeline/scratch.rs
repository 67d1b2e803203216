use crate::common::constants::SCRATCH_DIR_PREFIX;
use crate::domain::{MotifError, MotifResult};
use std::path::{Path, PathBuf};
use tempfile::{TempDir, TempPath};

/// Private working directory of one run.
///
/// The child runs inside it and every temporary file lives under it, so
/// dropping or closing it removes whatever the run left behind.
#[derive(Debug)]
pub(crate) struct ScratchSpace {
    dir: TempDir,
}

impl ScratchSpace {
    pub(crate) fn create(root: Option<&Path>) -> MotifResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_DIR_PREFIX);
        let created = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        let dir = created.map_err(|source| {
            MotifError::io_system(
                "IO.SCRATCH_CREATE",
                format!(
                    "failed to create scratch directory under '{}': {}",
                    root.map_or_else(std::env::temp_dir, Path::to_path_buf)
                        .display(),
                    source
                ),
            )
        })?;
        tracing::debug!(scratch = %dir.path().display(), "created run scratch directory");
        Ok(Self { dir })
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn temp_file(&self, prefix: &str) -> MotifResult<TempPath> {
        tempfile::Builder::new()
            .prefix(prefix)
            .suffix(".txt")
            .tempfile_in(self.path())
            .map(|file| file.into_temp_path())
            .map_err(|source| {
                MotifError::io_system(
                    "IO.SCRATCH_FILE",
                    format!(
                        "failed to create temporary file in '{}': {}",
                        self.path().display(),
                        source
                    ),
                )
            })
    }

    /// A path inside the scratch directory that the program itself creates.
    pub(crate) fn reserve(&self, file_name: &str) -> PathBuf {
        self.path().join(file_name)
    }

    pub(crate) fn close(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(error) = self.dir.close() {
            tracing::warn!(scratch = %path.display(), %error, "failed to remove scratch directory");
        }
    }
}
