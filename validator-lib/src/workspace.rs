//! Per-invocation scratch directory.
//!
//! Each invocation gets its own directory, named with a random UUID, and the
//! directory (with everything staged inside it) is removed when the
//! [`Workspace`] is dropped, whichever way the invocation ends.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

const WORKSPACE_PREFIX: &str = "compute-validator";

pub struct Workspace {
    id: Uuid,
    dir: TempDir,
}

impl Workspace {
    /// Create a uniquely named workspace under the system temp directory
    pub fn acquire() -> Result<Self> {
        Self::acquire_in(std::env::temp_dir())
    }

    /// Create a uniquely named workspace under `parent`
    pub fn acquire_in(parent: impl AsRef<Path>) -> Result<Self> {
        let id = Uuid::new_v4();
        let dir = tempfile::Builder::new()
            .prefix(&format!("{WORKSPACE_PREFIX}-{id}-"))
            .tempdir_in(parent.as_ref())
            .with_context(|| {
                format!(
                    "Failed to create a workspace in {}",
                    parent.as_ref().display()
                )
            })?;
        Ok(Workspace { id, dir })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the staged upload; the file name is prefixed with the workspace id
    pub fn input_path(&self, original_name: &str) -> PathBuf {
        let file_name = Path::new(original_name)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.xlsx");
        self.path().join(format!("{}_{}", self.id, file_name))
    }

    pub fn output_path(&self) -> PathBuf {
        self.path().join(format!("Report_{}.xlsx", self.id))
    }

    /// Copy an upload into the workspace and return the staged path
    pub fn stage_input(&self, source: impl AsRef<Path>) -> Result<PathBuf> {
        let source = source.as_ref();
        let original_name = source
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.xlsx");
        let staged = self.input_path(original_name);
        fs::copy(source, &staged)
            .with_context(|| format!("Failed to stage {}", source.display()))?;
        Ok(staged)
    }

    /// Write the report inside the workspace first, then copy it to `destination`.
    pub fn publish_report(&self, report: &[u8], destination: impl AsRef<Path>) -> Result<()> {
        let output = self.output_path();
        fs::write(&output, report)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        fs::copy(&output, destination.as_ref()).with_context(|| {
            format!("Failed to copy report to {}", destination.as_ref().display())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_is_removed_on_drop() {
        let parent = tempfile::tempdir().unwrap();
        let path = {
            let workspace = Workspace::acquire_in(parent.path()).unwrap();
            fs::write(workspace.output_path(), b"report").unwrap();
            workspace.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_workspaces_never_collide() {
        let parent = tempfile::tempdir().unwrap();
        let first = Workspace::acquire_in(parent.path()).unwrap();
        let second = Workspace::acquire_in(parent.path()).unwrap();

        assert_ne!(first.id(), second.id());
        assert_ne!(first.path(), second.path());
        assert_ne!(first.output_path(), second.output_path());
    }

    #[test]
    fn test_input_path_strips_directories() {
        let parent = tempfile::tempdir().unwrap();
        let workspace = Workspace::acquire_in(parent.path()).unwrap();
        let staged = workspace.input_path("../../etc/data.xlsx");

        assert_eq!(staged.parent(), Some(workspace.path()));
        assert!(staged.to_string_lossy().ends_with("_data.xlsx"));
    }
}
