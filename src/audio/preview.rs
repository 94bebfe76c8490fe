use super::file::{AudioFile, FileId};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Local copy of the selected recording that the playback surface loads.
///
/// The backing temporary file is removed when the handle is released or
/// dropped.
#[derive(Debug)]
pub struct PreviewHandle {
    file_id: FileId,
    file: NamedTempFile,
}

impl PreviewHandle {
    pub fn create(audio: &AudioFile) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("classroom-preview-")
            .suffix(audio.extension().unwrap_or(""))
            .tempfile()
            .context("Failed to create preview file")?;

        file.write_all(audio.bytes())
            .context("Failed to write preview file")?;
        file.flush().context("Failed to flush preview file")?;

        debug!(
            "Created preview for {} at {}",
            audio.name,
            file.path().display()
        );

        Ok(Self {
            file_id: audio.id,
            file,
        })
    }

    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Release the preview now, reporting any failure to remove it
    pub fn release(self) {
        let path = self.file.path().to_path_buf();
        match self.file.close() {
            Ok(()) => debug!("Released preview {}", path.display()),
            Err(e) => warn!("Failed to remove preview {}: {}", path.display(), e),
        }
    }
}
