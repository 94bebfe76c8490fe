use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Identity of one file selection.
///
/// Selecting the same file twice yields two different ids, so an analysis
/// issued for the first selection never applies to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FileId(Uuid);

impl FileId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user-supplied recording. Never mutated; a new selection replaces it.
#[derive(Debug, Clone)]
pub struct AudioFile {
    pub id: FileId,
    pub name: String,
    pub mime_type: String,
    content: Arc<[u8]>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening audio file: {}", path.display());

        let content = std::fs::read(path)
            .with_context(|| format!("Failed to read audio file {}", path.display()))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "recording".to_string());

        Ok(Self::from_bytes(name, content))
    }

    pub fn from_bytes(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let content: Vec<u8> = content.into();
        let mime_type = detect_mime_type(&name, &content);

        info!(
            "Audio file loaded: {} ({} bytes, {})",
            name,
            content.len(),
            mime_type
        );

        Self {
            id: FileId::new(),
            name,
            mime_type,
            content: content.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.content
    }

    /// File extension including the dot, if the name ends in one made only
    /// of ASCII letters and digits
    pub fn extension(&self) -> Option<&str> {
        let idx = self.name.rfind('.')?;
        let ext = &self.name[idx + 1..];
        let valid = !ext.is_empty() && ext.bytes().all(|b| b.is_ascii_alphanumeric());
        valid.then_some(&self.name[idx..])
    }
}

fn detect_mime_type(name: &str, content: &[u8]) -> String {
    if let Some(kind) = infer::get(content) {
        return kind.mime_type().to_string();
    }

    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "ogg" | "oga" => "audio/ogg",
        "flac" => "audio/flac",
        "webm" => "audio/webm",
        "aac" => "audio/aac",
        _ => "application/octet-stream",
    }
    .to_string()
}
