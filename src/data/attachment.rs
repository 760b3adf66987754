use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 10 MiB per file.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

pub const ACCEPTED_TYPES: [&str; 3] = ["application/pdf", "image/jpeg", "image/png"];

const FALLBACK_TYPE: &str = "application/octet-stream";

/// A menu file staged on the operating-hours screen. Only its metadata is
/// kept; the contents are never read.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime: String,
}

impl Attachment {
    #[cfg(test)]
    pub fn new(name: &str, size: u64, mime: &str) -> Self {
        Attachment {
            name: name.to_string(),
            size,
            mime: mime.to_string(),
        }
    }

    /// Builds the metadata for a file on disk. The type comes from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)
            .with_context(|| format!("failed to read metadata for {}", path.display()))?;
        if !meta.is_file() {
            anyhow::bail!("{} is not a file", path.display());
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Attachment {
            name,
            size: meta.len(),
            mime: mime_for_path(path).to_string(),
        })
    }

    pub fn is_accepted_type(&self) -> bool {
        ACCEPTED_TYPES.contains(&self.mime.as_str())
    }
}

/// MIME type guessed from the file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_TYPE)
}

/// Human-readable size for the staged-file list.
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    if bytes >= MIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}
