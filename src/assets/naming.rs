use std::path::{Path, PathBuf};

use crate::foundation::error::{FrameSeqError, FrameSeqResult};

/// Naming contract for a frame sequence on disk:
/// `{base_path}/{prefix}-{index:03}.{extension}` with a 1-based `index`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FramePathTemplate {
    pub base_path: PathBuf,
    pub prefix: String,
    pub extension: String,
}

impl FramePathTemplate {
    pub fn new(
        base_path: impl Into<PathBuf>,
        prefix: impl Into<String>,
        extension: impl Into<String>,
    ) -> FrameSeqResult<Self> {
        let out = Self {
            base_path: base_path.into(),
            prefix: prefix.into(),
            extension: extension.into().trim_start_matches('.').to_string(),
        };
        out.validate()?;
        Ok(out)
    }

    pub fn validate(&self) -> FrameSeqResult<()> {
        if self.prefix.is_empty() {
            return Err(FrameSeqError::validation("frame prefix must be non-empty"));
        }
        if self.extension.is_empty() {
            return Err(FrameSeqError::validation(
                "frame extension must be non-empty",
            ));
        }
        if self.prefix.contains(['/', '\\']) {
            return Err(FrameSeqError::validation(
                "frame prefix must not contain path separators",
            ));
        }
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// File name for 1-based `index`, zero-padded to at least three digits.
    pub fn file_name(&self, index: usize) -> String {
        format!("{}-{index:03}.{}", self.prefix, self.extension)
    }

    /// Path for 0-based `slot` (file index `slot + 1`).
    pub fn path_for_slot(&self, slot: usize) -> PathBuf {
        self.base_path.join(self.file_name(slot + 1))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/naming.rs"]
mod tests;
