use std::path::{Path, PathBuf};

use crate::{
    assets::naming::FramePathTemplate,
    foundation::error::{FrameSeqError, FrameSeqResult},
};

pub const DEFAULT_PREFIX: &str = "frame";
pub const DEFAULT_EXTENSION: &str = "jpg";

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

/// Construction-time description of a frame sequence. Not reconfigurable after mount.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaybackConfig {
    /// Directory holding the frames.
    pub base_path: PathBuf,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    pub total_frames: usize,
}

impl PlaybackConfig {
    pub fn new(base_path: impl Into<PathBuf>, total_frames: usize) -> Self {
        Self {
            base_path: base_path.into(),
            prefix: default_prefix(),
            extension: default_extension(),
            total_frames,
        }
    }

    pub fn with_naming(mut self, prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self.extension = extension.into();
        self
    }

    pub fn validate(&self) -> FrameSeqResult<()> {
        if self.total_frames == 0 {
            return Err(FrameSeqError::validation("total_frames must be >= 1"));
        }
        self.template().map(|_| ())
    }

    pub fn template(&self) -> FrameSeqResult<FramePathTemplate> {
        FramePathTemplate::new(
            self.base_path.clone(),
            self.prefix.clone(),
            self.extension.clone(),
        )
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> FrameSeqResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| FrameSeqError::config(format!("parse playback config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a JSON config file. A relative `base_path` resolves against the file's directory.
    pub fn from_json_path(path: &Path) -> FrameSeqResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| FrameSeqError::io(format!("read config '{}': {e}", path.display())))?;
        let mut cfg = Self::from_json_str(&text)?;
        if cfg.base_path.is_relative()
            && let Some(parent) = path.parent()
        {
            cfg.base_path = parent.join(&cfg.base_path);
        }
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/config.rs"]
mod tests;
