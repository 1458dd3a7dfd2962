use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, CoreResult};
use crate::services::encoding::TextEncoding;
use crate::services::speakers::SpeakerRegistry;

/// Source marker convention used by the translated corpus at a given stage.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarkerConvention {
    /// `＃`, written by cleanup
    #[default]
    Fullwidth,
    /// Plain `#`, written by earlier exports
    Ascii,
}

impl MarkerConvention {
    pub fn marker(self) -> &'static str {
        match self {
            MarkerConvention::Fullwidth => "＃",
            MarkerConvention::Ascii => "#",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrimMode {
    Always,
    Never,
    /// Trim only when the original file is laid out vertically
    #[default]
    Auto,
}

impl TrimMode {
    pub fn resolve(self, original_is_vertical: bool) -> bool {
        match self {
            TrimMode::Always => true,
            TrimMode::Never => false,
            TrimMode::Auto => original_is_vertical,
        }
    }
}

fn default_diagnostic() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CheckConfig {
    #[serde(default, alias = "translated_source_marker")]
    pub translated_marker: MarkerConvention,

    #[serde(default)]
    pub trim: TrimMode,

    #[serde(default = "default_diagnostic")]
    pub diagnostic: bool,

    /// `None` means detect per file
    #[serde(default)]
    pub translated_encoding: Option<TextEncoding>,

    #[serde(default)]
    pub speakers: BTreeMap<String, String>,

    #[serde(default)]
    pub speaker_map_path: Option<PathBuf>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            translated_marker: MarkerConvention::default(),
            trim: TrimMode::default(),
            diagnostic: default_diagnostic(),
            translated_encoding: None,
            speakers: BTreeMap::new(),
            speaker_map_path: None,
        }
    }
}

impl CheckConfig {
    pub fn load(path: &Path) -> CoreResult<Self> {
        let data = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let mut cfg: CheckConfig = serde_json::from_str(&data)?;

        // relative map paths are resolved against the config file
        if let (Some(map), Some(dir)) = (cfg.speaker_map_path.as_mut(), path.parent()) {
            if map.is_relative() {
                *map = dir.join(&*map);
            }
        }

        cfg.check()?;
        Ok(cfg)
    }

    /// Rejects settings that would only fail later, halfway through a run.
    pub fn check(&self) -> CoreResult<()> {
        if let Some(map) = &self.speaker_map_path {
            if map.as_os_str().is_empty() {
                return Err(CoreError::Config("speaker_map_path is empty".into()));
            }
            if !map.is_file() {
                return Err(CoreError::Config(format!(
                    "speaker map {} is not a file",
                    map.display()
                )));
            }
        }
        Ok(())
    }

    /// Inline speakers merged with the map file, if one is configured.
    /// Inline pairs win over the file.
    pub fn speaker_registry(&self) -> CoreResult<SpeakerRegistry> {
        let mut pairs = match &self.speaker_map_path {
            Some(path) => SpeakerRegistry::read_pairs(path)?,
            None => BTreeMap::new(),
        };
        pairs.extend(self.speakers.iter().map(|(k, v)| (k.clone(), v.clone())));
        SpeakerRegistry::from_pairs(pairs)
    }
}
