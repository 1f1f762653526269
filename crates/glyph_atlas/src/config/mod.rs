//! Configuration system

use std::path::Path;

pub use serde::{Serialize, Deserialize};

use crate::text::{Alphabet, FontResult};

/// Default rasterization size in pixels
pub const DEFAULT_PIXEL_HEIGHT: u32 = 32;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy)]
enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Settings for building one atlas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasSettings {
    /// Rasterization height in pixels
    pub pixel_height: u32,

    /// Characters to pack, in atlas order
    pub alphabet: String,
}

impl AtlasSettings {
    /// Validate the configured characters into an [`Alphabet`]
    pub fn alphabet(&self) -> FontResult<Alphabet> {
        Alphabet::new(&self.alphabet)
    }
}

impl Default for AtlasSettings {
    fn default() -> Self {
        Self {
            pixel_height: DEFAULT_PIXEL_HEIGHT,
            alphabet: Alphabet::STANDARD.to_string(),
        }
    }
}

impl Config for AtlasSettings {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::FontError;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("glyph_atlas_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_default_settings_use_standard_alphabet() {
        let settings = AtlasSettings::default();
        assert_eq!(settings.pixel_height, DEFAULT_PIXEL_HEIGHT);
        assert_eq!(settings.alphabet().unwrap(), Alphabet::standard());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let settings: AtlasSettings = toml::from_str("pixel_height = 18").unwrap();
        assert_eq!(settings.pixel_height, 18);
        assert_eq!(settings.alphabet, Alphabet::STANDARD);
    }

    #[test]
    fn test_toml_file_round_trip() {
        let path = temp_path("settings.toml");
        let settings = AtlasSettings {
            pixel_height: 24,
            alphabet: " .0123456789".to_string(),
        };

        settings.save_to_file(&path).unwrap();
        let loaded = AtlasSettings::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_ron_file_round_trip() {
        let path = temp_path("settings.ron");
        let settings = AtlasSettings {
            pixel_height: 12,
            alphabet: "ab.\"\\".to_string(),
        };

        settings.save_to_file(&path).unwrap();
        let loaded = AtlasSettings::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = AtlasSettings::default().save_to_file(temp_path("settings.json"));
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_invalid_alphabet_is_reported() {
        let settings = AtlasSettings {
            pixel_height: 16,
            alphabet: "abca".to_string(),
        };
        assert!(matches!(settings.alphabet(), Err(FontError::DuplicateCharacter('a'))));
    }
}
