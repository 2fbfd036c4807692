use crate::error::{ConvertError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "notion2anki.toml";

/// Conversion options, optionally loaded from a TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Emit the `Notion-ID,Front,Back,Tags` header row.
    pub include_header: bool,
    /// Separator used when joining tag tokens into the Tags field.
    /// Anki expects a single space.
    pub tag_separator: String,
    /// When true, the first defective row aborts the run instead of
    /// being skipped with a warning.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_header: true,
            tag_separator: " ".to_string(),
            strict: false,
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, or from
    /// `notion2anki.toml` in the working directory if present.
    /// With no config file, defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p,
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = fs::read_to_string(path).map_err(|e| {
            ConvertError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_no_file() {
        let config = Config::load(None).unwrap();
        assert!(config.include_header);
        assert_eq!(config.tag_separator, " ");
        assert!(!config.strict);
    }

    #[test]
    fn loads_overrides_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "include_header = false\nstrict = true").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert!(!config.include_header);
        assert!(config.strict);
        // Unset fields keep their defaults
        assert_eq!(config.tag_separator, " ");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = Config::load(Some(Path::new("does/not/exist.toml")));
        assert!(result.is_err());
    }
}
