//! User configuration (`~/.texweave.toml`).
//!
//! Every section and key is optional; anything missing falls back to the
//! defaults below. A missing file is not an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// File name of the user configuration, relative to the home directory.
pub const CONFIG_FILE_NAME: &str = ".texweave.toml";

/// Contents written by `--init-config`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# texweave configuration
# Place this file at ~/.texweave.toml

[author]
name = "Your Name"
email = "your.email@example.com"

[footer]
copyright_year = "2025"
license = "CC BY 4.0"
custom_text = ""

[output]
default_theme = "academic"
default_formats = ["html5"]  # e.g. ["html5", "markdown", "epub"]
default_components = ["reading-time", "back-to-top", "theme-toggle"]
# resources_dir = "/path/to/resources"  # overrides bundled themes/components
"#;

// =============================================================================
// ConfigError
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{} already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("cannot locate home directory")]
    NoHome,
}

// =============================================================================
// Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub author: AuthorConfig,
    pub footer: FooterConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorConfig {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    /// Accepts `2025` as well as `"2025"`
    #[serde(deserialize_with = "string_or_integer")]
    pub copyright_year: String,
    pub license: String,
    pub custom_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub default_theme: String,
    pub default_formats: Vec<String>,
    pub default_components: Vec<String>,
    pub resources_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_theme: "academic".into(),
            default_formats: vec!["html5".into()],
            default_components: Vec::new(),
            resources_dir: None,
        }
    }
}

fn string_or_integer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Text(String),
        Number(i64),
    }

    Ok(match Year::deserialize(deserializer)? {
        Year::Text(s) => s,
        Year::Number(n) => n.to_string(),
    })
}

/// Footer settings as exposed to the footer component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FooterData {
    pub author_name: String,
    pub author_email: String,
    pub copyright_year: String,
    pub license: String,
    pub custom_text: String,
}

impl Config {
    /// `~/.texweave.toml`, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .filter(|home| !home.is_empty())
            .map(|home| PathBuf::from(home).join(CONFIG_FILE_NAME))
    }

    /// Parse configuration text.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the user configuration, falling back to defaults with a warning
    /// when it cannot be read.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        Self::load_from(&path).unwrap_or_else(|e| {
            log::warn!("{e}; using default configuration");
            Self::default()
        })
    }

    /// Data for the footer configuration tag.
    pub fn footer_data(&self) -> FooterData {
        FooterData {
            author_name: self.author.name.clone(),
            author_email: self.author.email.clone(),
            copyright_year: self.footer.copyright_year.clone(),
            license: self.footer.license.clone(),
            custom_text: self.footer.custom_text.clone(),
        }
    }
}

/// Write [`DEFAULT_CONFIG_TEMPLATE`] to `path`.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn init_config(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.default_theme, "academic");
        assert_eq!(config.output.default_formats, ["html5"]);
        assert!(config.output.default_components.is_empty());
        assert!(config.author.name.is_empty());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml_str(
            r#"
[author]
name = "Ada Lovelace"

[output]
default_components = ["toc", "footer"]
"#,
        )
        .unwrap();
        assert_eq!(config.author.name, "Ada Lovelace");
        assert_eq!(config.author.email, "");
        assert_eq!(config.output.default_theme, "academic");
        assert_eq!(config.output.default_components, ["toc", "footer"]);
    }

    #[test]
    fn test_year_as_integer() {
        let config = Config::from_toml_str("[footer]\ncopyright_year = 2024\n").unwrap();
        assert_eq!(config.footer.copyright_year, "2024");
    }

    #[test]
    fn test_template_parses() {
        let config = Config::from_toml_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.footer.license, "CC BY 4.0");
        assert_eq!(config.output.default_components.len(), 3);
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::from_toml_str("invalid_toml").is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[output\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        init_config(&path, false).unwrap();
        assert!(matches!(init_config(&path, false), Err(ConfigError::AlreadyExists(_))));

        fs::write(&path, "# edited").unwrap();
        init_config(&path, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG_TEMPLATE);
    }

    #[test]
    fn test_footer_data_json() {
        let mut config = Config::default();
        config.author.name = "Ada".into();
        config.footer.copyright_year = "2025".into();
        let json = serde_json::to_string(&config.footer_data()).unwrap();
        assert_eq!(
            json,
            r#"{"author_name":"Ada","author_email":"","copyright_year":"2025","license":"","custom_text":""}"#
        );
    }
}
