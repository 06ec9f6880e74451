//! Shared configuration loader for the ruletree tools.
//!
//! `defaults/ruletree.default.toml` is embedded into every binary so that docs and runtime
//! behavior stay in sync. Applications layer user-specific files on top of those defaults via
//! [`Loader`] before deserializing into [`RuletreeConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat};
use ruletree::{BuildOptions, CloseMatching, EndOffset};
use serde::Deserialize;
use std::path::Path;

pub use config::{ConfigError, ValueKind};

const DEFAULT_TOML: &str = include_str!("../defaults/ruletree.default.toml");

/// Top-level configuration consumed by ruletree applications.
#[derive(Debug, Clone, Deserialize)]
pub struct RuletreeConfig {
    pub build: BuildConfig,
    pub output: OutputConfig,
}

/// Tree building policies.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    pub close_matching: CloseMatchingConfig,
    pub end_offset: EndOffsetConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloseMatchingConfig {
    Unconditional,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndOffsetConfig {
    LastText,
    LastChild,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: String,
    pub show_loc: bool,
}

impl From<&BuildConfig> for BuildOptions {
    fn from(config: &BuildConfig) -> Self {
        BuildOptions {
            close_matching: match config.close_matching {
                CloseMatchingConfig::Unconditional => CloseMatching::Unconditional,
                CloseMatchingConfig::Strict => CloseMatching::Strict,
            },
            end_offset: match config.end_offset {
                EndOffsetConfig::LastText => EndOffset::LastText,
                EndOffsetConfig::LastChild => EndOffset::LastChild,
            },
        }
    }
}

impl RuletreeConfig {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions::from(&self.build)
    }
}

/// Configuration sources, lowest precedence first: the embedded defaults, then files in the
/// order they were added, then key overrides.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Self {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Add a TOML file that must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), true)
    }

    /// Add a TOML file that is skipped when absent.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), false)
    }

    fn with_toml(mut self, path: &Path, required: bool) -> Self {
        let file = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(file);
        self
    }

    /// Set one dotted key, e.g. `output.format`.
    pub fn set_override<V>(mut self, key: &str, value: V) -> Result<Self, ConfigError>
    where
        V: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Set several dotted keys in order. A later entry for the same key wins.
    pub fn set_overrides<'k, I, V>(self, overrides: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'k str, V)>,
        V: Into<ValueKind>,
    {
        overrides
            .into_iter()
            .try_fold(self, |loader, (key, value)| loader.set_override(key, value))
    }

    pub fn build(self) -> Result<RuletreeConfig, ConfigError> {
        let config = self.builder.build()?;
        config.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults with nothing layered on top.
pub fn load_defaults() -> Result<RuletreeConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.build.close_matching, CloseMatchingConfig::Unconditional);
        assert_eq!(config.build.end_offset, EndOffsetConfig::LastText);
        assert_eq!(config.output.format, "json");
        assert!(!config.output.show_loc);
        assert_eq!(config.build_options(), BuildOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("build.close_matching", "strict")
            .expect("override to apply")
            .set_override("output.format", "treeviz")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.build_options(), BuildOptions::strict());
        assert_eq!(config.output.format, "treeviz");
    }

    #[test]
    fn applies_override_lists_in_order() {
        let overrides: Vec<(&str, ValueKind)> = vec![
            ("output.format", "treeviz".into()),
            ("output.show_loc", true.into()),
            ("output.format", "json-compact".into()),
        ];
        let config = Loader::new().set_overrides(overrides).unwrap().build().unwrap();
        assert_eq!(config.output.format, "json-compact");
        assert!(config.output.show_loc);
    }

    #[test]
    fn overrides_beat_files() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[output]\nformat = \"treeviz\"").unwrap();

        let config = Loader::new()
            .with_file(file.path())
            .set_override("output.format", "json-compact")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.output.format, "json-compact");
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[build]\nend_offset = \"last-child\"").unwrap();

        let config = Loader::new().with_file(file.path()).build().unwrap();
        assert_eq!(config.build_options().end_offset, EndOffset::LastChild);
        assert_eq!(config.build_options().close_matching, CloseMatching::Unconditional);
    }

    #[test]
    fn optional_file_may_be_missing() {
        let config = Loader::new()
            .with_optional_file("/no/such/ruletree.toml")
            .build()
            .unwrap();
        assert_eq!(config.output.format, "json");
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = Loader::new()
            .set_override("build.end_offset", "somewhere")
            .unwrap()
            .build();
        assert!(err.is_err());
    }
}
