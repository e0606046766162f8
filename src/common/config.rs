use std::path::{Path, PathBuf};
use std::{fs, io};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

pub fn config_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("compass")
        .join("compass.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub settings: Settings,
    pub log: LogSettings,
}

/// Which rule normalizes the focused window's frame before comparison.
/// Candidates always use the global rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSpace {
    #[default]
    Global,
    MainScreen,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Consider windows without a title while navigating.
    pub include_untitled: bool,
    pub focused_frame_space: FrameSpace,
    /// Requests slower than this are logged as warnings.
    pub latency_budget_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            include_untitled: true,
            focused_frame_space: FrameSpace::Global,
            latency_budget_ms: 30,
        }
    }
}

impl Settings {
    /// Settings for a one-off window listing, which shows untitled windows
    /// only when asked to.
    pub fn for_listing(self, include_untitled: bool) -> Settings {
        Settings { include_untitled, ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self { Self { filter: "compass_wm=info,compass=info".to_string() } }
}

impl Config {
    /// Reads the config at `path`. When `path` is the default location and
    /// nothing exists there, the defaults are used.
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        match fs::read_to_string(path) {
            Ok(buf) => Self::parse(&buf).with_context(|| format!("in {}", path.display())),
            Err(e) if e.kind() == io::ErrorKind::NotFound && path == config_file() => {
                Ok(Config::default())
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> {
        let config: Config = toml::from_str(buf)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.settings.latency_budget_ms == 0 {
            bail!("settings.latency_budget_ms must be greater than 0");
        }
        if self.log.filter.trim().is_empty() {
            bail!("log.filter must not be empty");
        }
        Ok(())
    }

    pub fn to_toml(&self) -> anyhow::Result<String> { Ok(toml::to_string(self)?) }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn default_config_validates() {
        Config::default().validate().unwrap();
        assert!(Config::default().settings.include_untitled);
    }

    #[test]
    fn parses_partial_settings() {
        let config = Config::parse(
            r#"
            [settings]
            focused_frame_space = "main_screen"
            include_untitled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.settings.focused_frame_space, FrameSpace::MainScreen);
        assert!(!config.settings.include_untitled);
        assert_eq!(config.settings.latency_budget_ms, 30);
        assert_eq!(config.log, LogSettings::default());
    }

    #[test]
    fn rejects_unknown_keys_and_zero_budget() {
        assert!(Config::parse("[settings]\nhotkeys = []\n").is_err());
        assert!(Config::parse("[settings]\nlatency_budget_ms = 0\n").is_err());
        assert!(Config::parse("[log]\nfilter = \" \"\n").is_err());
    }

    #[test]
    fn reads_explicit_file_and_requires_it_to_exist() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[settings]\nlatency_budget_ms = 12").unwrap();
        let config = Config::read(file.path()).unwrap();
        assert_eq!(config.settings.latency_budget_ms, 12);

        let dir = tempfile::tempdir().unwrap();
        assert!(Config::read(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn printed_config_parses_back() {
        let config = Config::default();
        assert_eq!(Config::parse(&config.to_toml().unwrap()).unwrap(), config);
    }
}
