use log::debug;
use mdtree_syntax::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Where rendered output goes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Write here instead of stdout. `~` and `$VAR` are expanded on load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
}

/// Contents of `config.toml`. Every table and key is optional.
///
/// ```toml
/// [parse]
/// math = false
///
/// [output]
/// output_path = "~/trees/latest.json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parse: ParseOptions,
    pub output: OutputOptions,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            debug!("no config file at {}", config_path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the output path
        config.output.output_path = config
            .output
            .output_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        debug!("loaded config from {}", config_path.display());
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/mdtree");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Expand `~` and `$VAR` in `path`. `None` when a variable is unset.
    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/mdtree/config.toml"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.parse.math);
        assert_eq!(config.output.output_path, None);
    }

    #[test]
    fn test_partial_parse_table_keeps_other_defaults() {
        let config: Config = toml::from_str("[parse]\nmath = false\n").unwrap();
        assert!(!config.parse.math);
        assert!(config.parse.gfm_task_list);
        assert!(config.parse.emoji);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("MDTREE_TEST_OUT", "/test/env/path");
        }

        let path = PathBuf::from("$MDTREE_TEST_OUT/tree.json");
        let expanded = Config::expand_path(&path);
        assert_eq!(expanded, Some(PathBuf::from("/test/env/path/tree.json")));

        unsafe {
            env::remove_var("MDTREE_TEST_OUT");
        }
    }

    #[test]
    fn test_expand_path_with_unset_var() {
        let path = PathBuf::from("$MDTREE_TEST_SURELY_UNSET/x");
        assert_eq!(Config::expand_path(&path), None);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[parse\nmath = ").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        match &err {
            ConfigError::ConfigParseError { config_path, .. } => {
                assert_eq!(config_path, &config_file)
            }
            other => panic!("expected parse error, got {other:?}"),
        }
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/dir/config.toml");
        let test_config = Config {
            parse: ParseOptions::commonmark(),
            output: OutputOptions {
                output_path: Some(PathBuf::from("/tmp/tree.json")),
            },
        };

        test_config.save_to_path(&config_file).unwrap();
        assert!(config_file.exists(), "Config file should exist");

        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_output_path_expanded_on_load() {
        unsafe {
            env::set_var("MDTREE_TEST_ROOT", "/custom/out");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "[output]\noutput_path = \"$MDTREE_TEST_ROOT/tree.json\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(
            config.output.output_path,
            Some(PathBuf::from("/custom/out/tree.json"))
        );

        unsafe {
            env::remove_var("MDTREE_TEST_ROOT");
        }
    }
}
