use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration, read from `$XDG_CONFIG_HOME/synctex-jump/config.yaml`.
///
/// Command-line flags take precedence over every field.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// tmux executable (default: "tmux" from PATH).
    #[serde(default)]
    pub tmux: Option<PathBuf>,

    /// Editor executables recognized in addition to vim and nvim.
    #[serde(default)]
    pub editors: Vec<String>,

    /// Log file used when `--log` is not given.
    #[serde(default)]
    pub log: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

pub fn load_config() -> anyhow::Result<Config> {
    let Some(dir) = super::dirs::config_dir() else {
        return Ok(Config::default());
    };
    load_config_from_dir(&dir.join("synctex-jump"))
}

pub fn load_config_from_dir(dir: &Path) -> anyhow::Result<Config> {
    for filename in &["config.yaml", "config.yml"] {
        let path = dir.join(filename);
        match std::fs::read_to_string(&path) {
            Ok(content) => return parse_config(&content, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(ConfigError::ReadError { path, source: e }.into()),
        }
    }

    Ok(Config::default())
}

fn parse_config(content: &str, path: &Path) -> anyhow::Result<Config> {
    // An empty file deserializes to unit, not to an empty mapping
    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    serde_yaml::from_str(content)
        .map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn config_default_is_empty() {
        let config = Config::default();

        assert_eq!(config.tmux, None);
        assert!(config.editors.is_empty());
        assert_eq!(config.log, None);
    }

    #[test]
    fn parse_full_yaml_config() {
        let yaml = indoc! {"
            tmux: /opt/homebrew/bin/tmux
            editors:
              - gvim
              - vi
            log: /tmp/synctex-jump.log
        "};
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.tmux, Some(PathBuf::from("/opt/homebrew/bin/tmux")));
        assert_eq!(config.editors, vec!["gvim", "vi"]);
        assert_eq!(config.log, Some(PathBuf::from("/tmp/synctex-jump.log")));
    }

    #[test]
    fn parse_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("editors: [vi]\n").unwrap();

        assert_eq!(config.tmux, None);
        assert_eq!(config.editors, vec!["vi"]);
        assert_eq!(config.log, None);
    }

    #[test]
    fn load_config_from_dir_returns_default_when_missing() {
        let dir = TempDir::new().unwrap();

        let config = load_config_from_dir(dir.path()).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_config_from_dir_reads_yml_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yml"), "tmux: /usr/local/bin/tmux\n").unwrap();

        let config = load_config_from_dir(dir.path()).unwrap();

        assert_eq!(config.tmux, Some(PathBuf::from("/usr/local/bin/tmux")));
    }

    #[test]
    fn load_config_from_dir_prefers_yaml_over_yml() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), "editors: [a]\n").unwrap();
        fs::write(dir.path().join("config.yml"), "editors: [b]\n").unwrap();

        let config = load_config_from_dir(dir.path()).unwrap();

        assert_eq!(config.editors, vec!["a"]);
    }

    #[test]
    fn load_config_from_dir_accepts_empty_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), "\n").unwrap();

        let config = load_config_from_dir(dir.path()).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_config_from_dir_rejects_unknown_fields() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), "editor: vim\n").unwrap();

        let err = load_config_from_dir(dir.path()).unwrap_err();

        match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::ParseError { path, .. }) => {
                assert_eq!(path, &dir.path().join("config.yaml"));
            }
            other => panic!("expected ParseError, got: {other:?}"),
        }
    }

    #[test]
    fn load_config_uses_xdg_config_home() {
        let dir = TempDir::new().unwrap();
        let app_dir = dir.path().join("synctex-jump");
        fs::create_dir_all(&app_dir).unwrap();
        fs::write(app_dir.join("config.yaml"), "editors: [vi]\n").unwrap();

        temp_env::with_var("XDG_CONFIG_HOME", Some(dir.path()), || {
            let config = load_config().unwrap();
            assert_eq!(config.editors, vec!["vi"]);
        });
    }
}
