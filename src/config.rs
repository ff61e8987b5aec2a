use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;

pub const DEFAULT_CONFIG_TOML: &str = r#"
[history]
max_commits = 20

[git]
program = "git"

[ui]

[logging]
"#;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub max_commits: usize,
    pub git_program: String,
    pub git_workdir: Option<PathBuf>,
    pub theme_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    history: HistorySection,
    git: GitSection,
    #[serde(default)]
    ui: UiSection,
    #[serde(default)]
    logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
struct HistorySection {
    max_commits: usize,
}

#[derive(Debug, Deserialize)]
struct GitSection {
    program: String,
}

#[derive(Debug, Default, Deserialize)]
struct UiSection {
    theme_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingSection {
    file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_toml_str("").unwrap_or_else(|_| Self {
            max_commits: 20,
            git_program: "git".to_string(),
            git_workdir: None,
            theme_file: None,
            log_file: None,
        })
    }
}

impl AppConfig {
    /// Loads `explicit` if given, otherwise `~/.rebase-tui/config.toml` when
    /// it exists. A missing default file means built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match explicit {
            Some(path) => (Some(path.to_path_buf()), true),
            None => (default_config_path(), false),
        };
        let Some(path) = path else {
            return Ok(Self::default());
        };
        match fs::read_to_string(&path) {
            Ok(text) => Self::from_toml_str(&text).map_err(|err| match err {
                ConfigError::Parse { source, .. } => ConfigError::Parse { path, source },
                other => other,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut merged = parse_toml_table(DEFAULT_CONFIG_TOML)?;
        merge_toml_tables(&mut merged, parse_toml_table(text)?);
        let file = merged.try_into::<ConfigFile>().map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<config>"),
            source,
        })?;
        if file.history.max_commits == 0 {
            return Err(ConfigError::Invalid(
                "history.max_commits must be at least 1".to_string(),
            ));
        }
        let program = file.git.program.trim();
        if program.is_empty() {
            return Err(ConfigError::Invalid("git.program must not be empty".to_string()));
        }
        Ok(Self {
            max_commits: file.history.max_commits,
            git_program: program.to_string(),
            git_workdir: None,
            theme_file: file.ui.theme_file,
            log_file: file.logging.file,
        })
    }

    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(count) = cli.max_count {
            self.max_commits = count as usize;
        }
        if let Some(program) = &cli.git {
            self.git_program = program.clone();
        }
        if let Some(dir) = &cli.workdir {
            self.git_workdir = Some(dir.clone());
        }
        if let Some(path) = &cli.log_file {
            self.log_file = Some(path.clone());
        }
        self
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".rebase-tui").join("config.toml"))
}

fn parse_toml_table(text: &str) -> Result<toml::Value, ConfigError> {
    if text.trim().is_empty() {
        return Ok(toml::Value::Table(toml::map::Map::new()));
    }
    toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: PathBuf::from("<config>"),
        source,
    })
}

fn merge_toml_tables(base: &mut toml::Value, override_value: toml::Value) {
    match (base, override_value) {
        (toml::Value::Table(base_map), toml::Value::Table(override_map)) => {
            for (key, override_item) in override_map {
                if let Some(base_item) = base_map.get_mut(&key) {
                    merge_toml_tables(base_item, override_item);
                } else {
                    base_map.insert(key, override_item);
                }
            }
        }
        (base_slot, override_item) => {
            *base_slot = override_item;
        }
    }
}
