use std::path::{Path, PathBuf};
use std::{env, fs};

use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::Deserialize;
use terminal::TerminalConfig;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct FormConfig {
    /// Display name of the form; the callable's name when unset.
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct LogConfig {
    /// Level used when `RUST_LOG` is not set, e.g. `debug`.
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub terminal: TerminalConfig,
    /// Config files that were found.
    #[serde(skip)]
    pub sources: Vec<PathBuf>,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    /// Load defaults, then `config.json5` and `config.toml` from `config_dir`
    /// (or the platform config directory).
    pub fn new(config_dir: Option<&Path>) -> Result<Self, config::ConfigError> {
        let data_dir = get_data_dir();
        let config_dir = config_dir.map(Path::to_path_buf).unwrap_or_else(get_config_dir);
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().into_owned())?
            .set_default("config_dir", config_dir.to_string_lossy().into_owned())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut sources = Vec::new();
        for (file, format) in &config_files {
            let path = config_dir.join(file);
            let source = config::File::from(path.as_path())
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if path.exists() {
                sources.push(path);
            }
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        cfg.sources = sources;
        Ok(cfg)
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "guinputs", env!("CARGO_PKG_NAME"))
}

pub fn ensure_data_dir_exists(config: &Config) -> std::io::Result<()> {
    if !config.config.data_dir.exists() {
        fs::create_dir_all(&config.config.data_dir)?;
    }
    Ok(())
}
