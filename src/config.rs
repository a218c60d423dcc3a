use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{
    builder::{BuildOptions, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH},
    request::{DEFAULT_MIME_TYPE, MetadataOptions, PLACEHOLDER_ENCRYPTED_KEY},
};

pub const ENV_PREFIX: &str = "UPREQ_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConfigFile {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub mime_type: Option<String>,
    pub encrypted_key: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigEnv {
    input: Option<String>,
    output: Option<String>,
    mime_type: Option<String>,
    encrypted_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mime_type: String,
    pub encrypted_key: String,
}

impl Config {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            input: self.input.clone(),
            output: self.output.clone(),
            filename: None,
            metadata: MetadataOptions {
                mime_type: self.mime_type.clone(),
                encrypted_key: self.encrypted_key.clone(),
                folder_id: None,
            },
        }
    }
}

fn merge_config(base: ConfigFile, override_config: ConfigEnv) -> Config {
    let input = override_config
        .input
        .map(PathBuf::from)
        .or(base.input)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH));

    let output = override_config
        .output
        .map(PathBuf::from)
        .or(base.output)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));

    let mime_type = override_config
        .mime_type
        .or(base.mime_type)
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

    let encrypted_key = override_config
        .encrypted_key
        .or(base.encrypted_key)
        .unwrap_or_else(|| PLACEHOLDER_ENCRYPTED_KEY.to_string());

    Config {
        input,
        output,
        mime_type,
        encrypted_key,
    }
}

pub fn config_file_path() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("com", "upreq", "upreq")
        .ok_or(anyhow!("Unable to determine home directory"))?;
    Ok(project_dirs.config_dir().join("config.toml"))
}

pub fn read_config() -> Result<Config> {
    let _ = dotenv();
    let env_config = envy::prefixed(ENV_PREFIX)
        .from_env::<ConfigEnv>()
        .unwrap_or_default();

    let config_file = config_file_path()?;
    let file_config = if let Ok(config) = fs::read_to_string(&config_file) {
        toml::from_str(&config)
            .with_context(|| format!("Failed to parse {}", config_file.display()))?
    } else {
        ConfigFile::default()
    };

    Ok(merge_config(file_config, env_config))
}

pub fn write_config(config: ConfigFile) -> Result<PathBuf> {
    let config_file = config_file_path()?;
    if let Some(parent) = config_file.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let content = toml::to_string_pretty(&config)?;
    fs::write(&config_file, content)
        .with_context(|| format!("Failed to write {}", config_file.display()))?;
    Ok(config_file)
}
