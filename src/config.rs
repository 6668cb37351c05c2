use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    server: ServerConfig,
    api: ApiConfig,
    glossary: GlossaryConfig,
    storage: StorageConfig,
    #[serde(default)]
    chat: ChatConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ApiConfig {
    provider: String,
    #[serde(default)]
    key: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    model: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GlossaryConfig {
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
struct StorageConfig {
    data_dir: String,
    #[serde(default)]
    persist_transcripts: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatConfig {
    #[serde(default = "default_history_window")]
    history_window: usize,
    #[serde(default = "default_max_reply_tokens")]
    max_reply_tokens: u64,
    #[serde(default = "default_spell_correction")]
    spell_correction: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            max_reply_tokens: default_max_reply_tokens(),
            spell_correction: default_spell_correction(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_history_window() -> usize {
    3
}

fn default_max_reply_tokens() -> u64 {
    256
}

fn default_spell_correction() -> bool {
    true
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_provider: String,
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub glossary_path: PathBuf,
    pub data_dir: PathBuf,
    pub persist_transcripts: bool,
    pub history_window: usize,
    pub max_reply_tokens: u64,
    pub spell_correction: bool,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config_file: ConfigFile =
            toml::from_str(&content).context("Failed to parse config file")?;

        Ok(Self {
            host: config_file.server.host,
            port: config_file.server.port,
            api_provider: config_file.api.provider,
            api_key: config_file.api.key,
            api_url: config_file.api.url,
            model: config_file.api.model,
            glossary_path: config_file.glossary.path.into(),
            data_dir: config_file.storage.data_dir.into(),
            persist_transcripts: config_file.storage.persist_transcripts,
            history_window: config_file.chat.history_window,
            max_reply_tokens: config_file.chat.max_reply_tokens,
            spell_correction: config_file.chat.spell_correction,
        })
    }

    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            api_provider: "local".to_string(),
            api_key: String::new(),
            api_url: String::new(),
            model: String::new(),
            glossary_path: "glossary.json".into(),
            data_dir: ".".into(),
            persist_transcripts: false,
            history_window: default_history_window(),
            max_reply_tokens: default_max_reply_tokens(),
            spell_correction: default_spell_correction(),
        }
    }
}
