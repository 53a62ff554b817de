use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::generator::online::DEFAULT_ONLINE_DELAY;
use crate::generator::simulated::DEFAULT_SIMULATED_DELAY;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorBackend {
    RuleBased,
    Simulated,
    Remote,
}

impl Display for GeneratorBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RuleBased => write!(f, "rule_based"),
            Self::Simulated => write!(f, "simulated"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

impl FromStr for GeneratorBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "rule_based" | "rules" => Ok(Self::RuleBased),
            "simulated" | "ai" => Ok(Self::Simulated),
            "remote" => Ok(Self::Remote),
            other => Err(anyhow!("unknown generator backend: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_backend")]
    pub backend: GeneratorBackend,
    #[serde(default = "default_simulated_delay_ms")]
    pub simulated_delay_ms: u64,
    #[serde(default = "default_online_delay_ms")]
    pub online_delay_ms: u64,
    #[serde(default)]
    pub remote_endpoint: String,
    #[serde(default = "default_remote_timeout_secs")]
    pub remote_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub db_path: Option<String>,
    pub backend: Option<GeneratorBackend>,
    pub remote_endpoint: Option<String>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/kitchen-chef/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(db_path) = overrides.db_path {
            self.storage.db_path = db_path;
        }
        if let Some(backend) = overrides.backend {
            self.generator.backend = backend;
        }
        if let Some(endpoint) = overrides.remote_endpoint {
            self.generator.remote_endpoint = endpoint;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    pub fn default_template() -> String {
        let template = r#"[storage]
db_path = "~/.local/share/kitchen-chef/kitchen.db"

[generator]
# rule_based | simulated | remote
backend = "simulated"
simulated_delay_ms = 2000
online_delay_ms = 1500
remote_endpoint = ""
remote_timeout_secs = 15

[history]
limit = 10
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            simulated_delay_ms: default_simulated_delay_ms(),
            online_delay_ms: default_online_delay_ms(),
            remote_endpoint: String::new(),
            remote_timeout_secs: default_remote_timeout_secs(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: default_history_limit(),
        }
    }
}

fn default_db_path() -> String {
    "~/.local/share/kitchen-chef/kitchen.db".to_string()
}

fn default_backend() -> GeneratorBackend {
    GeneratorBackend::Simulated
}

fn default_simulated_delay_ms() -> u64 {
    DEFAULT_SIMULATED_DELAY.as_millis() as u64
}

fn default_online_delay_ms() -> u64 {
    DEFAULT_ONLINE_DELAY.as_millis() as u64
}

fn default_remote_timeout_secs() -> u64 {
    15
}

fn default_history_limit() -> usize {
    10
}
