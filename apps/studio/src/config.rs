use std::fs;
use std::path::{Path, PathBuf};

use atelier_core::generator::BackendConfig;
use atelier_core::ApiConfig;

/// High-level configuration for the studio server
#[derive(Clone, Debug)]
pub struct StudioConfig {
    pub api: ApiConfig,
    pub backend: BackendConfig,
    /// Directory the file slot store writes under
    pub data_dir: PathBuf,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::from_env(),
            backend: BackendConfig::default(),
            data_dir: std::env::var("ATELIER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
        }
    }
}

impl StudioConfig {
    /// Load configuration from a TOML file (path via STUDIO_CONFIG or
    /// ./studio.toml), overlaying values onto env-driven defaults.
    pub fn load() -> Self {
        let default = Self::default();
        let path = std::env::var("STUDIO_CONFIG").unwrap_or_else(|_| "studio.toml".into());
        let p = Path::new(&path);
        if !p.exists() {
            tracing::info!(target = "studio", path = %path, "No TOML config found; using defaults/env");
            return default;
        }
        match fs::read_to_string(p) {
            Ok(s) => match toml::from_str::<StudioToml>(&s) {
                Ok(t) => t.overlay(default),
                Err(e) => {
                    tracing::warn!(target = "studio", error = %e, "Failed to parse TOML; using defaults");
                    default
                }
            },
            Err(e) => {
                tracing::warn!(target = "studio", error = %e, "Failed to read TOML; using defaults");
                default
            }
        }
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct StudioToml {
    pub data_dir: Option<PathBuf>,
    pub server: Option<ServerToml>,
    pub llm: Option<LlmToml>,
}

impl StudioToml {
    fn overlay(self, mut base: StudioConfig) -> StudioConfig {
        if let Some(d) = self.data_dir {
            base.data_dir = d;
        }
        if let Some(s) = self.server {
            s.apply(&mut base.api);
        }
        if let Some(l) = self.llm {
            l.apply(&mut base.backend);
        }
        base
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct ServerToml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub admin_password: Option<String>,
}
impl ServerToml {
    fn apply(self, a: &mut ApiConfig) {
        if let Some(v) = self.host {
            a.host = v;
        }
        if let Some(v) = self.port {
            a.port = v;
        }
        if let Some(v) = self.admin_password {
            a.admin_password = v;
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct LlmToml {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}
impl LlmToml {
    fn apply(self, b: &mut BackendConfig) {
        if let Some(v) = self.base_url {
            b.base_url = v;
        }
        if let Some(v) = self.model {
            b.model = v;
        }
        if let Some(v) = self.api_key {
            b.api_key = Some(v);
        }
        if let Some(v) = self.request_timeout_ms {
            b.request_timeout_ms = v;
        }
        if let Some(v) = self.temperature {
            b.temperature = v;
        }
        if let Some(v) = self.max_output_tokens {
            b.max_output_tokens = v;
        }
    }
}
