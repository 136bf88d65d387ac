use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the precomputed ratings artifact
    #[serde(default = "default_artifact_path")]
    pub artifact_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of recommendations returned when the caller does not ask for a count
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Largest count a caller may ask for over HTTP
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,
}

fn default_artifact_path() -> String {
    "artifacts/movies_pivot.bin".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_top_k() -> usize {
    5
}

fn default_max_top_k() -> usize {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            artifact_path: default_artifact_path(),
            host: default_host(),
            port: default_port(),
            default_top_k: default_top_k(),
            max_top_k: default_max_top_k(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.default_top_k > self.max_top_k {
            anyhow::bail!(
                "DEFAULT_TOP_K ({}) exceeds MAX_TOP_K ({})",
                self.default_top_k,
                self.max_top_k
            );
        }
        Ok(())
    }
}
