use common::storage::s3::S3Settings;
use common::vision::openai::VisionSettings;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the landing page.
    pub static_dir: String,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: S3Settings,
    pub vision: VisionSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.static_dir", "static")?
            .set_default("server.cors.allow_origins", vec!["*"])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("storage.region", "us-east-1")?
            .set_default("storage.bucket", "images")?
            .set_default("vision.api_base", "https://api.openai.com/v1")?
            .set_default("vision.model", "gpt-4o")?
            .set_default("vision.max_tokens", 1000)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., LENSCORE__VISION__API_KEY)
            .add_source(Environment::with_prefix("LENSCORE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
