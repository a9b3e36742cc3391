use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Path to the organization pipeline's SQLite store.
    pub db_path: String,
    /// Directory the pipeline writes its JSON reports into.
    pub results_dir: String,
    /// Directory the site artifacts are written into.
    pub site_dir: String,
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .set_default("db_path", "results/file_organization.db")?
        .set_default("results_dir", "results")?
        .set_default("site_dir", "_site")?
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
