use std::path::Path;


pub const CONFIG_ENV_VAR: &str = "BATTLE_TAB_SERVER_CONFIG";

#[derive(Debug, serde::Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub db_url: String,
    pub host: String,
    pub port: u16,
    pub logging_config: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_url: "sqlite://./battle_tab.sqlite3?mode=rwc".into(),
            host: "0.0.0.0".into(),
            port: 3000,
            logging_config: "info,battle_tab_server=debug,battle_tab_entities=debug,sqlx::query=error,hyper=error,tower_http=debug,axum::rejection=trace".into(),
        }
    }
}

impl Config {
    pub fn from_yaml(content: &str) -> Result<Config, anyhow::Error> {
        Ok(serde_yaml::from_str::<Config>(content)?)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub(crate) fn read_config_inner(path: Option<&Path>) -> Result<Config, anyhow::Error> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => std::env::var(CONFIG_ENV_VAR)?.into(),
    };
    let config = std::fs::read_to_string(config_path)?;
    Config::from_yaml(&config)
}

/// Reads the config from `path`, or from the file named by
/// `BATTLE_TAB_SERVER_CONFIG` if no path is given.
pub fn read_config(path: Option<&Path>) -> Config {
    match read_config_inner(path) {
        Ok(config) => config,
        Err(e) => {
            //Print to stderr, since logging is set up in the config
            eprintln!("Warning: Failed to read config: {}", e);
            Config::default()
        }
    }
}
