use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::defs::DEFAULT_MAX_CARDS;
use crate::logging::{log_info, log_warning};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cards_dir: String,
    pub collection: String,
    pub max_cards: usize,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cards_dir: "cards".to_string(),
            collection: "default".to_string(),
            max_cards: DEFAULT_MAX_CARDS,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            timeout: 30,
        }
    }
}

impl ClientConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_map(&parse_config(&content)))
    }

    fn from_map(config_map: &HashMap<String, String>) -> Self {
        let defaults = Self::default();

        let host = config_map.get("host").cloned().unwrap_or(defaults.host);

        let port = config_map.get("port")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let timeout = config_map.get("timeout")
            .and_then(|t| t.parse::<u64>().ok())
            .unwrap_or(defaults.timeout);

        ClientConfig { host, port, timeout }
    }

    pub fn load_or_default() -> Self {
        let config_path = "conf/client.conf";

        match Self::from_file(config_path) {
            Ok(config) => {
                log_info(&format!("Loaded client configuration from {config_path}"));
                config
            }
            Err(e) => {
                log_warning(&format!("Could not load client config from {config_path}: {e}. Using defaults."));
                Self::default()
            }
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl ServerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_map(&parse_config(&content)))
    }

    fn from_map(config_map: &HashMap<String, String>) -> Self {
        let defaults = Self::default();

        let host = config_map.get("host").cloned().unwrap_or(defaults.host);

        let port = config_map.get("port")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let cards_dir = config_map.get("cards_dir").cloned().unwrap_or(defaults.cards_dir);

        let collection = config_map.get("collection").cloned().unwrap_or(defaults.collection);

        let max_cards = config_map.get("max_cards")
            .and_then(|m| m.parse::<usize>().ok())
            .filter(|&m| m > 0)
            .unwrap_or(defaults.max_cards);

        ServerConfig { host, port, cards_dir, collection, max_cards }
    }

    pub fn load_or_default() -> Self {
        let config_path = "conf/server.conf";

        match Self::from_file(config_path) {
            Ok(config) => {
                log_info(&format!("Loaded configuration from {config_path}"));
                config
            }
            Err(e) => {
                log_warning(&format!("Could not load config from {config_path}: {e}. Using defaults."));
                Self::default()
            }
        }
    }
}

fn parse_config(content: &str) -> HashMap<String, String> {
    let mut config = HashMap::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            config.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    config
}
