use crate::errors::ConfigError;
use crate::models::GridYear;
use std::{env, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data";
pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub year: GridYear,
    pub store: StoreConfig,
}

#[derive(Debug, Clone)]
pub enum StoreConfig {
    Firestore(FirestoreConfig),
    File { data_dir: PathBuf },
    Memory,
}

impl StoreConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreConfig::Firestore(_) => "firestore",
            StoreConfig::File { .. } => "file",
            StoreConfig::Memory => "memory",
        }
    }
}

/// Firebase web-app settings. Only the API key, project id and base URL
/// are used by the REST client; the rest are carried for completeness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    pub api_key: String,
    pub project_id: String,
    pub base_url: String,
    pub auth_domain: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
    pub measurement_id: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match var("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let year = match var("GRID_YEAR") {
            Some(value) => value
                .trim()
                .parse::<i32>()
                .ok()
                .and_then(GridYear::new)
                .ok_or(ConfigError::Invalid {
                    name: "GRID_YEAR",
                    value,
                })?,
            None => GridYear::current().ok_or(ConfigError::YearOutOfRange)?,
        };

        let kind = var("GRID_STORE").unwrap_or_else(|| {
            if var("FIREBASE_PROJECT_ID").is_some() {
                "firestore".to_string()
            } else {
                "file".to_string()
            }
        });

        let store = match kind.trim().to_ascii_lowercase().as_str() {
            "firestore" => StoreConfig::Firestore(FirestoreConfig {
                api_key: var("FIREBASE_API_KEY").ok_or(ConfigError::Missing("FIREBASE_API_KEY"))?,
                project_id: var("FIREBASE_PROJECT_ID")
                    .ok_or(ConfigError::Missing("FIREBASE_PROJECT_ID"))?,
                base_url: var("FIRESTORE_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_FIRESTORE_URL.to_string()),
                auth_domain: var("FIREBASE_AUTH_DOMAIN"),
                storage_bucket: var("FIREBASE_STORAGE_BUCKET"),
                messaging_sender_id: var("FIREBASE_MESSAGING_SENDER_ID"),
                app_id: var("FIREBASE_APP_ID"),
                measurement_id: var("FIREBASE_MEASUREMENT_ID"),
            }),
            "file" => StoreConfig::File {
                data_dir: PathBuf::from(
                    var("APP_DATA_PATH").unwrap_or_else(|| DEFAULT_DATA_PATH.to_string()),
                ),
            },
            "memory" => StoreConfig::Memory,
            _ => return Err(ConfigError::UnknownStore(kind)),
        };

        Ok(Self { port, year, store })
    }
}
