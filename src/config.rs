// Configuration lue depuis l'environnement (.env chargé par dotenv dans main)

use std::env;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set in .env file")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Identifiants de l'API email Brevo (optionnels)
#[derive(Debug, Clone, PartialEq)]
pub struct BrevoConfig {
    pub api_key: String,
    pub sender_email: String,
    pub sender_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    /// Base des liens envoyés par email (ex: https://visitors.acme.com)
    pub public_base_url: String,
    pub log_json: bool,
    pub brevo: Option<BrevoConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construit la config à partir d'une fonction de lookup (testable sans toucher à l'env)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Les valeurs vides sont traitées comme absentes
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => 8080,
        };

        let public_base_url = get("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        let log_json = match get("LOG_JSON").as_deref() {
            None | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::Invalid { key: "LOG_JSON", value: other.to_string() });
            }
        };

        let brevo = match (get("BREVO_API_KEY"), get("BREVO_SENDER_EMAIL")) {
            (Some(api_key), Some(sender_email)) => Some(BrevoConfig {
                api_key,
                sender_email,
                sender_name: get("BREVO_SENDER_NAME"),
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            host,
            port,
            public_base_url,
            log_json,
            brevo,
        })
    }
}
