use anyhow::{bail, Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub responder: ResponderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct ResponderConfig {
    /// Log full response bodies at debug level. Bodies can be large or
    /// contain sensitive data, so this is off unless asked for.
    pub log_response_bodies: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("API_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .context("API_PORT must be a valid port number")?,
            },
            responder: ResponderConfig {
                log_response_bodies: env::var("API_LOG_RESPONSE_BODIES")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .context("API_LOG_RESPONSE_BODIES must be true or false")?,
            },
            logging: LoggingConfig {
                format: parse_log_format(
                    &env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
                )?,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat> {
    match value.to_ascii_lowercase().as_str() {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => bail!("LOG_FORMAT must be text or json, got {other:?}"),
    }
}
