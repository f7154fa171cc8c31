use std::env;
use thiserror::Error;

const DEFAULT_TCP_SOCKET_BINDING: &str = "0.0.0.0";
const DEFAULT_TCP_SOCKET_PORT: u16 = 5000;
const DEFAULT_DATABASE_URL: &str = "tasks.redb";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Server settings, read from the process environment (and a `.env` file
/// when one is present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tcp_socket_binding: String,
    pub tcp_socket_port: u16,
    /// Path of the redb file holding the task documents.
    pub database_url: String,
}

impl Settings {
    pub fn load() -> Result<Settings, SettingsError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "ignoring unreadable .env file");
            }
        }
        Settings::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. `load` passes the
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Settings, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tcp_socket_port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| SettingsError::Invalid {
                key: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_TCP_SOCKET_PORT,
        };

        let tcp_socket_binding = lookup("BIND_ADDRESS")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TCP_SOCKET_BINDING.to_string());

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        Ok(Settings {
            tcp_socket_binding,
            tcp_socket_port,
            database_url,
        })
    }

    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.tcp_socket_binding, self.tcp_socket_port)
    }
}
