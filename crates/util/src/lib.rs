pub mod config;

use std::{
    env,
    net::{IpAddr, SocketAddr},
};

pub use config::{AppConfig, ConfigError, Environment};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Loads environment variables from `.env` when available.
///
/// Missing files are ignored so the function is safe in production builds
/// where dotenv files are not deployed.
pub fn load_env_file() {
    let _ = dotenvy::dotenv();
}

/// Returns the address the HTTP server should bind to.
///
/// The host comes from `APP_BIND_HOST` (default [`DEFAULT_BIND_HOST`]) and the
/// port from `PORT` (default [`DEFAULT_PORT`]).
pub fn server_bind_address() -> Result<SocketAddr, ConfigError> {
    let host_value = env::var("APP_BIND_HOST").unwrap_or_else(|_| DEFAULT_BIND_HOST.to_string());
    let host: IpAddr = host_value
        .parse()
        .map_err(|_| ConfigError::InvalidHost(host_value.clone()))?;

    let port = match env::var("PORT") {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(value))?,
        _ => DEFAULT_PORT,
    };

    Ok(SocketAddr::new(host, port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_GUARD;
    use std::env;

    #[test]
    fn returns_default_address_when_env_missing() {
        let _lock = ENV_GUARD.lock().expect("env guard poisoned");
        env::remove_var("APP_BIND_HOST");
        env::remove_var("PORT");
        let addr = server_bind_address().expect("default address is valid");
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn parses_custom_port_and_host_from_env() {
        let _lock = ENV_GUARD.lock().expect("env guard poisoned");
        env::set_var("APP_BIND_HOST", "127.0.0.1");
        env::set_var("PORT", "9000");
        let addr = server_bind_address().expect("custom address should parse");
        assert_eq!(addr.to_string(), "127.0.0.1:9000");
        env::remove_var("APP_BIND_HOST");
        env::remove_var("PORT");
    }

    #[test]
    fn empty_port_falls_back_to_default() {
        let _lock = ENV_GUARD.lock().expect("env guard poisoned");
        env::remove_var("APP_BIND_HOST");
        env::set_var("PORT", "");
        let addr = server_bind_address().expect("default port");
        assert_eq!(addr.port(), DEFAULT_PORT);
        env::remove_var("PORT");
    }

    #[test]
    fn rejects_invalid_port() {
        let _lock = ENV_GUARD.lock().expect("env guard poisoned");
        env::remove_var("APP_BIND_HOST");
        env::set_var("PORT", "not-a-port");
        let err = server_bind_address().expect_err("invalid port should error");
        assert!(matches!(err, ConfigError::InvalidPort(value) if value == "not-a-port"));
        env::remove_var("PORT");
    }
}
