pub mod config;

use std::{env, net::SocketAddr};

pub use config::{AppConfig, ConfigError, Environment};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Serializes tests that mutate process environment variables.
#[cfg(test)]
pub(crate) static ENV_GUARD: std::sync::LazyLock<std::sync::Mutex<()>> =
    std::sync::LazyLock::new(|| std::sync::Mutex::new(()));

/// Loads `.env` when present. A missing file is not an error.
pub fn load_env_file() {
    let _ = dotenvy::dotenv();
}

/// Reads `name`, falling back to `default` when unset or blank.
pub fn env_or(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Address the HTTP front-end binds to, from `APP_BIND_ADDR`.
pub fn server_bind_address() -> Result<SocketAddr, std::net::AddrParseError> {
    env_or("APP_BIND_ADDR", DEFAULT_BIND_ADDR).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn bind_address_defaults_when_unset() {
        let _lock = ENV_GUARD.lock().expect("env guard poisoned");
        env::remove_var("APP_BIND_ADDR");
        let addr = server_bind_address().expect("default address is valid");
        assert_eq!(addr.to_string(), DEFAULT_BIND_ADDR);
    }

    #[test]
    fn bind_address_reads_env() {
        let _lock = ENV_GUARD.lock().expect("env guard poisoned");
        env::set_var("APP_BIND_ADDR", " 0.0.0.0:9000 ");
        let addr = server_bind_address().expect("custom address should parse");
        assert_eq!(addr.to_string(), "0.0.0.0:9000");
        env::remove_var("APP_BIND_ADDR");
    }

    #[test]
    fn blank_values_fall_back() {
        let _lock = ENV_GUARD.lock().expect("env guard poisoned");
        env::set_var("COOKIT_UTIL_TEST_BLANK", "   ");
        assert_eq!(env_or("COOKIT_UTIL_TEST_BLANK", "fallback"), "fallback");
        env::remove_var("COOKIT_UTIL_TEST_BLANK");
    }
}
