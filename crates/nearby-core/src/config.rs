use crate::app_config::{AppConfig, CatalogSourceKind, Environment};
use crate::search::DEFAULT_RADIUS_METERS;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("NEARBY_ENV", "development"))?;
    let bind_addr = parse_addr("NEARBY_BIND_ADDR", "0.0.0.0:3001")?;
    let log_level = or_default("NEARBY_LOG_LEVEL", "info");
    let catalog_source = parse_catalog_source(&or_default("NEARBY_CATALOG_SOURCE", "static"))?;
    let catalog_path = PathBuf::from(or_default("NEARBY_CATALOG_PATH", "./config/places.yaml"));

    if catalog_source == CatalogSourceKind::Mock && env == Environment::Production {
        return Err(invalid(
            "NEARBY_CATALOG_SOURCE",
            "mock catalog is not allowed in production".to_string(),
        ));
    }

    let default_radius_m = match lookup("NEARBY_DEFAULT_RADIUS_M") {
        Ok(raw) => raw
            .parse::<f64>()
            .map_err(|e| invalid("NEARBY_DEFAULT_RADIUS_M", e.to_string()))?,
        Err(_) => DEFAULT_RADIUS_METERS,
    };
    if !(default_radius_m.is_finite() && default_radius_m > 0.0) {
        return Err(invalid(
            "NEARBY_DEFAULT_RADIUS_M",
            format!("{default_radius_m} is not greater than 0"),
        ));
    }

    let rate_limit_max_requests = parse_usize("NEARBY_RATE_LIMIT_MAX", "120")?;
    let rate_limit_window_secs = parse_u64("NEARBY_RATE_LIMIT_WINDOW_SECS", "60")?;
    if rate_limit_window_secs == 0 {
        return Err(invalid(
            "NEARBY_RATE_LIMIT_WINDOW_SECS",
            "window must be at least 1 second".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_source,
        catalog_path,
        default_radius_m,
        rate_limit_max_requests,
        rate_limit_window_secs,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEARBY_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_catalog_source(s: &str) -> Result<CatalogSourceKind, ConfigError> {
    match s {
        "static" => Ok(CatalogSourceKind::Static),
        "mock" => Ok(CatalogSourceKind::Mock),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEARBY_CATALOG_SOURCE".to_string(),
            reason: format!("expected 'static' or 'mock', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
