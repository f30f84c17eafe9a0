use crate::app_config::{AppConfig, Environment, SheetsSettings};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the process environment so tests
/// can drive this with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env = parse_environment(&or_default("PROPROUTE_ENV", "development"))?;

    let bind_addr = or_default("PROPROUTE_BIND_ADDR", "0.0.0.0:5000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("PROPROUTE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("PROPROUTE_LOG_LEVEL", "info");

    let sheets = SheetsSettings {
        base_url: or_default("PROPROUTE_SHEETS_BASE_URL", "https://sheets.googleapis.com/"),
        sheet_id: require("PROPROUTE_SHEET_ID")?,
        sheet_name: or_default("PROPROUTE_SHEET_NAME", "Sheet1"),
        range: or_default("PROPROUTE_SHEET_RANGE", "A2:N"),
        api_key: optional("PROPROUTE_SHEETS_API_KEY"),
        access_token: optional("PROPROUTE_SHEETS_ACCESS_TOKEN"),
    };

    let route_webhook_url = optional("PROPROUTE_ROUTE_WEBHOOK_URL");
    let fallback_default = if env == Environment::Development {
        "true"
    } else {
        "false"
    };
    let route_fallback = parse_bool(&or_default("PROPROUTE_ROUTE_FALLBACK", fallback_default))
        .ok_or_else(|| {
            invalid(
                "PROPROUTE_ROUTE_FALLBACK",
                "expected true/false".to_string(),
            )
        })?;

    let utc_offset_minutes = or_default("PROPROUTE_UTC_OFFSET_MINUTES", "420")
        .parse::<i32>()
        .map_err(|e| invalid("PROPROUTE_UTC_OFFSET_MINUTES", e.to_string()))?;
    if !(-1440..=1440).contains(&utc_offset_minutes) {
        return Err(invalid(
            "PROPROUTE_UTC_OFFSET_MINUTES",
            format!("{utc_offset_minutes} is outside -1440..=1440"),
        ));
    }

    let request_timeout_secs = or_default("PROPROUTE_REQUEST_TIMEOUT_SECS", "30")
        .parse::<u64>()
        .map_err(|e| invalid("PROPROUTE_REQUEST_TIMEOUT_SECS", e.to_string()))?;
    let user_agent = or_default("PROPROUTE_USER_AGENT", "proproute/0.1 (route-planner)");
    let upload_max_bytes = or_default("PROPROUTE_UPLOAD_MAX_BYTES", "10485760")
        .parse::<usize>()
        .map_err(|e| invalid("PROPROUTE_UPLOAD_MAX_BYTES", e.to_string()))?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        sheets,
        route_webhook_url,
        route_fallback,
        utc_offset_minutes,
        request_timeout_secs,
        user_agent,
        upload_max_bytes,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PROPROUTE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
