use crate::app_config::{AppConfig, Environment};
use crate::geo::Coordinates;
use crate::search::{MAX_RADIUS_KM, MIN_RADIUS_KM};
use crate::ConfigError;

/// Load client configuration from environment variables.
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

/// Load client configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build configuration from the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can pass a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        match raw.parse::<u64>() {
            Ok(0) => Err(invalid(var, "must be greater than zero".to_string())),
            Ok(secs) => Ok(secs),
            Err(e) => Err(invalid(var, e.to_string())),
        }
    };

    let parse_optional_f64 = |var: &str| -> Result<Option<f64>, ConfigError> {
        match lookup(var) {
            Ok(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|e| invalid(var, e.to_string())),
            _ => Ok(None),
        }
    };

    let api_url = or_default("VECINOS_API_URL", "http://localhost:3400")
        .trim()
        .trim_end_matches('/')
        .to_string();
    if api_url.is_empty() {
        return Err(invalid("VECINOS_API_URL", "must not be empty".to_string()));
    }

    let env = parse_environment(&or_default("VECINOS_ENV", "development"))?;
    let log_level = or_default("VECINOS_LOG_LEVEL", "info");
    let request_timeout_secs = parse_secs("VECINOS_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("VECINOS_USER_AGENT", "vecinos/0.1 (nearby-search)");
    let geolocation_timeout_secs = parse_secs("VECINOS_GEOLOCATION_TIMEOUT_SECS", "10")?;

    let default_radius_km = or_default("VECINOS_DEFAULT_RADIUS_KM", "10")
        .parse::<f64>()
        .map_err(|e| invalid("VECINOS_DEFAULT_RADIUS_KM", e.to_string()))?;
    if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&default_radius_km) {
        return Err(invalid(
            "VECINOS_DEFAULT_RADIUS_KM",
            format!("{default_radius_km} is outside {MIN_RADIUS_KM}-{MAX_RADIUS_KM} km"),
        ));
    }

    let token = lookup("VECINOS_TOKEN")
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let device_position = match (
        parse_optional_f64("VECINOS_LAT")?,
        parse_optional_f64("VECINOS_LNG")?,
    ) {
        (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng).ok_or_else(|| {
            invalid(
                "VECINOS_LAT",
                format!("({lat}, {lng}) is not a valid position"),
            )
        })?),
        (None, None) => None,
        (Some(_), None) => {
            return Err(invalid("VECINOS_LNG", "required when VECINOS_LAT is set".to_string()))
        }
        (None, Some(_)) => {
            return Err(invalid("VECINOS_LAT", "required when VECINOS_LNG is set".to_string()))
        }
    };

    Ok(AppConfig {
        api_url,
        env,
        log_level,
        request_timeout_secs,
        user_agent,
        default_radius_km,
        token,
        device_position,
        geolocation_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VECINOS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
