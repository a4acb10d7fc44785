use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u16>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let page_url = or_default(
        "PRICEWATCH_PAGE_URL",
        "https://www.kaufland.hr/akcije-novosti/popis-mpc.html",
    );
    let watchlist_path = PathBuf::from(or_default(
        "PRICEWATCH_WATCHLIST_PATH",
        "./config/watchlist.yaml",
    ));
    let output_path = PathBuf::from(or_default("PRICEWATCH_OUTPUT_PATH", "./output/index.html"));
    let store_id = parse_u16("PRICEWATCH_STORE_ID", "2030")?;
    let log_level = or_default("PRICEWATCH_LOG_LEVEL", "info");
    let http_timeout_secs = parse_u64("PRICEWATCH_HTTP_TIMEOUT_SECS", "30")?;
    let http_connect_timeout_secs = parse_u64("PRICEWATCH_HTTP_CONNECT_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("PRICEWATCH_USER_AGENT", "pricewatch/0.1 (price-list watch)");

    Ok(AppConfig {
        page_url,
        watchlist_path,
        output_path,
        store_id,
        log_level,
        http_timeout_secs,
        http_connect_timeout_secs,
        user_agent,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(
            cfg.page_url,
            "https://www.kaufland.hr/akcije-novosti/popis-mpc.html"
        );
        assert_eq!(cfg.store_id, 2030);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.http_timeout_secs, 30);
        assert_eq!(cfg.http_connect_timeout_secs, 10);
        assert_eq!(
            cfg.watchlist_path.display().to_string(),
            "./config/watchlist.yaml"
        );
        assert_eq!(cfg.output_path.display().to_string(), "./output/index.html");
    }

    #[test]
    fn build_app_config_store_id_override() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("PRICEWATCH_STORE_ID", "2550");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.store_id, 2550);
    }

    #[test]
    fn build_app_config_store_id_invalid() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("PRICEWATCH_STORE_ID", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICEWATCH_STORE_ID"),
            "expected InvalidEnvVar(PRICEWATCH_STORE_ID), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_store_id_too_wide() {
        // Store ids are 16-bit in the filename grammar.
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("PRICEWATCH_STORE_ID", "70000");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICEWATCH_STORE_ID"),
            "expected InvalidEnvVar(PRICEWATCH_STORE_ID), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_timeout_override() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("PRICEWATCH_HTTP_TIMEOUT_SECS", "60");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.http_timeout_secs, 60);
    }

    #[test]
    fn build_app_config_timeout_invalid() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("PRICEWATCH_HTTP_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICEWATCH_HTTP_TIMEOUT_SECS"),
            "expected InvalidEnvVar(PRICEWATCH_HTTP_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_paths_override() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("PRICEWATCH_WATCHLIST_PATH", "/etc/pricewatch/rules.yaml");
        map.insert("PRICEWATCH_OUTPUT_PATH", "/srv/www/prices.html");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.watchlist_path.display().to_string(),
            "/etc/pricewatch/rules.yaml"
        );
        assert_eq!(cfg.output_path.display().to_string(), "/srv/www/prices.html");
    }
}
