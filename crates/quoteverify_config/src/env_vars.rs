//! Environment variable naming for the quote verification service.
//!
//! Configuration values can be overridden with `QUOTEVERIFY__SECTION__KEY`
//! variables. Secrets are never written to config files: the file carries the
//! marker `secret_from_env` and the value is looked up under the flat name
//! `SECTION_KEY` (e.g. `hubspot.api_key` -> `HUBSPOT_API_KEY`) by the active
//! [`SecretResolver`](crate::secrets::SecretResolver).

use serde_json::Value;
use std::env;

use crate::secrets::SecretResolver;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "QUOTEVERIFY";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Config value that is replaced by a resolved secret at load time.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a secret path to the variable name it is published under.
///
/// `hubspot.api_key` becomes `HUBSPOT_API_KEY`, `redirect.base_url` becomes
/// `REDIRECT_BASE_URL`.
pub fn secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let section = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}{}{}", section, SECRET_SEPARATOR, key).to_uppercase()
}

/// Replaces every [`SECRET_MARKER`] string in `value` with the secret resolved
/// for its path.
///
/// Returns the paths that could not be resolved; those markers are left in place.
pub fn inject_secrets(value: &mut Value, resolver: &dyn SecretResolver) -> Vec<String> {
    fn walk(path: Vec<String>, obj: &mut Value, resolver: &dyn SecretResolver, missing: &mut Vec<String>) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v, resolver, missing);
                }
            }
            Value::Array(arr) => {
                for (i, v) in arr.iter_mut().enumerate() {
                    let mut new_path = path.clone();
                    new_path.push(i.to_string());
                    walk(new_path, v, resolver, missing);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let path_str = path.join(".");
                match resolver.resolve(&path_str) {
                    Some(secret) => *s = secret,
                    None => missing.push(path_str),
                }
            }
            _ => {}
        }
    }

    let mut missing = Vec::new();
    walk(vec![], value, resolver, &mut missing);
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    struct MapResolver(HashMap<&'static str, &'static str>);

    impl SecretResolver for MapResolver {
        fn source_name(&self) -> &'static str {
            "map"
        }

        fn resolve(&self, path: &str) -> Option<String> {
            self.0
                .get(secret_path_to_env_var(path).as_str())
                .map(|v| v.to_string())
        }
    }

    #[test]
    fn test_secret_path_to_env_var() {
        assert_eq!(secret_path_to_env_var("hubspot.api_key"), "HUBSPOT_API_KEY");
        assert_eq!(
            secret_path_to_env_var("redirect.base_url"),
            "REDIRECT_BASE_URL"
        );
        assert_eq!(secret_path_to_env_var("token"), "TOKEN");
    }

    #[test]
    fn inject_replaces_markers_and_reports_missing() {
        let resolver = MapResolver(HashMap::from([("HUBSPOT_API_KEY", "pat-123")]));
        let mut value = json!({
            "hubspot": { "api_key": "secret_from_env", "api_base_url": "https://api.hubapi.com" },
            "redirect": { "base_url": "secret_from_env" },
        });

        let missing = inject_secrets(&mut value, &resolver);

        assert_eq!(value["hubspot"]["api_key"], "pat-123");
        assert_eq!(value["hubspot"]["api_base_url"], "https://api.hubapi.com");
        assert_eq!(value["redirect"]["base_url"], SECRET_MARKER);
        assert_eq!(missing, vec!["redirect.base_url".to_string()]);
    }
}
