//! Relay configuration module
//!
//! Handles loading configuration from environment variables (and an optional
//! `.env` file). Everything here is resolved once at startup and never mutated.

use crate::error::RelayError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::env;

/// ntfy URL shape: server part, then the topic as the final path segment.
static NTFY_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(https?://.*?)/([-a-zA-Z0-9()@:%_+.~#?&=]+)$").expect("static regex is valid")
});

const DEFAULT_HTTP_PORT: u16 = 8080;

/// Where notifications are delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NtfyTarget {
    /// ntfy server base URL, e.g. `https://ntfy.sh`
    pub server_url: String,

    /// Topic name, the last path segment of the configured URL
    pub topic: String,
}

impl NtfyTarget {
    /// Split a combined `https://server/topic` URL into server and topic.
    pub fn parse(url: &str) -> Result<Self, RelayError> {
        if url.is_empty() {
            return Err(RelayError::Config("NTFY_URL is required".to_string()));
        }
        if !url.starts_with("http") {
            return Err(RelayError::Config(
                "NTFY_URL must start with http or https".to_string(),
            ));
        }

        let caps = NTFY_URL_RE.captures(url).ok_or_else(|| {
            RelayError::Config(
                "NTFY_URL must follow the format https://ntfy.sh/<topic> (a custom ntfy server may be used)"
                    .to_string(),
            )
        })?;

        Ok(Self {
            server_url: caps[1].to_string(),
            topic: caps[2].to_string(),
        })
    }
}

/// Relay configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Delivery target parsed from NTFY_URL
    pub ntfy: NtfyTarget,

    /// Raw `user:pass` credential for ntfy basic auth
    pub basic_auth: Option<String>,

    /// Skip TLS certificate verification towards ntfy
    pub allow_insecure: bool,

    /// Webhook listen port
    pub http_port: u16,

    /// Render emphasis with markdown `**` delimiters
    pub markdown: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl RelayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ntfy = NtfyTarget::parse(&lookup("NTFY_URL").unwrap_or_default())?;

        let basic_auth = lookup("NTFY_BASIC_AUTH").filter(|v| !v.is_empty());

        let allow_insecure = parse_flag("ALLOW_INSECURE", lookup("ALLOW_INSECURE"))?;
        let markdown = parse_flag("MARKDOWN", lookup("MARKDOWN"))?;

        let http_port = match lookup("PORT").or_else(|| lookup("HTTP_PORT")) {
            Some(raw) => raw.parse().map_err(|e| {
                RelayError::Config(format!("PORT must be a valid port number: {e}"))
            })?,
            None => DEFAULT_HTTP_PORT,
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            ntfy,
            basic_auth,
            allow_insecure,
            http_port,
            markdown,
            log_level,
        })
    }
}

fn parse_flag(name: &str, raw: Option<String>) -> Result<bool, RelayError> {
    let Some(raw) = raw else {
        return Ok(false);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => Err(RelayError::Config(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_parse_public_ntfy_url() {
        let target = NtfyTarget::parse("https://ntfy.sh/mytopic").unwrap();
        assert_eq!(target.server_url, "https://ntfy.sh");
        assert_eq!(target.topic, "mytopic");
    }

    #[test]
    fn test_parse_self_hosted_url_with_path_and_port() {
        let target =
            NtfyTarget::parse("http://push.example.com:8443/ntfy/owncast_alerts").unwrap();
        assert_eq!(target.server_url, "http://push.example.com:8443/ntfy");
        assert_eq!(target.topic, "owncast_alerts");
    }

    #[test]
    fn test_missing_url_is_rejected() {
        let err = NtfyTarget::parse("").unwrap_err();
        assert!(err.to_string().contains("NTFY_URL is required"));
    }

    #[test]
    fn test_non_http_scheme_is_rejected() {
        let err = NtfyTarget::parse("ftp://ntfy.sh/topic").unwrap_err();
        assert!(err.to_string().contains("must start with http"));
    }

    #[test]
    fn test_url_without_topic_is_rejected() {
        assert!(NtfyTarget::parse("https://ntfy.sh").is_err());
        assert!(NtfyTarget::parse("https://ntfy.sh/").is_err());
        assert!(NtfyTarget::parse("https://ntfy.sh/bad topic").is_err());
    }

    #[test]
    fn test_default_values() {
        let config =
            RelayConfig::from_lookup(lookup_from(&[("NTFY_URL", "https://ntfy.sh/live")])).unwrap();

        assert_eq!(config.http_port, 8080);
        assert_eq!(config.log_level, "info");
        assert!(config.basic_auth.is_none());
        assert!(!config.allow_insecure);
        assert!(!config.markdown);
    }

    #[test]
    fn test_all_values_from_lookup() {
        let config = RelayConfig::from_lookup(lookup_from(&[
            ("NTFY_URL", "https://ntfy.example.org/stream"),
            ("NTFY_BASIC_AUTH", "user:pass"),
            ("ALLOW_INSECURE", "true"),
            ("MARKDOWN", "yes"),
            ("PORT", "9000"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.ntfy.topic, "stream");
        assert_eq!(config.basic_auth.as_deref(), Some("user:pass"));
        assert!(config.allow_insecure);
        assert!(config.markdown);
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_http_port_alias() {
        let config = RelayConfig::from_lookup(lookup_from(&[
            ("NTFY_URL", "https://ntfy.sh/live"),
            ("HTTP_PORT", "7070"),
        ]))
        .unwrap();
        assert_eq!(config.http_port, 7070);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let err = RelayConfig::from_lookup(lookup_from(&[
            ("NTFY_URL", "https://ntfy.sh/live"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(err.error_type_label(), "config");

        let err = RelayConfig::from_lookup(lookup_from(&[
            ("NTFY_URL", "https://ntfy.sh/live"),
            ("MARKDOWN", "maybe"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("MARKDOWN"));
    }

    #[test]
    fn test_missing_ntfy_url_fails_before_anything_else() {
        let err = RelayConfig::from_lookup(lookup_from(&[("PORT", "9000")])).unwrap_err();
        assert!(err.to_string().contains("NTFY_URL is required"));
    }
}
