//! Configuration for a single update run
//!
//! All configuration comes from environment variables and is validated once,
//! before any network call is made. The resulting [`RunConfig`] is passed by
//! value into [`crate::DdnsEngine`].
//!
//! ## Variables
//!
//! - `ROUTE53_HOSTED_ZONE_DNS_NAME` (required): DNS name of the hosted zone
//! - `ROUTE53_MY_DNS_NAME` (required): record to keep in sync
//! - `ROUTE53_TTL` (required): TTL in seconds written with the record
//! - `ROUTE53_TRACE_URL` (optional): trace endpoint reporting the caller's IP
//! - `ROUTE53_MODE` (optional): `live` (default) or `dry-run`

use serde::{Deserialize, Serialize};

/// Environment variable holding the hosted zone DNS name
pub const ENV_HOSTED_ZONE_DNS_NAME: &str = "ROUTE53_HOSTED_ZONE_DNS_NAME";
/// Environment variable holding the record DNS name
pub const ENV_MY_DNS_NAME: &str = "ROUTE53_MY_DNS_NAME";
/// Environment variable holding the record TTL
pub const ENV_TTL: &str = "ROUTE53_TTL";
/// Environment variable overriding the trace endpoint
pub const ENV_TRACE_URL: &str = "ROUTE53_TRACE_URL";
/// Environment variable selecting live or dry-run mode
pub const ENV_MODE: &str = "ROUTE53_MODE";

/// Default endpoint used to discover the public IP
pub const DEFAULT_TRACE_URL: &str = "https://cloudflare.com/cdn-cgi/trace";

/// Largest TTL Route53 accepts
pub const MAX_TTL: u32 = 2_147_483_647;

/// Whether the run may write to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Read and write
    #[default]
    Live,
    /// Read only; the intended change is logged
    DryRun,
}

impl RunMode {
    fn parse(value: &str) -> Result<Self, crate::Error> {
        match value.to_lowercase().as_str() {
            "" | "live" => Ok(RunMode::Live),
            "dry-run" | "dryrun" => Ok(RunMode::DryRun),
            other => Err(crate::Error::config(format!(
                "{} '{}' is not valid. Valid modes: live, dry-run",
                ENV_MODE, other
            ))),
        }
    }

    /// `true` for [`RunMode::DryRun`]
    pub fn is_dry_run(self) -> bool {
        self == RunMode::DryRun
    }
}

/// Validated configuration for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// DNS name of the hosted zone (no trailing dot)
    pub hosted_zone_dns_name: String,

    /// DNS name of the "A" record to keep in sync (no trailing dot)
    pub record_dns_name: String,

    /// TTL in seconds written with the record
    pub ttl: u32,

    /// Trace endpoint returning `key=value` lines with an `ip` key
    #[serde(default = "default_trace_url")]
    pub trace_url: String,

    /// Live or dry-run
    #[serde(default)]
    pub mode: RunMode,
}

impl RunConfig {
    /// Create a configuration from explicit values with defaults for the rest
    ///
    /// Names are normalized (a single trailing dot is stripped) but not validated;
    /// call [`RunConfig::validate`] before use.
    pub fn new(
        hosted_zone_dns_name: impl Into<String>,
        record_dns_name: impl Into<String>,
        ttl: u32,
    ) -> Self {
        Self {
            hosted_zone_dns_name: strip_root(hosted_zone_dns_name.into()),
            record_dns_name: strip_root(record_dns_name.into()),
            ttl,
            trace_url: default_trace_url(),
            mode: RunMode::Live,
        }
    }

    /// Set the trace endpoint
    pub fn with_trace_url(mut self, trace_url: impl Into<String>) -> Self {
        self.trace_url = trace_url.into();
        self
    }

    /// Set the run mode
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Load and validate configuration from the process environment
    pub fn from_env() -> Result<Self, crate::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load and validate configuration from an arbitrary key lookup
    ///
    /// [`RunConfig::from_env`] is this function over `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, crate::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, crate::Error> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
                _ => Err(crate::Error::config(format!(
                    "{} is required. Set it via: export {}=...",
                    key, key
                ))),
            }
        };

        let hosted_zone_dns_name = required(ENV_HOSTED_ZONE_DNS_NAME)?;
        let record_dns_name = required(ENV_MY_DNS_NAME)?;
        let ttl = parse_ttl(&required(ENV_TTL)?)?;

        let mut config = Self::new(hosted_zone_dns_name, record_dns_name, ttl);

        if let Some(url) = lookup(ENV_TRACE_URL).filter(|u| !u.trim().is_empty()) {
            config.trace_url = url.trim().to_string();
        }
        if let Some(mode) = lookup(ENV_MODE) {
            config.mode = RunMode::parse(mode.trim())?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_domain_name(ENV_HOSTED_ZONE_DNS_NAME, &self.hosted_zone_dns_name)?;
        validate_domain_name(ENV_MY_DNS_NAME, &self.record_dns_name)?;

        if self.ttl > MAX_TTL {
            return Err(crate::Error::config(format!(
                "{} must be at most {}. Got: {}",
                ENV_TTL, MAX_TTL, self.ttl
            )));
        }

        if !self.trace_url.starts_with("https://") && !self.trace_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "{} must use HTTP or HTTPS scheme. Got: {}",
                ENV_TRACE_URL, self.trace_url
            )));
        }

        Ok(())
    }

    /// The record name as the provider stores it (dot-terminated)
    pub fn fqdn(&self) -> String {
        fqdn(&self.record_dns_name)
    }
}

/// Append the root label to a DNS name
pub fn fqdn(name: &str) -> String {
    format!("{}.", name)
}

fn default_trace_url() -> String {
    DEFAULT_TRACE_URL.to_string()
}

fn strip_root(name: String) -> String {
    match name.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

fn parse_ttl(value: &str) -> Result<u32, crate::Error> {
    value.parse::<u32>().map_err(|_| {
        crate::Error::config(format!(
            "{} must be a non-negative integer number of seconds. Got: '{}'",
            ENV_TTL, value
        ))
    })
}

/// Basic RFC 1035 name checks; catches common typos, not every invalid name.
fn validate_domain_name(key: &str, domain: &str) -> Result<(), crate::Error> {
    if domain.is_empty() {
        return Err(crate::Error::config(format!("{} cannot be empty", key)));
    }

    if domain.len() > 253 {
        return Err(crate::Error::config(format!(
            "{} too long: {} chars (max 253). Got: {}",
            key,
            domain.len(),
            domain
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "{} has empty label: '{}'",
                key, domain
            )));
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "{} label too long: {} chars (max 63). Label: '{}'",
                key,
                label.len(),
                label
            )));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(crate::Error::config(format!(
                "{} label contains invalid characters. Label: '{}'",
                key, label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "{} label cannot start or end with hyphen. Label: '{}'",
                key, label
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn required_env() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_HOSTED_ZONE_DNS_NAME, "example.com"),
            (ENV_MY_DNS_NAME, "host.example.com"),
            (ENV_TTL, "300"),
        ]
    }

    #[test]
    fn test_from_lookup_with_required_values() {
        let config = RunConfig::from_lookup(lookup_from(&required_env())).unwrap();

        assert_eq!(config.hosted_zone_dns_name, "example.com");
        assert_eq!(config.record_dns_name, "host.example.com");
        assert_eq!(config.ttl, 300);
        assert_eq!(config.trace_url, DEFAULT_TRACE_URL);
        assert_eq!(config.mode, RunMode::Live);
        assert_eq!(config.fqdn(), "host.example.com.");
    }

    #[test]
    fn test_missing_required_value_is_config_error() {
        for missing in [ENV_HOSTED_ZONE_DNS_NAME, ENV_MY_DNS_NAME, ENV_TTL] {
            let env: Vec<_> = required_env()
                .into_iter()
                .filter(|(k, _)| *k != missing)
                .collect();

            let err = RunConfig::from_lookup(lookup_from(&env)).unwrap_err();
            assert!(err.is_config(), "expected config error for {}", missing);
            assert!(err.to_string().contains(missing));
        }
    }

    #[test]
    fn test_empty_required_value_is_config_error() {
        let mut env = required_env();
        env[1] = (ENV_MY_DNS_NAME, "   ");

        assert!(RunConfig::from_lookup(lookup_from(&env)).is_err());
    }

    #[test]
    fn test_ttl_must_be_non_negative_integer() {
        for bad in ["-1", "abc", "3.5", "99999999999"] {
            let mut env = required_env();
            env[2] = (ENV_TTL, bad);

            let err = RunConfig::from_lookup(lookup_from(&env)).unwrap_err();
            assert!(err.is_config(), "TTL '{}' should be rejected", bad);
        }

        let mut env = required_env();
        env[2] = (ENV_TTL, "0");
        assert_eq!(RunConfig::from_lookup(lookup_from(&env)).unwrap().ttl, 0);
    }

    #[test]
    fn test_ttl_above_provider_limit_rejected() {
        let mut env = required_env();
        env[2] = (ENV_TTL, "4000000000");

        assert!(RunConfig::from_lookup(lookup_from(&env)).is_err());
    }

    #[test]
    fn test_trailing_dot_is_stripped() {
        let mut env = required_env();
        env[1] = (ENV_MY_DNS_NAME, "host.example.com.");

        let config = RunConfig::from_lookup(lookup_from(&env)).unwrap();
        assert_eq!(config.record_dns_name, "host.example.com");
        assert_eq!(config.fqdn(), "host.example.com.");
    }

    #[test]
    fn test_invalid_domain_names_rejected() {
        for bad in ["host..example.com", "-host.example.com", "ho st.example.com"] {
            let mut env = required_env();
            env[1] = (ENV_MY_DNS_NAME, bad);

            assert!(
                RunConfig::from_lookup(lookup_from(&env)).is_err(),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_optional_values() {
        let mut env = required_env();
        env.push((ENV_TRACE_URL, "https://1.1.1.1/cdn-cgi/trace"));
        env.push((ENV_MODE, "dry-run"));

        let config = RunConfig::from_lookup(lookup_from(&env)).unwrap();
        assert_eq!(config.trace_url, "https://1.1.1.1/cdn-cgi/trace");
        assert!(config.mode.is_dry_run());
    }

    #[test]
    fn test_invalid_mode_and_url_rejected() {
        let mut env = required_env();
        env.push((ENV_MODE, "yolo"));
        assert!(RunConfig::from_lookup(lookup_from(&env)).is_err());

        let mut env = required_env();
        env.push((ENV_TRACE_URL, "ftp://example.com/trace"));
        assert!(RunConfig::from_lookup(lookup_from(&env)).is_err());
    }
}
