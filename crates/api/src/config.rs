//! Process configuration read from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use basketdash_analytics::{DEFAULT_BRAND_TOP_N, DEFAULT_CURRENCY_SUFFIX};
use basketdash_products::MissingValuePolicy;

pub const DEFAULT_DATASET_PATH: &str = "BigBasket Products.csv";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Upper bound accepted for `top_n`, in config and in requests.
pub const MAX_TOP_N: usize = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub dataset_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub currency_suffix: String,
    pub brand_top_n: usize,
    pub missing_values: MissingValuePolicy,
}

impl ApiConfig {
    /// Read `BASKETDASH_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let dataset_path = lookup("BASKETDASH_DATASET")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH));

        let bind = lookup("BASKETDASH_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("BASKETDASH_BIND", &bind, e.to_string()))?;

        let currency_suffix =
            lookup("BASKETDASH_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY_SUFFIX.to_string());

        let brand_top_n = match lookup("BASKETDASH_TOP_N") {
            None => DEFAULT_BRAND_TOP_N,
            Some(raw) => parse_top_n(&raw)
                .map_err(|reason| ConfigError::invalid("BASKETDASH_TOP_N", &raw, reason))?,
        };

        let missing_values = match lookup("BASKETDASH_DROP_POLICY").as_deref().map(str::trim) {
            None | Some("required") => MissingValuePolicy::RequiredColumns,
            Some("any") => MissingValuePolicy::AnyColumn,
            Some(other) => {
                return Err(ConfigError::invalid(
                    "BASKETDASH_DROP_POLICY",
                    other,
                    "expected `required` or `any`",
                ));
            }
        };

        Ok(Self {
            dataset_path,
            bind_addr,
            currency_suffix,
            brand_top_n,
            missing_values,
        })
    }
}

/// Parse and range-check a top-N limit.
pub fn parse_top_n(raw: &str) -> Result<usize, String> {
    let n = raw
        .trim()
        .parse::<usize>()
        .map_err(|e| e.to_string())?;
    check_top_n(n)
}

pub fn check_top_n(n: usize) -> Result<usize, String> {
    if n == 0 || n > MAX_TOP_N {
        return Err(format!("top_n must be between 1 and {MAX_TOP_N}"));
    }
    Ok(n)
}
