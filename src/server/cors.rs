//! Cross-origin access control.
//!
//! Allowed origins come from `ALLOWED_ORIGINS` (comma/space separated) with a
//! built-in default list. `ALLOWED_ORIGIN_SUFFIXES` additionally admits any
//! origin whose host ends with one of the suffixes, for preview deployments.
//! A caller that is not allowed still gets a header, naming the first
//! configured origin, so the browser rejects the response.

use crate::config::{DEFAULT_ALLOWED_ORIGINS, ENV_ALLOWED_ORIGINS, ENV_ALLOWED_ORIGIN_SUFFIXES};
use regex::Regex;
use std::sync::OnceLock;

pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization, X-Requested-With";

static LIST_SEPARATOR: OnceLock<Regex> = OnceLock::new();

fn get_list_separator() -> &'static Regex {
    LIST_SEPARATOR.get_or_init(|| Regex::new(r"[,\s]+").expect("Invalid Regex"))
}

fn split_list(csv: &str) -> Vec<String> {
    get_list_separator()
        .split(csv.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Resolved CORS allow-lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Exact origins; never empty.
    pub allowed_origins: Vec<String>,
    /// Host suffixes, normalized to a single leading dot (`.example.dev`).
    pub allowed_suffixes: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let origins = std::env::var(ENV_ALLOWED_ORIGINS).ok();
        let suffixes = std::env::var(ENV_ALLOWED_ORIGIN_SUFFIXES).ok();
        let config = CorsConfig::from_lists(origins.as_deref(), suffixes.as_deref());
        log::info!(
            "CORS: {} allowed origins, {} suffixes",
            config.allowed_origins.len(),
            config.allowed_suffixes.len()
        );
        config
    }

    /// Build from raw list strings; a missing or empty origin list falls back
    /// to [`DEFAULT_ALLOWED_ORIGINS`].
    pub fn from_lists(origins: Option<&str>, suffixes: Option<&str>) -> Self {
        let mut allowed_origins = origins.map(split_list).unwrap_or_default();
        if allowed_origins.is_empty() {
            allowed_origins = DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect();
        }
        let allowed_suffixes = suffixes
            .map(split_list)
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .map(|s| format!(".{s}"))
            .collect();
        CorsConfig {
            allowed_origins,
            allowed_suffixes,
        }
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        if self.allowed_origins.iter().any(|o| o == origin) {
            return true;
        }
        let Some(host) = origin_host(origin) else {
            return false;
        };
        self.allowed_suffixes
            .iter()
            .any(|suffix| host == suffix[1..] || host.ends_with(suffix.as_str()))
    }

    /// Value for `Access-Control-Allow-Origin`.
    pub fn allow_origin<'a>(&'a self, origin: Option<&'a str>) -> &'a str {
        match origin {
            Some(origin) if self.is_allowed(origin) => origin,
            _ => &self.allowed_origins[0],
        }
    }
}

/// Lowercased `host[:port]` of an origin such as `https://app.example.dev:8443`.
///
/// The port is kept, so `.example.dev` does not admit `https://x.example.dev:8443`.
fn origin_host(origin: &str) -> Option<String> {
    let (scheme, rest) = origin.split_once("://")?;
    if scheme.is_empty() {
        return None;
    }
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    (!host.is_empty()).then(|| host.to_lowercase())
}
