use std::time::Duration;

// ---------------------------------------------------------------------------
// Client configuration (environment driven)
// ---------------------------------------------------------------------------

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

const ENV_SERVER_URL: &str = "SPECTRA_SERVER_URL";
const ENV_TIMEOUT_SECS: &str = "SPECTRA_TIMEOUT_SECS";
const ENV_CONFIRM_PLOT: &str = "SPECTRA_CONFIRM_PLOT";

/// Connection settings for the processing server.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL, endpoint paths are appended to it.
    pub server_url: String,
    /// Per-request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
    /// Ask `/plot_spectrum` before drawing single-series results.
    pub confirm_plots: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            timeout: None,
            confirm_plots: false,
        }
    }
}

impl ClientConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    /// Invalid values are logged and replaced by their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_SERVER_URL) {
            let url = url.trim();
            if url.is_empty() {
                log::warn!("{ENV_SERVER_URL} is empty, using {DEFAULT_SERVER_URL}");
            } else {
                config.server_url = url.trim_end_matches('/').to_string();
            }
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Some(Duration::from_secs(secs)),
                _ => log::warn!("Ignoring invalid {ENV_TIMEOUT_SECS}={raw:?}"),
            }
        }

        if let Some(raw) = lookup(ENV_CONFIRM_PLOT) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.confirm_plots = true,
                "0" | "false" | "no" | "off" | "" => config.confirm_plots = false,
                _ => log::warn!("Ignoring invalid {ENV_CONFIRM_PLOT}={raw:?}"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.server_url, "http://127.0.0.1:5000");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("SPECTRA_SERVER_URL", "http://lab.local:8080/"),
            ("SPECTRA_TIMEOUT_SECS", "45"),
            ("SPECTRA_CONFIRM_PLOT", "yes"),
        ]));
        assert_eq!(config.server_url, "http://lab.local:8080");
        assert_eq!(config.timeout, Some(Duration::from_secs(45)));
        assert!(config.confirm_plots);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("SPECTRA_SERVER_URL", "   "),
            ("SPECTRA_TIMEOUT_SECS", "soon"),
            ("SPECTRA_CONFIRM_PLOT", "maybe"),
        ]));
        assert_eq!(config, ClientConfig::default());
    }
}
