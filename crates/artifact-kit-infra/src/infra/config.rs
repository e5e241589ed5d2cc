//! Environment configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::info;
use tracing::warn;

use crate::domain::CompareMode;

pub const RESOURCES_ENV: &str = "ARTIFACT_KIT_RESOURCES";
pub const COMPARE_MODE_ENV: &str = "ARTIFACT_KIT_COMPARE_MODE";
pub const PRETTY_JSON_ENV: &str = "ARTIFACT_KIT_PRETTY_JSON";
pub const TAKE_REQUEST_TIMEOUT_ENV: &str = "ARTIFACT_KIT_TAKE_REQUEST_TIMEOUT_MS";

const DEFAULT_TAKE_REQUEST_TIMEOUT_MS: u64 = 60_000;
const DEFAULT_RESOURCE_DIR: &str = "tests/resources";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitConfig {
    resource_roots: Vec<PathBuf>,
    compare_mode: CompareMode,
    pretty_json: bool,
    take_request_timeout: Duration,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl KitConfig {
    pub fn resource_roots(&self) -> &[PathBuf] {
        &self.resource_roots
    }

    pub fn compare_mode(&self) -> CompareMode {
        self.compare_mode
    }

    pub fn pretty_json(&self) -> bool {
        self.pretty_json
    }

    pub fn take_request_timeout(&self) -> Duration {
        self.take_request_timeout
    }

    pub fn with_resource_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.resource_roots = roots;
        self
    }

    pub fn with_compare_mode(mut self, mode: CompareMode) -> Self {
        self.compare_mode = mode;
        self
    }

    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }

    pub fn with_take_request_timeout(mut self, timeout: Duration) -> Self {
        self.take_request_timeout = timeout;
        self
    }

    pub fn from_env() -> Self {
        Self {
            resource_roots: parse_env_paths(RESOURCES_ENV).unwrap_or_else(default_resource_roots),
            compare_mode: parse_env_compare_mode(COMPARE_MODE_ENV, CompareMode::default()),
            pretty_json: parse_env_bool(PRETTY_JSON_ENV, false),
            take_request_timeout: Duration::from_millis(parse_env_u64(
                TAKE_REQUEST_TIMEOUT_ENV,
                DEFAULT_TAKE_REQUEST_TIMEOUT_MS,
            )),
        }
    }
}

/// `<CARGO_MANIFEST_DIR>/tests/resources` under cargo, else relative to the
/// working directory.
fn default_resource_roots() -> Vec<PathBuf> {
    let root = match env::var_os("CARGO_MANIFEST_DIR") {
        Some(manifest_dir) => PathBuf::from(manifest_dir).join(DEFAULT_RESOURCE_DIR),
        None => PathBuf::from(DEFAULT_RESOURCE_DIR),
    };
    vec![root]
}

fn parse_env_paths(key: &str) -> Option<Vec<PathBuf>> {
    let value = env::var_os(key)?;
    let paths: Vec<PathBuf> = env::split_paths(&value)
        .filter(|path| !path.as_os_str().is_empty())
        .collect();
    if paths.is_empty() { None } else { Some(paths) }
}

fn parse_env_compare_mode(key: &str, default: CompareMode) -> CompareMode {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return default,
    };
    if value.trim().is_empty() {
        return default;
    }
    match value.parse::<CompareMode>() {
        Ok(mode) => {
            if mode != default {
                info!(
                    key,
                    mode = %mode,
                    default = %default,
                    "Compare mode overridden by environment"
                );
            }
            mode
        }
        Err(err) => {
            warn!(value = %value, key, error = %err, "Invalid compare mode config; using default");
            default
        }
    }
}

fn parse_env_bool(key: &str, default: bool) -> bool {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warn!(value = %value, key, "Invalid boolean config; using default");
            default
        }
    }
}

fn parse_env_u64(key: &str, default: u64) -> u64 {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return default,
    };
    if value.trim().is_empty() {
        return default;
    }
    match value.trim().parse::<u64>() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(value = %value, key, "Invalid numeric config; using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;
    use crate::test_support::env_lock;
    use std::env;

    struct EnvGuard {
        key: &'static str,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let prev = env::var(key).ok();
            // SAFETY: Test-only environment override, serialized by env_lock.
            unsafe {
                env::set_var(key, value);
            }
            Self { key, prev }
        }

        fn remove(key: &'static str) -> Self {
            let prev = env::var(key).ok();
            // SAFETY: Test-only environment override, serialized by env_lock.
            unsafe {
                env::remove_var(key);
            }
            Self { key, prev }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(prev) = self.prev.take() {
                // SAFETY: Test-only environment restoration.
                unsafe {
                    env::set_var(self.key, prev);
                }
            } else {
                // SAFETY: Test-only environment cleanup.
                unsafe {
                    env::remove_var(self.key);
                }
            }
        }
    }

    #[test]
    fn test_default_config() {
        let _lock = env_lock();
        let _roots = EnvGuard::remove(RESOURCES_ENV);
        let _mode = EnvGuard::remove(COMPARE_MODE_ENV);
        let _pretty = EnvGuard::remove(PRETTY_JSON_ENV);
        let _timeout = EnvGuard::remove(TAKE_REQUEST_TIMEOUT_ENV);

        let config = KitConfig::default();

        assert_eq!(config.compare_mode(), CompareMode::Exact);
        assert!(!config.pretty_json());
        assert_eq!(config.take_request_timeout(), Duration::from_secs(60));
        assert_eq!(config.resource_roots().len(), 1);
        assert!(config.resource_roots()[0].ends_with("tests/resources"));
    }

    #[test]
    fn test_env_overrides() {
        let _lock = env_lock();
        let joined = env::join_paths(["/srv/fixtures", "/opt/shared"]).unwrap();
        let _roots = EnvGuard::set(RESOURCES_ENV, joined.to_str().unwrap());
        let _mode = EnvGuard::set(COMPARE_MODE_ENV, "lenient");
        let _pretty = EnvGuard::set(PRETTY_JSON_ENV, "true");
        let _timeout = EnvGuard::set(TAKE_REQUEST_TIMEOUT_ENV, "250");

        let config = KitConfig::from_env();

        assert_eq!(
            config.resource_roots(),
            &[PathBuf::from("/srv/fixtures"), PathBuf::from("/opt/shared")]
        );
        assert_eq!(config.compare_mode(), CompareMode::Lenient);
        assert!(config.pretty_json());
        assert_eq!(config.take_request_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_compare_mode_override_is_logged() {
        let _lock = env_lock();
        let _mode = EnvGuard::set(COMPARE_MODE_ENV, "lenient");

        let mut mode = CompareMode::Exact;
        let output = capture_logs(|| {
            mode = parse_env_compare_mode(COMPARE_MODE_ENV, CompareMode::Exact);
        });

        assert_eq!(mode, CompareMode::Lenient);
        assert!(output.contains("Compare mode overridden by environment"));
        assert!(output.contains(COMPARE_MODE_ENV));
        assert!(output.contains("lenient"));
    }

    #[test]
    fn test_compare_mode_matching_default_is_not_logged() {
        let _lock = env_lock();
        let _mode = EnvGuard::set(COMPARE_MODE_ENV, "exact");

        let output = capture_logs(|| {
            assert_eq!(
                parse_env_compare_mode(COMPARE_MODE_ENV, CompareMode::Exact),
                CompareMode::Exact
            );
        });

        assert!(!output.contains("overridden"));
    }

    #[test]
    fn test_invalid_env_uses_defaults() {
        let _lock = env_lock();
        let _roots = EnvGuard::set(RESOURCES_ENV, "");
        let _mode = EnvGuard::set(COMPARE_MODE_ENV, "fuzzy");
        let _pretty = EnvGuard::set(PRETTY_JSON_ENV, "maybe");
        let _timeout = EnvGuard::set(TAKE_REQUEST_TIMEOUT_ENV, "soon");

        let config = KitConfig::from_env();

        assert_eq!(config.compare_mode(), CompareMode::Exact);
        assert!(!config.pretty_json());
        assert_eq!(config.take_request_timeout(), Duration::from_secs(60));
        assert!(config.resource_roots()[0].ends_with("tests/resources"));
    }

    #[test]
    fn test_builder_setters_override_env() {
        let _lock = env_lock();
        let _mode = EnvGuard::set(COMPARE_MODE_ENV, "lenient");

        let config = KitConfig::from_env()
            .with_compare_mode(CompareMode::Exact)
            .with_resource_roots(vec![PathBuf::from("fixtures")]);

        assert_eq!(config.compare_mode(), CompareMode::Exact);
        assert_eq!(config.resource_roots(), &[PathBuf::from("fixtures")]);
    }
}
