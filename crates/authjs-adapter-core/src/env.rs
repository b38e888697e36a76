// Environment detection and tracing setup.

use std::sync::OnceLock;

/// Cached environment mode.
static ENV_MODE: OnceLock<EnvMode> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvMode {
    Production,
    Development,
    Test,
}

impl EnvMode {
    /// Parse an environment name; anything unrecognised is development.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" | "testing" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Detect the current environment mode from environment variables.
/// Checks `AUTHJS_ENV`, `RUST_ENV`, and `NODE_ENV` in order.
pub fn detect_env_mode() -> EnvMode {
    *ENV_MODE.get_or_init(|| {
        let env_val = std::env::var("AUTHJS_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .or_else(|_| std::env::var("NODE_ENV"))
            .unwrap_or_default();
        EnvMode::parse(&env_val)
    })
}

pub fn is_production() -> bool {
    detect_env_mode() == EnvMode::Production
}

/// Interpret a boolean-ish string (`1`, `true`, `yes`, `on`).
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Read a boolean flag from the environment. Unset means `false`.
pub fn env_flag(name: &str) -> bool {
    std::env::var(name).map(|v| parse_flag(&v)).unwrap_or(false)
}

/// Initialize the `tracing` subscriber with appropriate defaults.
///
/// `RUST_LOG` wins when set. Otherwise production logs at info and everything
/// else at debug. Calling this more than once is harmless.
pub fn init_logger() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_production() {
            EnvFilter::new("authjs=info")
        } else {
            EnvFilter::new("authjs=debug")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_mode_parse() {
        assert_eq!(EnvMode::parse("production"), EnvMode::Production);
        assert_eq!(EnvMode::parse("PROD"), EnvMode::Production);
        assert_eq!(EnvMode::parse("test"), EnvMode::Test);
        assert_eq!(EnvMode::parse(""), EnvMode::Development);
        assert_eq!(EnvMode::parse("staging"), EnvMode::Development);
    }

    #[test]
    fn test_parse_flag() {
        for on in ["1", "true", "TRUE", "yes", " on "] {
            assert!(parse_flag(on), "{on}");
        }
        for off in ["0", "false", "", "nope"] {
            assert!(!parse_flag(off), "{off}");
        }
    }

    #[test]
    fn test_env_flag_unset_is_false() {
        assert!(!env_flag("AUTHJS_TEST_FLAG_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_init_logger_twice() {
        init_logger();
        init_logger();
    }
}
