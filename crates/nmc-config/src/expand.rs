//! `${VAR}` expansion for configuration strings.
//!
//! Only braced references are expanded. `${VAR:-default}` falls back to
//! `default` when `VAR` is unset; a bare `${VAR}` that is unset is an error
//! naming the config field it appeared in.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// `field` is the dotted config path used in error messages
/// (e.g. `notion.api_token`).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var).map(Some).map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Expand in place, leaving `None` untouched.
pub(crate) fn expand_optional(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(inner) = value.as_mut() {
        *inner = expand_env(inner, field)?;
    }
    Ok(())
}

/// Name of a variable that was referenced but not set.
struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_token_from_env() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("NMC_EXPAND_TOKEN", "secret_abc");
        }
        let result = expand_env("${NMC_EXPAND_TOKEN}", "notion.api_token").unwrap();
        assert_eq!(result, "secret_abc");
        unsafe {
            std::env::remove_var("NMC_EXPAND_TOKEN");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("NMC_EXPAND_UNSET");
        }
        let result = expand_env("${NMC_EXPAND_UNSET:-content}", "output_dir").unwrap();
        assert_eq!(result, "content");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("NMC_EXPAND_MISSING");
        }
        let err = expand_env("${NMC_EXPAND_MISSING}", "cms_database_id").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("NMC_EXPAND_MISSING"));
        assert!(err.to_string().contains("cms_database_id"));
    }

    #[test]
    fn test_expand_embedded_in_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("NMC_EXPAND_HOST", "notion.internal");
        }
        let result = expand_env("https://${NMC_EXPAND_HOST}/v1", "notion.base_url").unwrap();
        assert_eq!(result, "https://notion.internal/v1");
        unsafe {
            std::env::remove_var("NMC_EXPAND_HOST");
        }
    }

    #[test]
    fn test_literal_and_bare_dollar_unchanged() {
        assert_eq!(expand_env("content", "output_dir").unwrap(), "content");
        assert_eq!(expand_env("$HOME", "output_dir").unwrap(), "$HOME");
    }

    #[test]
    fn test_expand_optional_none_is_noop() {
        let mut value = None;
        expand_optional(&mut value, "notion.base_url").unwrap();
        assert!(value.is_none());
    }
}
