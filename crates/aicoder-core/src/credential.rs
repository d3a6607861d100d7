use std::fmt;

/// Environment variable holding the completion API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Secret used to authenticate completion requests.
///
/// The value is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap an API key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Read the API key from [`API_KEY_ENV`].
    ///
    /// Returns `None` when the variable is unset, not unicode, or blank.
    pub fn from_env() -> Option<Self> {
        Self::from_value(std::env::var(API_KEY_ENV).ok())
    }

    fn from_value(value: Option<String>) -> Option<Self> {
        value
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .map(Self)
    }

    /// The raw secret, for building the authorization header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_reject_absent_or_blank_value() {
        assert!(Credential::from_value(None).is_none());
        assert!(Credential::from_value(Some(String::new())).is_none());
        assert!(Credential::from_value(Some("  \n".to_owned())).is_none());
    }

    #[test]
    fn test_should_trim_surrounding_whitespace() {
        let credential = Credential::from_value(Some(" sk-test\n".to_owned()))
            .expect("should accept key");
        assert_eq!(credential.expose(), "sk-test");
    }

    #[test]
    fn test_should_redact_debug_output() {
        let credential = Credential::new("sk-very-secret");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert_eq!(debug, "Credential(***)");
    }
}
