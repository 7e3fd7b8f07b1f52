/// Server-issued correlation token tying turns into one conversation.
///
/// Starts unset. Once a token is assigned it stays until the backend hands
/// out a different one; nothing clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionIdentity {
    token: Option<String>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current token, if the backend has issued one
    pub fn get(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Assign a token. Returns `false` when the token was already current.
    pub fn set(&mut self, token: impl Into<String>) -> bool {
        let token = token.into();
        if self.token.as_deref() == Some(token.as_str()) {
            return false;
        }
        self.token = Some(token);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_absent() {
        let identity = SessionIdentity::new();
        assert_eq!(identity.get(), None);
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut identity = SessionIdentity::new();
        assert!(identity.set("abc123"));
        assert!(!identity.set("abc123"));
        assert_eq!(identity.get(), Some("abc123"));
    }

    #[test]
    fn test_newer_token_replaces() {
        let mut identity = SessionIdentity::new();
        identity.set("abc123");
        assert!(identity.set("def456"));
        assert_eq!(identity.get(), Some("def456"));
    }
}
