//! Session token generation

use rand::RngCore;

use crate::domain::session::SessionToken;

/// Generator for unguessable session tokens
#[derive(Debug, Clone)]
pub struct SessionTokenGenerator {
    /// Number of random bytes per token
    token_bytes: usize,
}

impl SessionTokenGenerator {
    pub fn new() -> Self {
        Self { token_bytes: 32 }
    }

    /// Generate a fresh token
    pub fn generate(&self) -> SessionToken {
        let mut random_bytes = vec![0u8; self.token_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        SessionToken::from_bytes(&random_bytes)
    }
}

impl Default for SessionTokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
