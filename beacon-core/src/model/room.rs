use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default token length handed out to new rooms.
pub const DEFAULT_TOKEN_LENGTH: usize = 5;

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Short random token identifying an active room.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(transparent)]
pub struct RoomToken(String);

impl RoomToken {
    /// Draws a fresh token of `len` characters from `[0-9a-z]`.
    ///
    /// Uniqueness against live rooms is the caller's job.
    pub fn generate(len: usize) -> Self {
        let mut rng = rand::rng();
        let token = (0..len)
            .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
            .collect();
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RoomToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RoomToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
