//! Visitor identity
//!
//! The game service keys its per-player state on an opaque visitor id chosen
//! by the client. One id is generated per session; it is not secret and only
//! needs to avoid collisions probabilistically.

use std::fmt;

use rand::Rng;
use serde::Serialize;

/// Exclusive upper bound of the numeric suffix
const SUFFIX_RANGE: u32 = 1_000_000;

/// Opaque visitor identifier, e.g. `visitor-48213`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VisitorId(String);

impl VisitorId {
    /// Generate a fresh id from the thread-local RNG
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Generate a fresh id from the given RNG
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(format!("visitor-{}", rng.gen_range(0..SUFFIX_RANGE)))
    }

    /// Use a caller-supplied id (from config or the command line)
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for VisitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
