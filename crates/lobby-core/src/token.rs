//! Verification-token generation.
//!
//! A token is a short, fixed-length code a visitor reads out at the desk.
//! The generator alone does not guarantee uniqueness: the store enforces a
//! UNIQUE constraint on the token column, and the registration path
//! regenerates and retries a bounded number of times on collision.

use rand_core::{OsRng, RngCore};

/// Fixed length of every generated token, in characters.
pub const TOKEN_LEN: usize = 6;

/// How many fresh tokens the registration path will try before giving up
/// with a conflict error.
pub const MAX_TOKEN_ATTEMPTS: usize = 4;

/// A source of verification tokens.
///
/// Implementations must return a fixed-length code drawn from a source of
/// randomness with at least ~20 bits of entropy. Test code substitutes a
/// deterministic implementation to force collisions.
pub trait TokenGenerator: Send + Sync {
  fn generate(&self) -> String;
}

/// The default generator: [`TOKEN_LEN`] decimal digits from OS randomness.
///
/// If the OS randomness source fails this panics, which aborts the request —
/// registration cannot proceed without entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericTokenGenerator;

impl TokenGenerator for NumericTokenGenerator {
  fn generate(&self) -> String {
    let n = OsRng.next_u32() % 1_000_000;
    format!("{n:06}")
  }
}
