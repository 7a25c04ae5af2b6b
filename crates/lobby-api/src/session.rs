//! Signed, expiring staff session tokens.
//!
//! A token is `base64url(payload) . hex(sha256(secret || payload))`, where
//! the payload is a compact JSON claims object. The MAC keeps the token
//! tamper-evident; the payload is not encrypted and carries no secrets.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD as B64};
use chrono::{DateTime, Duration, Utc};
use lobby_core::staff::StaffRole;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// The claims carried inside a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
  pub staff_id:   Uuid,
  pub role:       StaffRole,
  pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
    self.expires_at <= now
  }
}

/// Issues and verifies session tokens with a process-wide secret.
#[derive(Clone)]
pub struct SessionKeys {
  secret: Vec<u8>,
  ttl:    Duration,
}

impl SessionKeys {
  pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
    Self { secret: secret.into(), ttl }
  }

  /// Mint a token for a freshly authenticated staff member.
  pub fn issue(&self, staff_id: Uuid, role: StaffRole) -> String {
    let claims = SessionClaims {
      staff_id,
      role,
      expires_at: Utc::now() + self.ttl,
    };
    // Serialisation of a plain struct cannot fail.
    let payload =
      serde_json::to_vec(&claims).expect("session claims serialise");
    let mac = self.mac(&payload);
    format!("{}.{}", B64.encode(&payload), hex::encode(mac))
  }

  /// Verify a presented token: signature first, then expiry.
  pub fn verify(&self, token: &str) -> Option<SessionClaims> {
    let (payload_b64, mac_hex) = token.split_once('.')?;
    let payload = B64.decode(payload_b64).ok()?;
    let presented = hex::decode(mac_hex).ok()?;

    let expected = self.mac(&payload);
    if !constant_time_eq(&presented, &expected) {
      return None;
    }

    let claims: SessionClaims = serde_json::from_slice(&payload).ok()?;
    if claims.is_expired(Utc::now()) {
      return None;
    }
    Some(claims)
  }

  fn mac(&self, payload: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(&self.secret);
    hasher.update(b".");
    hasher.update(payload);
    hasher.finalize().into()
  }
}

/// Compare MACs without an early exit on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
  if a.len() != b.len() {
    return false;
  }
  a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
  use super::*;

  fn keys() -> SessionKeys {
    SessionKeys::new(*b"0123456789abcdef0123456789abcdef", Duration::hours(8))
  }

  #[test]
  fn issued_token_round_trips() {
    let keys = keys();
    let staff_id = Uuid::new_v4();
    let token = keys.issue(staff_id, StaffRole::Receptionist);

    let claims = keys.verify(&token).expect("valid token verifies");
    assert_eq!(claims.staff_id, staff_id);
    assert_eq!(claims.role, StaffRole::Receptionist);
    assert!(!claims.is_expired(Utc::now()));
  }

  #[test]
  fn tampered_payload_is_rejected() {
    let keys = keys();
    let token = keys.issue(Uuid::new_v4(), StaffRole::Receptionist);

    // Swap the payload for one claiming the admin role, keeping the MAC.
    let (_, mac) = token.split_once('.').unwrap();
    let forged_claims = SessionClaims {
      staff_id:   Uuid::new_v4(),
      role:       StaffRole::Admin,
      expires_at: Utc::now() + Duration::hours(8),
    };
    let forged_payload =
      B64.encode(serde_json::to_vec(&forged_claims).unwrap());
    let forged = format!("{forged_payload}.{mac}");

    assert!(keys.verify(&forged).is_none());
  }

  #[test]
  fn wrong_secret_is_rejected() {
    let token = keys().issue(Uuid::new_v4(), StaffRole::Admin);
    let other =
      SessionKeys::new(*b"ffffffffffffffffffffffffffffffff", Duration::hours(8));
    assert!(other.verify(&token).is_none());
  }

  #[test]
  fn expired_token_is_rejected() {
    let keys =
      SessionKeys::new(*b"0123456789abcdef0123456789abcdef", Duration::hours(-1));
    let token = keys.issue(Uuid::new_v4(), StaffRole::Admin);
    assert!(keys.verify(&token).is_none());
  }

  #[test]
  fn garbage_tokens_are_rejected() {
    let keys = keys();
    assert!(keys.verify("").is_none());
    assert!(keys.verify("no-dot-here").is_none());
    assert!(keys.verify("!!!.deadbeef").is_none());
  }
}
