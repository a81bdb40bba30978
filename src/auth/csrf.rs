use chrono::Utc;
use sha2::{Digest, Sha256};

/// Tokens issued slightly in the future are tolerated to absorb clock drift
/// between replicas.
const CLOCK_SKEW_SECS: i64 = 60;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CsrfError {
    #[error("CSRF token missing")]
    Missing,
    #[error("CSRF token malformed")]
    Malformed,
    #[error("CSRF token expired")]
    Expired,
    #[error("CSRF token does not match session")]
    Mismatch,
    #[error("CSRF secret not configured")]
    SecretNotConfigured,
}

/// Stateless anti-forgery tokens bound to the session user.
///
/// A token is `"{issued_at}.{digest}"`, the digest being SHA-256 over the
/// secret, the user and the issue time.
pub struct CsrfGuard {
    secret: String,
    expiry_secs: i64,
}

impl CsrfGuard {
    pub fn new(secret: impl Into<String>, expiry_minutes: u64) -> Self {
        Self {
            secret: secret.into(),
            expiry_secs: i64::try_from(expiry_minutes)
                .unwrap_or(i64::MAX)
                .saturating_mul(60),
        }
    }

    pub fn expiry_secs(&self) -> i64 {
        self.expiry_secs
    }

    pub fn issue(&self, user: &str) -> Result<String, CsrfError> {
        self.issue_at(user, Utc::now().timestamp())
    }

    fn issue_at(&self, user: &str, issued_at: i64) -> Result<String, CsrfError> {
        if self.secret.is_empty() {
            return Err(CsrfError::SecretNotConfigured);
        }
        Ok(format!("{}.{}", issued_at, self.digest(user, issued_at)))
    }

    pub fn verify(&self, token: Option<&str>, user: &str) -> Result<(), CsrfError> {
        self.verify_at(token, user, Utc::now().timestamp())
    }

    fn verify_at(&self, token: Option<&str>, user: &str, now: i64) -> Result<(), CsrfError> {
        if self.secret.is_empty() {
            return Err(CsrfError::SecretNotConfigured);
        }

        let token = token.map(str::trim).filter(|t| !t.is_empty()).ok_or(CsrfError::Missing)?;
        let (issued_at, digest) = token.split_once('.').ok_or(CsrfError::Malformed)?;
        let issued_at = issued_at
            .parse::<i64>()
            .ok()
            .filter(|t| *t >= 0)
            .ok_or(CsrfError::Malformed)?;

        let too_new = issued_at > now.saturating_add(CLOCK_SKEW_SECS);
        let too_old = now
            .checked_sub(issued_at)
            .map_or(true, |age| age > self.expiry_secs);
        if too_new || too_old {
            return Err(CsrfError::Expired);
        }

        let expected = self.digest(user, issued_at);
        if !constant_time_eq(expected.as_bytes(), digest.as_bytes()) {
            return Err(CsrfError::Mismatch);
        }

        Ok(())
    }

    fn digest(&self, user: &str, issued_at: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b":");
        hasher.update(user.as_bytes());
        hasher.update(b":");
        hasher.update(issued_at.to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
