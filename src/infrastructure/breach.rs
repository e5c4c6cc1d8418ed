//! Known-breach password lookups
//!
//! Queries a haveibeenpwned-compatible range API using the k-anonymity
//! scheme: only the first five hex characters of the password's SHA-1
//! digest leave the machine; the response lists all digest suffixes in
//! that range and the match is decided locally.

use async_trait::async_trait;
use sha1::{Digest, Sha1};

use crate::application::passwords::CompromisedPasswordChecker;
use crate::support::errors::{DomainError, DomainResult};

/// Breach checker backed by the pwnedpasswords range API.
pub struct HibpPasswordChecker {
    client: reqwest::Client,
    endpoint: String,
}

impl HibpPasswordChecker {
    /// `endpoint` is the API base, e.g. `https://api.pwnedpasswords.com`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl CompromisedPasswordChecker for HibpPasswordChecker {
    async fn is_compromised(&self, plaintext: &str) -> DomainResult<bool> {
        let digest = sha1_hex_upper(plaintext);
        let (prefix, suffix) = digest.split_at(5);

        let url = format!("{}/range/{}", self.endpoint.trim_end_matches('/'), prefix);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| DomainError::Storage(format!("Breach lookup failed: {}", e)))?;
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Storage(format!("Breach lookup failed: {}", e)))?;

        Ok(range_contains_suffix(&body, suffix))
    }
}

fn sha1_hex_upper(plaintext: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(plaintext.as_bytes());
    hex::encode_upper(hasher.finalize())
}

/// Each response line is `SUFFIX:COUNT`; a listed suffix with a non-zero
/// count means the password is known-breached. Zero-count entries exist
/// when the API is asked for padded responses.
fn range_contains_suffix(body: &str, suffix: &str) -> bool {
    body.lines().any(|line| {
        let mut parts = line.trim().splitn(2, ':');
        let listed = parts.next().unwrap_or("");
        let count = parts
            .next()
            .and_then(|count| count.trim().parse::<u64>().ok())
            .unwrap_or(0);
        listed.eq_ignore_ascii_case(suffix) && count > 0
    })
}
