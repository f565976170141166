use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::Rng;

/// Time-bounded keyed cache for password-reset codes. One live code per
/// email; inserting again replaces the previous code, and expired entries are
/// swept on every insert so the map cannot grow without bound.
pub struct VerificationStore {
    ttl: Duration,
    codes: HashMap<String, (String, Instant)>,
}

pub const CODE_TTL: Duration = Duration::from_secs(10 * 60);

impl VerificationStore {
    pub fn new() -> Self {
        Self::with_ttl(CODE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            codes: HashMap::new(),
        }
    }

    pub fn issue(&mut self, email: &str) -> String {
        self.purge_expired();
        let code = generate_code();
        self.codes
            .insert(email.to_string(), (code.clone(), Instant::now() + self.ttl));
        code
    }

    /// Check a code and consume it on success. Expired or mismatched codes
    /// fail; a wrong guess does not invalidate the stored code.
    pub fn consume(&mut self, email: &str, code: &str) -> bool {
        match self.codes.get(email) {
            Some((stored, expires_at)) if *expires_at > Instant::now() && stored == code => {
                self.codes.remove(email);
                true
            }
            Some((_, expires_at)) if *expires_at <= Instant::now() => {
                self.codes.remove(email);
                false
            }
            _ => false,
        }
    }

    fn purge_expired(&mut self) {
        let now = Instant::now();
        self.codes.retain(|_, (_, expires_at)| *expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for VerificationStore {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{n:06}")
}
