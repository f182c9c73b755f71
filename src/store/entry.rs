//! Store Entry Module
//!
//! Defines the structure for individual stored values with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Entry ==
/// A single stored value and its expiration deadline.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The stored bytes
    pub value: Vec<u8>,
    /// Expiration deadline, None = no expiration
    pub expires_at: Option<Instant>,
}

impl Entry {
    // == Constructors ==
    /// Creates an entry that never expires.
    pub fn persistent(value: Vec<u8>) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Creates an entry expiring `ttl_secs` seconds from now.
    ///
    /// Returns None when the deadline lies beyond what the clock can represent.
    pub fn expiring(value: Vec<u8>, ttl_secs: u64) -> Option<Self> {
        let deadline = Instant::now().checked_add(Duration::from_secs(ttl_secs))?;
        Some(Self {
            value,
            expires_at: Some(deadline),
        })
    }

    /// Creates an entry with an explicit deadline, used when a write must
    /// keep the TTL of the value it replaces.
    pub fn with_deadline(value: Vec<u8>, expires_at: Option<Instant>) -> Self {
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now >= expires_at`, so a TTL that has fully
    /// elapsed never serves the value again.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }

    /// Checks if the entry has expired as of the current tokio clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining TTL, or None if no expiration is set.
    ///
    /// Saturates at zero once the deadline has passed.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}
