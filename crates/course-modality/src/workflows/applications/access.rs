use std::fmt;

use crate::workflows::records::CourseApplicationRecord;

/// Number of characters in a record PIN. Only the length is validated.
pub const PIN_LENGTH: usize = 4;

/// A caller-supplied PIN that passed the length check.
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(String);

impl Pin {
    /// Returns `None` for anything other than exactly four characters. Leading zeros and
    /// non-digit characters are kept as given.
    pub fn parse(raw: &str) -> Option<Self> {
        (raw.chars().count() == PIN_LENGTH).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

/// Capability check gating mutations and the reason field of a record.
pub trait AccessPolicy: Send + Sync {
    fn authorize(&self, record: &CourseApplicationRecord, pin: &Pin) -> bool;
}

/// Compares the PIN with the password stored on the record itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredPinPolicy;

impl AccessPolicy for StoredPinPolicy {
    fn authorize(&self, record: &CourseApplicationRecord, pin: &Pin) -> bool {
        record.application.password() == pin.as_str()
    }
}

/// Shared override granting read/export access to the whole store. It never authorizes a
/// status change.
#[derive(Clone)]
pub struct AdminPin(Pin);

impl AdminPin {
    pub fn new(pin: Pin) -> Self {
        Self(pin)
    }

    pub fn grants(&self, candidate: &str) -> bool {
        self.0.as_str() == candidate
    }
}

impl fmt::Debug for AdminPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminPin(****)")
    }
}
