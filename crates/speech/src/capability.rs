use std::fmt;

/// Whether a platform speech service is present.
///
/// Decided once when an adapter is built. An unavailable adapter turns every
/// operation into an `Unsupported` no-op and the engine falls back to typed
/// transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Available,
    Unavailable,
}

impl Capability {
    #[must_use]
    pub fn is_available(self) -> bool {
        matches!(self, Capability::Available)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Available => f.write_str("available"),
            Capability::Unavailable => f.write_str("unavailable"),
        }
    }
}
