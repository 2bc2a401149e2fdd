mod controller;
mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::{AttemptReport, PracticeSessionController, SessionPhase};
pub use progress::{PhraseStatus, SessionProgress};
pub use service::{PracticeSession, Transition};
pub use workflow::{PracticeLoopService, SessionOutcome};
