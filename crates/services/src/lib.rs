#![forbid(unsafe_code)]

pub mod context;
pub mod error;
pub mod ports;
pub mod sessions;

pub use practice_core::Clock;
pub use sessions as session;

pub use context::LearnerContext;
pub use error::{PortError, SessionError};
pub use ports::{
    CatalogPhraseProvider, InMemoryProgressRecorder, LessonRef, PhraseProvider, ProgressRecorder,
    ProgressReport,
};
pub use sessions::{
    AttemptReport, PhraseStatus, PracticeLoopService, PracticeSession, PracticeSessionController,
    SessionOutcome, SessionPhase, SessionProgress, Transition,
};
