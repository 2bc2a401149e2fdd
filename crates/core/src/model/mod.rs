mod attempt;
mod ids;
mod language;
mod phrase;
mod session;

pub use attempt::{AttemptOutcome, AttemptRecord, RecognitionResult};
pub use ids::{LearnerId, ParseIdError};
pub use language::LanguageTag;
pub use phrase::{Difficulty, PhraseError, TargetPhrase};
pub use session::{SessionSummary, SessionSummaryError};
