use serde::Serialize;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub total: usize,
    pub current_index: usize,
    pub completed: usize,
    pub attempts: usize,
    /// Position in the phrase list as a rounded percentage.
    pub progress_percent: u32,
    pub total_score: u32,
    /// Rounded mean of the completed phrases' best scores.
    pub average_score: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub is_complete: bool,
}

/// Practice history of a single phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhraseStatus {
    pub index: usize,
    pub text: String,
    pub attempts: usize,
    pub best_score: Option<u32>,
    pub success: bool,
}
