//! Collaborators outside the practice engine: where phrases come from and
//! where finished sessions are reported.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use practice_core::catalog::PhraseCatalog;
use practice_core::model::{LearnerId, TargetPhrase};
use serde::{Deserialize, Serialize};

use crate::context::LearnerContext;
use crate::error::PortError;

/// Position of a lesson within a language course.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LessonRef {
    pub language_code: String,
    pub unit: u32,
    pub lesson: u32,
}

impl LessonRef {
    #[must_use]
    pub fn new(language_code: impl Into<String>, unit: u32, lesson: u32) -> Self {
        Self {
            language_code: language_code.into().trim().to_ascii_lowercase(),
            unit,
            lesson,
        }
    }
}

/// Payload handed to the progress-recording service after a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub language_code: String,
    pub unit: u32,
    pub lesson: u32,
    pub score: u32,
}

/// Read-only source of target phrases, consulted when a session is built.
#[async_trait]
pub trait PhraseProvider: Send + Sync {
    /// Phrases for the given lesson, in practice order.
    ///
    /// # Errors
    ///
    /// Returns `PortError` if the lesson cannot be loaded.
    async fn phrases(&self, lesson: &LessonRef) -> Result<Vec<TargetPhrase>, PortError>;
}

/// Records completed-session progress for a learner.
#[async_trait]
pub trait ProgressRecorder: Send + Sync {
    /// # Errors
    ///
    /// Returns `PortError` if the report cannot be stored.
    async fn record(&self, learner: &LearnerContext, report: &ProgressReport)
    -> Result<(), PortError>;
}

/// Serves the built-in word lists regardless of unit and lesson.
///
/// Languages without a list get the English words unless the fallback is
/// turned off, in which case they are `PortError::NotFound`.
#[derive(Debug, Clone, Copy)]
pub struct CatalogPhraseProvider {
    catalog: PhraseCatalog,
    fallback: bool,
}

impl CatalogPhraseProvider {
    #[must_use]
    pub fn new(catalog: PhraseCatalog) -> Self {
        Self {
            catalog,
            fallback: true,
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }
}

impl Default for CatalogPhraseProvider {
    fn default() -> Self {
        Self::new(PhraseCatalog::builtin())
    }
}

#[async_trait]
impl PhraseProvider for CatalogPhraseProvider {
    async fn phrases(&self, lesson: &LessonRef) -> Result<Vec<TargetPhrase>, PortError> {
        if !self.fallback && !self.catalog.has_language(&lesson.language_code) {
            return Err(PortError::NotFound);
        }
        Ok(self.catalog.phrases_for(&lesson.language_code)?)
    }
}

/// Keeps reports in memory, for tests and offline runs.
#[derive(Clone, Default)]
pub struct InMemoryProgressRecorder {
    reports: Arc<Mutex<Vec<(LearnerId, ProgressReport)>>>,
}

impl InMemoryProgressRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports recorded so far, oldest first.
    #[must_use]
    pub fn reports(&self) -> Vec<(LearnerId, ProgressReport)> {
        self.reports
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ProgressRecorder for InMemoryProgressRecorder {
    async fn record(
        &self,
        learner: &LearnerContext,
        report: &ProgressReport,
    ) -> Result<(), PortError> {
        let mut guard = self
            .reports
            .lock()
            .map_err(|e| PortError::Backend(e.to_string()))?;
        guard.push((learner.learner_id(), report.clone()));
        Ok(())
    }
}
