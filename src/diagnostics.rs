// src/diagnostics.rs

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Severity of a recorded pipeline event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// One event raised while loading or scoring a dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    /// Indicator key the event concerns, if any (e.g. "Unemp").
    pub indicator: Option<String>,
    /// Source file name the event concerns, if any.
    pub file: Option<String>,
}

/// Ordered list of events returned alongside every pipeline result.
///
/// Each push is mirrored to `tracing` so a host with a subscriber sees the
/// same stream; callers that only inspect the returned value need no
/// subscriber at all.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diag: Diagnostic) {
        let indicator = diag.indicator.as_deref().unwrap_or("-");
        let file = diag.file.as_deref().unwrap_or("-");
        match diag.level {
            Level::Info | Level::Success => info!(indicator, file, "{}", diag.message),
            Level::Warning => warn!(indicator, file, "{}", diag.message),
            Level::Error => error!(indicator, file, "{}", diag.message),
        }
        self.events.push(diag);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Diagnostic::new(Level::Info, message));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Diagnostic::new(Level::Success, message));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Diagnostic::new(Level::Warning, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Diagnostic::new(Level::Error, message));
    }

    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.events.iter().filter(|d| d.level == Level::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.events.iter().any(|d| d.level == Level::Error)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            indicator: None,
            file: None,
        }
    }

    pub fn indicator(mut self, key: &str) -> Self {
        self.indicator = Some(key.to_string());
        self
    }

    pub fn file(mut self, file: &str) -> Self {
        self.file = Some(file.to_string());
        self
    }
}
