//! Drill session recording
//!
//! The core reports one record at the end of each drill. Whatever stores it
//! (database, file, nothing) lives behind `SessionRecorder`; a failure there
//! is logged by the caller and never interrupts play.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
    #[error("session file i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file format: {0}")]
    Format(#[from] serde_json::Error),
}

/// Identifies one sitting of one student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Result of one finished drill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub student: String,
    pub questions_asked: u32,
    pub questions_correct: u32,
    pub percent_correct: f32,
}

impl SessionRecord {
    pub fn new(session_id: SessionId, student: &str, asked: u32, correct: u32) -> Self {
        Self {
            session_id,
            student: student.to_string(),
            questions_asked: asked,
            questions_correct: correct,
            percent_correct: percent_correct(asked, correct),
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.questions_asked > 0 && self.questions_correct == self.questions_asked
    }
}

/// 0..=100, and 0 for an empty drill
pub fn percent_correct(asked: u32, correct: u32) -> f32 {
    if asked == 0 {
        0.0
    } else {
        correct as f32 * 100.0 / asked as f32
    }
}

pub trait SessionRecorder {
    fn record(&mut self, record: &SessionRecord) -> Result<(), PersistenceError>;
}

/// Recorder that drops everything
#[derive(Debug, Default)]
pub struct NoRecorder;

impl SessionRecorder for NoRecorder {
    fn record(&mut self, _record: &SessionRecord) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Append-only session history, optionally mirrored to a JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionLog {
    pub entries: Vec<SessionRecord>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl SessionLog {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load history from `path` if it exists; later records are written back to it
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        let mut history = if path.exists() {
            let json = std::fs::read_to_string(&path)?;
            let history: SessionLog = serde_json::from_str(&json)?;
            log::info!("Loaded {} sessions from {}", history.entries.len(), path.display());
            history
        } else {
            log::info!("No session history at {}, starting fresh", path.display());
            Self::default()
        };
        history.path = Some(path);
        Ok(history)
    }

    fn save(&self) -> Result<(), PersistenceError> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(self)?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Sessions recorded for one student, oldest first
    pub fn for_student<'a>(&'a self, student: &'a str) -> impl Iterator<Item = &'a SessionRecord> {
        self.entries.iter().filter(move |e| e.student == student)
    }

    /// Best percentage a student has reached
    pub fn best_percent(&self, student: &str) -> Option<f32> {
        self.for_student(student)
            .map(|e| e.percent_correct)
            .reduce(f32::max)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionRecorder for SessionLog {
    fn record(&mut self, record: &SessionRecord) -> Result<(), PersistenceError> {
        self.entries.push(record.clone());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_correct() {
        assert_eq!(percent_correct(0, 0), 0.0);
        assert_eq!(percent_correct(10, 7), 70.0);
        assert_eq!(percent_correct(4, 4), 100.0);
    }

    #[test]
    fn test_record_perfect() {
        assert!(SessionRecord::new(SessionId(1), "Ada", 10, 10).is_perfect());
        assert!(!SessionRecord::new(SessionId(1), "Ada", 10, 9).is_perfect());
        assert!(!SessionRecord::new(SessionId(1), "Ada", 0, 0).is_perfect());
    }

    #[test]
    fn test_log_tracks_best_per_student() {
        let mut log = SessionLog::in_memory();
        log.record(&SessionRecord::new(SessionId(1), "Ada", 10, 6)).unwrap();
        log.record(&SessionRecord::new(SessionId(2), "Bo", 10, 10)).unwrap();
        log.record(&SessionRecord::new(SessionId(3), "Ada", 10, 9)).unwrap();
        assert_eq!(log.best_percent("Ada"), Some(90.0));
        assert_eq!(log.for_student("Bo").count(), 1);
        assert_eq!(log.best_percent("Cy"), None);
    }

    #[test]
    fn test_file_log_round_trips() {
        let path = std::env::temp_dir().join(format!("number-cat-sessions-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);
        {
            let mut log = SessionLog::open(&path).unwrap();
            assert!(log.is_empty());
            log.record(&SessionRecord::new(SessionId(7), "Ada", 10, 10)).unwrap();
        }
        let reopened = SessionLog::open(&path).unwrap();
        assert_eq!(reopened.entries.len(), 1);
        assert_eq!(reopened.entries[0].session_id, SessionId(7));
        let _ = std::fs::remove_file(&path);
    }
}
