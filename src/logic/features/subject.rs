use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// League-typical age, used when a subject's age is unknown
pub const DEFAULT_SUBJECT_AGE: f64 = 27.0;

/// A player to be scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub age: Option<f64>,
}

impl Subject {
    pub fn new(name: &str, position: &str, age: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            position: position.to_string(),
            age,
        }
    }

    pub fn age_or_default(&self) -> f64 {
        self.age.unwrap_or(DEFAULT_SUBJECT_AGE)
    }
}

/// Ordered list of subjects for synthetic generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster(pub Vec<Subject>);

impl Roster {
    /// The five sample players
    pub fn sample() -> Self {
        Roster(vec![
            Subject::new("LeBron James", "SF", Some(39.0)),
            Subject::new("Stephen Curry", "PG", Some(35.0)),
            Subject::new("Kevin Durant", "PF", Some(35.0)),
            Subject::new("Giannis Antetokounmpo", "PF", Some(29.0)),
            Subject::new("Luka Doncic", "PG", Some(25.0)),
        ])
    }

    pub fn from_json(bytes: &[u8]) -> PipelineResult<Self> {
        let roster: Roster = serde_json::from_slice(bytes)
            .map_err(|e| PipelineError::Config(format!("invalid roster: {}", e)))?;
        if roster.0.is_empty() {
            return Err(PipelineError::Config("roster is empty".to_string()));
        }
        Ok(roster)
    }

    pub fn load(path: &Path) -> PipelineResult<Self> {
        let data = std::fs::read(path)
            .map_err(|e| PipelineError::Config(format!("reading roster {}: {}", path.display(), e)))?;
        Self::from_json(&data)
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.0
    }
}
