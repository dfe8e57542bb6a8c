mod policy;
mod rules;

use serde::{Deserialize, Serialize};

use super::domain::ClassificationResult;
use super::questionnaire::AnswerSet;
use policy::decide_outcome;

/// Stateless scorer mapping an answer set to an eligibility classification.
///
/// Missing answers are treated as absent rather than as errors, so the scorer is total
/// over any answer set.
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityScorer;

impl EligibilityScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, answers: &AnswerSet) -> ClassificationResult {
        self.assess(answers).result
    }

    /// Classify and keep the per-factor trail for audits and logs.
    pub fn assess(&self, answers: &AnswerSet) -> EligibilityAssessment {
        let trail = rules::score_answers(answers);
        let result = decide_outcome(&trail.signals, trail.total_score);

        EligibilityAssessment {
            result,
            total_score: trail.total_score,
            components: trail.components,
        }
    }
}

/// Factors that contribute to the eligibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityFactor {
    StoppedWorking,
    Duration,
    Limitation,
    AgeBand,
    WorkCredits,
}

/// Discrete contribution to a score, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: EligibilityFactor,
    pub score: i16,
    pub notes: String,
}

/// Classification plus the score and decision trail that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityAssessment {
    pub result: ClassificationResult,
    pub total_score: i16,
    pub components: Vec<ScoreComponent>,
}
