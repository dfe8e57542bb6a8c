use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::questionnaire::AnswerSet;

/// Coarse eligibility outcome produced by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationTag {
    LikelySsdi,
    PossibleSsi,
    Appeals,
    NotLikely,
}

impl ClassificationTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LikelySsdi => "likely_ssdi",
            Self::PossibleSsi => "possible_ssi",
            Self::Appeals => "appeals",
            Self::NotLikely => "not_likely",
        }
    }

    /// Headline shown to the person on the result screen.
    pub const fn title(self) -> &'static str {
        match self {
            Self::LikelySsdi => "Es probable que califiques para SSDI",
            Self::PossibleSsi => "Podrías calificar para SSI",
            Self::Appeals => "Podrías tener opciones de apelación",
            Self::NotLikely => "Es posible que no cumplas con las guías del SSA",
        }
    }
}

/// Tagged outcome plus the explanation lines, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub path: ClassificationTag,
    pub summary: Vec<String>,
}

impl ClassificationResult {
    pub fn new(path: ClassificationTag, summary: &[&str]) -> Self {
        Self {
            path,
            summary: summary.iter().map(|line| line.to_string()).collect(),
        }
    }

    pub fn title(&self) -> &'static str {
        self.path.title()
    }
}

pub const DEFAULT_BEST_TIME: &str = "Mañana";
pub const BEST_TIME_OPTIONS: [&str; 3] = ["Mañana", "Tarde", "Noche"];

/// Contact details captured after the quiz for human follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub best_time: String,
    pub consent: bool,
}

impl Default for Lead {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            best_time: DEFAULT_BEST_TIME.to_string(),
            consent: false,
        }
    }
}

/// Payload forwarded to the lead endpoint and on to the notification sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub answers: AnswerSet,
    pub result: ClassificationResult,
    pub lead: Lead,
}

/// Identifier wrapper for accepted leads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// Acknowledgement returned once a lead has been accepted and delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadReceipt {
    pub ok: bool,
    pub lead_id: LeadId,
    pub received_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_result_uses_snake_case_path() {
        let result = ClassificationResult::new(ClassificationTag::LikelySsdi, &["a", "b"]);
        let json = serde_json::to_value(&result).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({ "path": "likely_ssdi", "summary": ["a", "b"] })
        );
        assert_eq!(result.title(), "Es probable que califiques para SSDI");
    }

    #[test]
    fn lead_uses_camel_case_fields_and_morning_default() {
        let lead = Lead::default();
        let json = serde_json::to_value(&lead).expect("serializes");
        assert_eq!(json["bestTime"], "Mañana");
        assert_eq!(json["firstName"], "");
        assert_eq!(json["consent"], false);
    }
}
