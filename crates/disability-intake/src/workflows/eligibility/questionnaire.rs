use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Stable question identifiers shared by the scorer, the flow controller, and the wire format.
pub mod ids {
    pub const STOPPED_WORKING: &str = "stoppedWorking";
    pub const DURATION_12_MONTHS: &str = "duration12mo";
    pub const LIMITATION: &str = "limitation";
    pub const AGE_BAND: &str = "ageBand";
    pub const WORK_CREDITS: &str = "workCredits5of10";
    pub const PRIOR_APPLICATION: &str = "priorApplication";
    pub const ZIP: &str = "zip";
}

pub const YES: &str = "Sí";
pub const NO: &str = "No";

/// How a question collects its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Choice(&'static [&'static str]),
    FreeText,
}

impl QuestionKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Choice(_) => "choice",
            Self::FreeText => "free_text",
        }
    }

    pub fn options(self) -> &'static [&'static str] {
        match self {
            Self::Choice(options) => options,
            Self::FreeText => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: QuestionKind,
}

impl Question {
    /// Whether `value` is an acceptable answer. Blank input never is.
    pub fn accepts(&self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }

        match self.kind {
            QuestionKind::Choice(options) => options.contains(&value),
            QuestionKind::FreeText => true,
        }
    }

    /// Plain-text prompt used by terminal front ends.
    pub fn render(&self, selected: Option<&str>) -> String {
        let mut out = String::from(self.label);
        match self.kind {
            QuestionKind::Choice(options) => {
                for (index, option) in options.iter().enumerate() {
                    let marker = if selected == Some(*option) { "*" } else { " " };
                    out.push_str(&format!("\n {marker} {}) {option}", index + 1));
                }
            }
            QuestionKind::FreeText => {
                if let Some(current) = selected {
                    out.push_str(&format!("\n   [{current}]"));
                }
            }
        }
        out
    }

    pub fn view(&self) -> QuestionView {
        QuestionView {
            id: self.id,
            label: self.label,
            kind: self.kind.label(),
            options: self.kind.options().to_vec(),
        }
    }
}

/// Serializable projection of a question for API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: &'static str,
    pub options: Vec<&'static str>,
}

static QUESTIONS: [Question; 7] = [
    Question {
        id: ids::STOPPED_WORKING,
        label: "¿Has dejado de trabajar o planeas dejar de trabajar pronto?",
        kind: QuestionKind::Choice(&[YES, NO]),
    },
    Question {
        id: ids::DURATION_12_MONTHS,
        label: "¿Tu condición ha durado o durará 12 meses o más?",
        kind: QuestionKind::Choice(&[YES, NO]),
    },
    Question {
        id: ids::LIMITATION,
        label: "¿Cómo limita tu condición tu capacidad de trabajar?",
        kind: QuestionKind::Choice(&[
            "No puedo trabajar",
            "No puedo sostener tiempo completo",
            "Faltas frecuentes",
            "Necesito acomodos",
            "Ninguna",
        ]),
    },
    Question {
        id: ids::AGE_BAND,
        label: "¿Cuál es tu rango de edad?",
        kind: QuestionKind::Choice(&["18–29", "30–49", "50–54", "55–59", "60–64"]),
    },
    Question {
        id: ids::WORK_CREDITS,
        label: "¿Has pagado impuestos del Seguro Social ~5 de los últimos 10 años?",
        kind: QuestionKind::Choice(&[YES, NO, "No estoy seguro/a"]),
    },
    Question {
        id: ids::PRIOR_APPLICATION,
        label: "¿Has solicitado antes?",
        kind: QuestionKind::Choice(&[
            NO,
            "Denegado en inicial",
            "Denegado en reconsideración",
            "Denegado en vista",
            "Denegado en Consejo de Apelaciones",
        ]),
    },
    Question {
        id: ids::ZIP,
        label: "Código postal",
        kind: QuestionKind::FreeText,
    },
];

/// The fixed, ordered intake questionnaire.
pub fn questions() -> &'static [Question] {
    &QUESTIONS
}

pub fn find_question(id: &str) -> Option<&'static Question> {
    QUESTIONS.iter().find(|question| question.id == id)
}

/// Answers keyed by question id. Blank answers are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, String>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn is_answered(&self, id: &str) -> bool {
        self.get(id).map(|value| !value.trim().is_empty()).unwrap_or(false)
    }

    /// Record an answer; a blank value clears the entry instead.
    pub fn record(&mut self, id: impl Into<String>, value: impl Into<String>) {
        let id = id.into();
        let value = value.into();
        if value.trim().is_empty() {
            self.0.remove(&id);
        } else {
            self.0.insert(id, value.trim().to_string());
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<String> {
        self.0.remove(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(id, value)| (id.as_str(), value.as_str()))
    }

    /// True when every question in `questions` has a non-blank answer.
    pub fn covers(&self, questions: &[Question]) -> bool {
        questions.iter().all(|question| self.is_answered(question.id))
    }
}

impl<K, V> FromIterator<(K, V)> for AnswerSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut answers = AnswerSet::new();
        for (id, value) in iter {
            answers.record(id, value);
        }
        answers
    }
}
