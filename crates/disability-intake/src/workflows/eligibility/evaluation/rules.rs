use super::super::questionnaire::{ids, AnswerSet, YES};
use super::{EligibilityFactor, ScoreComponent};

pub(crate) struct ScoreSignals {
    pub stopped_working: bool,
    pub duration_met: bool,
    pub has_credits: bool,
    pub prior_application: Option<String>,
}

pub(crate) struct ScoreTrail {
    pub components: Vec<ScoreComponent>,
    pub total_score: i16,
    pub signals: ScoreSignals,
}

fn limitation_points(answer: &str) -> i16 {
    match answer {
        "No puedo trabajar" => 3,
        "No puedo sostener tiempo completo" => 2,
        "Faltas frecuentes" => 2,
        "Necesito acomodos" => 1,
        "Ninguna" => -2,
        _ => 0,
    }
}

fn age_band_points(answer: &str) -> i16 {
    match answer {
        "30–49" => 1,
        "50–54" => 2,
        "55–59" | "60–64" => 3,
        _ => 0,
    }
}

/// Accumulate the score. Stops after the duration factor when the 12-month gate fails.
pub(crate) fn score_answers(answers: &AnswerSet) -> ScoreTrail {
    let mut components = Vec::new();
    let mut total_score: i16 = 0;

    let stopped_working = answers.get(ids::STOPPED_WORKING) == Some(YES);
    let stopped_points = if stopped_working { 3 } else { -2 };
    components.push(ScoreComponent {
        factor: EligibilityFactor::StoppedWorking,
        score: stopped_points,
        notes: if stopped_working {
            "stopped or stopping work".to_string()
        } else {
            "still working".to_string()
        },
    });
    total_score += stopped_points;

    let duration_met = answers.get(ids::DURATION_12_MONTHS) == Some(YES);
    let has_credits = answers.get(ids::WORK_CREDITS) == Some(YES);
    let prior_application = answers
        .get(ids::PRIOR_APPLICATION)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    if !duration_met {
        components.push(ScoreComponent {
            factor: EligibilityFactor::Duration,
            score: 0,
            notes: "condition under 12 months; remaining factors skipped".to_string(),
        });

        return ScoreTrail {
            components,
            total_score,
            signals: ScoreSignals {
                stopped_working,
                duration_met,
                has_credits,
                prior_application,
            },
        };
    }

    components.push(ScoreComponent {
        factor: EligibilityFactor::Duration,
        score: 3,
        notes: "condition lasts 12 months or more".to_string(),
    });
    total_score += 3;

    let limitation = answers.get(ids::LIMITATION).unwrap_or_default();
    let limitation_score = limitation_points(limitation);
    components.push(ScoreComponent {
        factor: EligibilityFactor::Limitation,
        score: limitation_score,
        notes: if limitation.is_empty() {
            "limitation not answered".to_string()
        } else {
            format!("limitation '{limitation}'")
        },
    });
    total_score += limitation_score;

    let age_band = answers.get(ids::AGE_BAND).unwrap_or_default();
    let age_score = age_band_points(age_band);
    components.push(ScoreComponent {
        factor: EligibilityFactor::AgeBand,
        score: age_score,
        notes: if age_band.is_empty() {
            "age band not answered".to_string()
        } else {
            format!("age band {age_band}")
        },
    });
    total_score += age_score;

    let credit_score = if has_credits { 2 } else { 0 };
    components.push(ScoreComponent {
        factor: EligibilityFactor::WorkCredits,
        score: credit_score,
        notes: if has_credits {
            "paid Social Security taxes ~5 of last 10 years".to_string()
        } else {
            "work credits not confirmed".to_string()
        },
    });
    total_score += credit_score;

    ScoreTrail {
        components,
        total_score,
        signals: ScoreSignals {
            stopped_working,
            duration_met,
            has_credits,
            prior_application,
        },
    }
}
