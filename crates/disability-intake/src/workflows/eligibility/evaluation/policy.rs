use super::super::domain::{ClassificationResult, ClassificationTag};
use super::super::questionnaire::NO;
use super::rules::ScoreSignals;

const LIKELY_SSDI_THRESHOLD: i16 = 6;

const DURATION_GATE_SUMMARY: [&str; 1] =
    ["El SSA requiere que la condición dure al menos 12 meses."];

const LIKELY_SSDI_SUMMARY: [&str; 3] = [
    "Tu duración médica cumple con las guías del SSA.",
    "Tus limitaciones laborales apoyan incapacidad.",
    "No estás trabajando actualmente o no superas el límite de ingresos.",
];

const POSSIBLE_SSI_SUMMARY: [&str; 2] = [
    "Podrías calificar para SSI por necesidad económica y limitaciones médicas.",
    "Se requiere revisar ingresos y activos.",
];

const APPEALS_SUMMARY: [&str; 2] = [
    "Podrías tener opciones de apelación según tu etapa previa.",
    "Los términos son estrictos; actuar pronto ayuda.",
];

const NOT_LIKELY_SUMMARY: [&str; 1] =
    ["Según tus respuestas puede que no cumplas con las guías del SSA."];

/// First matching rule wins.
pub(crate) fn decide_outcome(signals: &ScoreSignals, total_score: i16) -> ClassificationResult {
    if !signals.duration_met {
        return ClassificationResult::new(ClassificationTag::NotLikely, &DURATION_GATE_SUMMARY);
    }

    if total_score >= LIKELY_SSDI_THRESHOLD && signals.stopped_working {
        return ClassificationResult::new(ClassificationTag::LikelySsdi, &LIKELY_SSDI_SUMMARY);
    }

    if !signals.has_credits {
        return ClassificationResult::new(ClassificationTag::PossibleSsi, &POSSIBLE_SSI_SUMMARY);
    }

    if signals
        .prior_application
        .as_deref()
        .map(|stage| stage != NO)
        .unwrap_or(false)
    {
        return ClassificationResult::new(ClassificationTag::Appeals, &APPEALS_SUMMARY);
    }

    ClassificationResult::new(ClassificationTag::NotLikely, &NOT_LIKELY_SUMMARY)
}
