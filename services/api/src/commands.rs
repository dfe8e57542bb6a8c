use crate::infra::parse_answer_pair;
use clap::Args;
use disability_intake::error::AppError;
use disability_intake::workflows::eligibility::{
    find_question, questions, AnswerSet, ClassificationResult, EligibilityAssessment,
    EligibilityScorer, QuestionKind,
};
use std::io::Write;

#[derive(Args, Debug, Default)]
pub(crate) struct ClassifyArgs {
    /// Answer set as a JSON object keyed by question id
    #[arg(long, conflicts_with = "answer")]
    pub(crate) answers: Option<String>,
    /// Single answer as ID=VALUE; repeat for each question
    #[arg(long, value_parser = parse_answer_pair)]
    pub(crate) answer: Vec<(String, String)>,
}

pub(crate) fn run_questions() -> Result<(), AppError> {
    let stdout = std::io::stdout();
    render_questions(&mut stdout.lock())
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let answers = collect_answers(args)?;
    let assessment = EligibilityScorer::new().assess(&answers);

    let stdout = std::io::stdout();
    render_assessment(&mut stdout.lock(), &assessment)
}

fn collect_answers(args: ClassifyArgs) -> Result<AnswerSet, AppError> {
    let answers = match args.answers {
        Some(raw) => serde_json::from_str::<AnswerSet>(&raw)
            .map_err(|err| AppError::Input(format!("--answers is not a JSON object: {err}")))?,
        None => args.answer.into_iter().collect(),
    };

    if let Some((id, _)) = answers.iter().find(|(id, _)| find_question(id).is_none()) {
        return Err(AppError::Input(format!("unknown question id '{id}'")));
    }

    Ok(answers)
}

pub(crate) fn render_questions<W: Write>(out: &mut W) -> Result<(), AppError> {
    for (index, question) in questions().iter().enumerate() {
        writeln!(out, "{}. [{}] {}", index + 1, question.id, question.label)?;
        match question.kind {
            QuestionKind::Choice(options) => {
                for option in options {
                    writeln!(out, "     - {option}")?;
                }
            }
            QuestionKind::FreeText => writeln!(out, "     (texto libre)")?,
        }
    }
    Ok(())
}

pub(crate) fn render_result<W: Write>(
    out: &mut W,
    result: &ClassificationResult,
) -> Result<(), AppError> {
    writeln!(out, "{}", result.title())?;
    writeln!(out, "Resultado: {}", result.path.as_str())?;
    for line in &result.summary {
        writeln!(out, "  • {line}")?;
    }
    Ok(())
}

fn render_assessment<W: Write>(
    out: &mut W,
    assessment: &EligibilityAssessment,
) -> Result<(), AppError> {
    render_result(out, &assessment.result)?;
    writeln!(out, "\nPuntaje total: {}", assessment.total_score)?;
    for component in &assessment.components {
        writeln!(
            out,
            "  {:>+3}  {:?}: {}",
            component.score, component.factor, component.notes
        )?;
    }
    Ok(())
}
