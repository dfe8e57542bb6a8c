//! Terminal front end for the eligibility quiz.

use crate::commands::render_result;
use crate::infra::build_intake_service;
use clap::Args;
use disability_intake::config::AppConfig;
use disability_intake::error::AppError;
use disability_intake::workflows::eligibility::{
    FlowStep, HttpQuizBackend, InProcessBackend, LeadId, LeadOutcome, LeadSubmitBlocked,
    Question, QuestionKind, QuizBackend, QuizFlow, QuizSession, BEST_TIME_OPTIONS,
    DEFAULT_BEST_TIME,
};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const BACK_COMMANDS: [&str; 3] = ["atrás", "atras", "back"];

#[derive(Args, Debug)]
pub(crate) struct QuizArgs {
    /// Base URL of a running intake API; scores in-process when omitted
    #[arg(long)]
    pub(crate) api_url: Option<String>,
    /// Request timeout in seconds for the remote API
    #[arg(long, default_value_t = 10)]
    pub(crate) timeout_secs: u64,
}

/// How an interactive run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum QuizExit {
    Abandoned,
    Declined,
    Captured(LeadId),
}

pub(crate) async fn run_quiz(args: QuizArgs) -> Result<(), AppError> {
    let mut input = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();

    let exit = match args.api_url {
        Some(url) => {
            let backend = HttpQuizBackend::new(url, Duration::from_secs(args.timeout_secs))?;
            drive_quiz(&mut QuizFlow::new(backend), &mut input, &mut out).await?
        }
        None => {
            let config = AppConfig::load()?;
            let service = build_intake_service(&config.notifications, &config.intake)?;
            let session = QuizSession::with_guard(service.guard().clone());
            let mut flow = QuizFlow::with_session(session, InProcessBackend::new(service));
            drive_quiz(&mut flow, &mut input, &mut out).await?
        }
    };

    if exit == QuizExit::Abandoned {
        writeln!(out, "\nEvaluación interrumpida.")?;
    }
    Ok(())
}

/// Run the quiz to completion over the given input and output.
pub(crate) async fn drive_quiz<B, R, W>(
    flow: &mut QuizFlow<B>,
    input: &mut R,
    out: &mut W,
) -> Result<QuizExit, AppError>
where
    B: QuizBackend,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Evaluación de elegibilidad para beneficios por incapacidad")?;
    writeln!(
        out,
        "Escribe el número de la opción. \"atrás\" vuelve a la pregunta anterior."
    )?;

    if !answer_questions(flow, input, out).await? {
        return Ok(QuizExit::Abandoned);
    }

    capture_lead(flow, input, out).await
}

async fn answer_questions<B, R, W>(
    flow: &mut QuizFlow<B>,
    input: &mut R,
    out: &mut W,
) -> Result<bool, AppError>
where
    B: QuizBackend,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    while let Some(question) = flow.session().current_question() {
        let session = flow.session();
        writeln!(
            out,
            "\nPregunta {} de {} ({}%)",
            session.step() + 1,
            session.total_steps(),
            session.progress_pct()
        )?;
        writeln!(out, "{}", question.render(session.current_answer()))?;

        let Some(raw) = prompt(input, out, "> ").await? else {
            return Ok(false);
        };

        if BACK_COMMANDS.contains(&raw.to_lowercase().as_str()) {
            if !flow.retreat() {
                writeln!(out, "Ya estás en la primera pregunta.")?;
            }
            continue;
        }

        // Enter keeps the previous answer.
        if !raw.is_empty() {
            if let Err(err) = flow.session_mut().select(&resolve_choice(question, &raw)) {
                writeln!(out, "{err}")?;
                continue;
            }
        }

        match flow.advance().await {
            Ok(FlowStep::Blocked) => writeln!(out, "Elige una respuesta para continuar.")?,
            Ok(FlowStep::Moved { .. }) => {}
            Ok(FlowStep::Classified(result)) => {
                writeln!(out)?;
                render_result(out, &result)?;
            }
            Err(err) => writeln!(
                out,
                "No pudimos evaluar tus respuestas ({err}). Presiona Enter para intentar de nuevo."
            )?,
        }
    }

    Ok(true)
}

async fn capture_lead<B, R, W>(
    flow: &mut QuizFlow<B>,
    input: &mut R,
    out: &mut W,
) -> Result<QuizExit, AppError>
where
    B: QuizBackend,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        let wants_contact = prompt(
            input,
            out,
            "\n¿Quieres que un especialista te contacte? (s/n) ",
        )
        .await?;
        match wants_contact.as_deref().map(is_affirmative) {
            Some(true) => {}
            Some(false) => return Ok(QuizExit::Declined),
            None => return Ok(QuizExit::Abandoned),
        }

        let Some(lead) = flow.session_mut().lead_mut() else {
            return Ok(QuizExit::Declined);
        };
        let fields = [
            ("Nombre: ", &mut lead.first_name),
            ("Apellido: ", &mut lead.last_name),
            ("Correo electrónico: ", &mut lead.email),
            ("Teléfono: ", &mut lead.phone),
        ];
        for (label, field) in fields {
            match prompt(input, out, label).await? {
                Some(value) if !value.is_empty() => *field = value,
                Some(_) => {}
                None => return Ok(QuizExit::Abandoned),
            }
        }

        let options = BEST_TIME_OPTIONS
            .iter()
            .enumerate()
            .map(|(index, option)| format!("{}) {option}", index + 1))
            .collect::<Vec<_>>()
            .join("  ");
        let label = format!("Mejor horario para llamarte [{DEFAULT_BEST_TIME}] {options}: ");
        match prompt(input, out, &label).await? {
            Some(value) => lead.best_time = resolve_best_time(&value, &lead.best_time),
            None => return Ok(QuizExit::Abandoned),
        }

        match prompt(input, out, "¿Aceptas ser contactado/a? (s/n) ").await? {
            Some(value) => lead.consent = is_affirmative(&value),
            None => return Ok(QuizExit::Abandoned),
        }

        match flow.submit_lead().await {
            Ok(LeadOutcome::Captured(receipt)) => {
                writeln!(
                    out,
                    "\n¡Gracias! Un especialista te contactará pronto. Referencia: {}",
                    receipt.lead_id.0
                )?;
                return Ok(QuizExit::Captured(receipt.lead_id));
            }
            Ok(LeadOutcome::Blocked(LeadSubmitBlocked::Invalid(violation))) => {
                writeln!(out, "Revisa tus datos: {violation}")?;
            }
            Ok(LeadOutcome::Blocked(blocked)) => {
                writeln!(out, "{blocked}")?;
                return Ok(QuizExit::Declined);
            }
            Err(err) => {
                writeln!(out, "No pudimos enviar tus datos ({err}).")?;
            }
        }
    }
}

async fn prompt<R, W>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>, AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{label}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Map a 1-based option number to its label; anything else passes through.
fn resolve_choice(question: &Question, raw: &str) -> String {
    match question.kind {
        QuestionKind::Choice(options) => raw
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| options.get(index))
            .map(|option| option.to_string())
            .unwrap_or_else(|| raw.to_string()),
        QuestionKind::FreeText => raw.to_string(),
    }
}

fn resolve_best_time(raw: &str, current: &str) -> String {
    if raw.is_empty() {
        return current.to_string();
    }
    raw.parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1))
        .and_then(|index| BEST_TIME_OPTIONS.get(index))
        .map(|option| option.to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn is_affirmative(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    )
}
