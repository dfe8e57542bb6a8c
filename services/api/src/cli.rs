use crate::commands::{run_classify, run_questions, ClassifyArgs};
use crate::quiz::{run_quiz, QuizArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use disability_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Disability Intake",
    about = "Serve and exercise the disability eligibility quiz from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the questionnaire in the order it is asked
    Questions,
    /// Score an answer set and print the classification with its score trail
    Classify(ClassifyArgs),
    /// Take the quiz interactively in the terminal
    Quiz(QuizArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Questions => run_questions(),
        Command::Classify(args) => run_classify(args),
        Command::Quiz(args) => run_quiz(args).await,
    }
}
