use std::fmt;
use std::sync::Arc;

use practice_core::catalog::PhraseCatalog;
use practice_core::model::LearnerId;
use practice_core::settings::{PracticeSettings, PracticeSettingsDraft};
use services::{
    AttemptReport, CatalogPhraseProvider, Clock, InMemoryProgressRecorder, LearnerContext,
    LessonRef, PracticeLoopService, PracticeSessionController, SessionError, Transition,
};
use speech::{SpeechCaptureAdapter, SpeechPlaybackAdapter};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidLanguage { raw: String },
    InvalidLearner { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidLanguage { raw } => write!(f, "invalid --lang value: {raw:?}"),
            ArgsError::InvalidLearner { raw } => write!(f, "invalid --learner value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number(value: String, flag: &'static str) -> Result<u32, ArgsError> {
    value
        .trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw: value })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- practice  [--lang <code>] [--unit <n>] [--lesson <n>]");
    eprintln!("                                [--learner <id>] [--name <name>] [--shuffle]");
    eprintln!("  cargo run -p app -- languages");
    eprintln!();
    eprintln!("During practice, type what you would say. Commands:");
    eprintln!("  :play  :next  :prev  :reset  :quit");
    eprintln!();
    eprintln!("Defaults for practice:");
    eprintln!("  --lang en --unit 1 --lesson 1 --learner 1 --name learner");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PRACTICE_LANG, PRACTICE_SHUFFLE, PRACTICE_LEARNER, PRACTICE_NAME, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Practice,
    Languages,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "practice" => Some(Self::Practice),
            "languages" => Some(Self::Languages),
            _ => None,
        }
    }
}

struct Args {
    lesson: LessonRef,
    learner: LearnerContext,
    shuffle: Option<bool>,
}

impl Args {
    fn parse_practice(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut language = std::env::var("PRACTICE_LANG").unwrap_or_else(|_| "en".into());
        let mut shuffle = std::env::var("PRACTICE_SHUFFLE").ok().map(|value| env_flag(&value));
        let mut learner = match std::env::var("PRACTICE_LEARNER") {
            Ok(raw) => raw
                .parse::<LearnerId>()
                .map_err(|_| ArgsError::InvalidLearner { raw })?,
            Err(_) => LearnerId::new(1),
        };
        let mut name = std::env::var("PRACTICE_NAME").unwrap_or_else(|_| "learner".into());
        let mut unit = 1;
        let mut lesson = 1;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--lang" => language = require_value(args, "--lang")?,
                "--unit" => unit = parse_number(require_value(args, "--unit")?, "--unit")?,
                "--lesson" => lesson = parse_number(require_value(args, "--lesson")?, "--lesson")?,
                "--learner" => {
                    let raw = require_value(args, "--learner")?;
                    learner = raw
                        .parse()
                        .map_err(|_| ArgsError::InvalidLearner { raw: raw.clone() })?;
                }
                "--name" => name = require_value(args, "--name")?,
                "--shuffle" => shuffle = Some(true),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if language.trim().is_empty() {
            return Err(ArgsError::InvalidLanguage { raw: language });
        }

        Ok(Self {
            lesson: LessonRef::new(language, unit, lesson),
            learner: LearnerContext::new(learner, name.trim()),
            shuffle,
        })
    }
}

fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn load_settings(args: &Args) -> Result<PracticeSettings, practice_core::error::Error> {
    let draft = PracticeSettingsDraft {
        shuffle_phrases: args.shuffle,
        ..PracticeSettingsDraft::new()
    };
    Ok(draft.validate()?)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_prompt(controller: &PracticeSessionController) {
    let progress = controller.progress();
    if let Some(phrase) = controller.current_phrase() {
        let translation = phrase
            .translation()
            .map(|t| format!(" ({t})"))
            .unwrap_or_default();
        println!(
            "[{}/{}] {} {}{translation}",
            progress.current_index + 1,
            progress.total,
            phrase.difficulty(),
            phrase.text(),
        );
    }
}

fn print_report(controller: &PracticeSessionController, report: &AttemptReport) {
    println!(
        "  {} (similarity {}%, needed {:.0}%)",
        report.feedback.message,
        report.record.score(),
        report.feedback.threshold * 100.0,
    );
    if matches!(report.transition, Transition::Retry) {
        println!("  attempt {} on this phrase", report.record.attempt_number());
    }
    let progress = controller.progress();
    println!(
        "  progress {}% | score {} | streak {}",
        progress.progress_percent, progress.total_score, progress.current_streak
    );
}

/// Returns `false` once the learner asks to stop.
fn handle_line(controller: &mut PracticeSessionController, line: &str) -> bool {
    let outcome = match line {
        ":quit" | ":q" => return false,
        ":next" => controller.next_phrase(),
        ":prev" => controller.previous_phrase(),
        ":reset" => {
            controller.reset();
            Ok(())
        }
        ":play" => controller.play_current().map(|_| ()),
        transcript => match controller.submit_transcript(transcript) {
            Ok(report) => {
                print_report(controller, &report);
                Ok(())
            }
            Err(err) => Err(err),
        },
    };
    if let Err(err) = outcome {
        println!("  {err}");
    }
    true
}

async fn practice(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings(&args)?;
    tracing::debug!(lesson = ?args.lesson, learner = ?args.learner, ?settings, "starting practice");
    let recorder = InMemoryProgressRecorder::new();
    let loop_svc = PracticeLoopService::new(
        Clock::default_clock(),
        settings,
        Arc::new(CatalogPhraseProvider::new(PhraseCatalog::builtin())),
        Arc::new(recorder.clone()),
    );

    // No platform speech services in a terminal; transcripts are typed.
    let mut controller = loop_svc
        .start_session(
            &args.lesson,
            SpeechCaptureAdapter::unavailable(),
            SpeechPlaybackAdapter::unavailable(),
        )
        .await?;

    println!("Practicing as {}", args.learner.display_name());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_prompt(&controller);
    while !controller.session().is_complete() {
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !handle_line(&mut controller, line) {
            break;
        }
        print_prompt(&controller);
    }

    let summary = controller.summary()?;
    println!();
    println!(
        "Completed {}/{} phrases in {} attempts ({} success, {} warning, {} fail)",
        summary.phrases_completed(),
        summary.phrase_count(),
        summary.total_attempts(),
        summary.successes(),
        summary.warnings(),
        summary.fails(),
    );
    println!(
        "Total score {} | average {} | best streak {}",
        summary.total_score(),
        summary.average_score(),
        summary.best_streak()
    );

    match loop_svc.finish(&args.learner, &args.lesson, &controller).await {
        Ok(outcome) => println!("{}", serde_json::to_string_pretty(&outcome.report)?),
        Err(SessionError::NotFinished) => println!("Session not finished; progress not recorded."),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn languages() {
    let catalog = PhraseCatalog::builtin();
    for code in catalog.languages() {
        println!("{code}");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Practice is the default when no subcommand is given.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Practice,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Practice,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            ArgsError::UnknownArg(first.to_string())
        })?,
    };
    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    match cmd {
        Command::Languages => {
            languages();
            Ok(())
        }
        Command::Practice => {
            let args = Args::parse_practice(&mut argv.into_iter()).map_err(|e| {
                eprintln!("{e}");
                print_usage();
                e
            })?;
            practice(args).await
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
