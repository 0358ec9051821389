mod config;
mod credentials;
mod menu;
mod report;
mod terminal;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::format::rule;
use services::stats;
use services::{
    Clock, EmailResponse, Exercise, IncompleteSentences, ModelConfig, OpenAiClient, OpinionEssay,
    PictureSentence, PracticeContext, ReadingComprehension, SessionRunner, TextCompletion,
};
use storage::{HistoryStore, JsonFileStore};
use toeic_core::model::ExerciseKind;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::menu::KindAction;
use crate::terminal::StdConsole;

/// Practice TOEIC reading and writing with generated exercises.
#[derive(Debug, Parser)]
#[command(name = "toeic-practice", version, about)]
struct Args {
    /// Exercise kind: part5, part6, part7, writing1-5, writing6-7 or writing8.
    /// Without it a menu asks.
    kind: Option<ExerciseKind>,

    /// Directory holding the per-kind history files [env: TOEIC_HISTORY_DIR]
    #[arg(long)]
    history_dir: Option<PathBuf>,

    /// Directory for generated scene images [env: TOEIC_IMAGES_DIR]
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Chat model name [env: OPENAI_MODEL]
    #[arg(long)]
    model: Option<String>,
}

fn init_tracing() {
    // Logs go to stderr and stay quiet by default so they do not interleave
    // with the interactive prompts.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Menu loop for one exercise kind: start sessions or show statistics.
async fn practice_loop<E: Exercise>(ctx: &mut PracticeContext, config: &AppConfig, exercise: E) {
    let kind = exercise.kind();
    let store = JsonFileStore::<E::Record>::new(config.history_path(kind));
    let runner = SessionRunner::new(exercise);
    info!(kind = %kind, path = %store.path().display(), "practice menu opened");

    loop {
        match menu::kind_action(ctx.console(), kind).await {
            KindAction::Start => {
                let Some(plan) = menu::plan_session(ctx.console(), kind).await else {
                    break;
                };
                let mut history = store.load().await;
                runner.run(ctx, &mut history, &store, &plan).await;
            }
            KindAction::Stats => {
                let history = store.load().await;
                for line in report::render(&stats::compute(kind, &history)) {
                    ctx.say(&line);
                }
            }
            KindAction::Back => break,
        }
    }
}

async fn practice(ctx: &mut PracticeContext, config: &AppConfig, kind: ExerciseKind) {
    match kind {
        ExerciseKind::IncompleteSentences => practice_loop(ctx, config, IncompleteSentences).await,
        ExerciseKind::TextCompletion => practice_loop(ctx, config, TextCompletion).await,
        ExerciseKind::ReadingComprehension => {
            practice_loop(ctx, config, ReadingComprehension).await;
        }
        ExerciseKind::PictureSentence => practice_loop(ctx, config, PictureSentence).await,
        ExerciseKind::EmailResponse => {
            practice_loop(ctx, config, EmailResponse::default()).await;
        }
        ExerciseKind::OpinionEssay => practice_loop(ctx, config, OpinionEssay::default()).await,
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = AppConfig::from_env().with_overrides(args.history_dir, args.images_dir);
    let mut model_config = ModelConfig::from_env().context("invalid model configuration")?;
    if let Some(model) = args.model {
        model_config.model = model;
    }

    let mut console = StdConsole::new();
    let model_config = credentials::ensure_api_key(&mut console, model_config).await?;
    let client = OpenAiClient::new(model_config).context("could not build the HTTP client")?;

    let mut ctx = PracticeContext::new(
        Arc::new(client),
        Box::new(console),
        Clock::system(),
        StdRng::from_os_rng(),
    )
    .with_images_dir(config.images_dir.clone());
    info!(history_dir = %config.history_dir.display(), "starting");

    match args.kind {
        Some(kind) => practice(&mut ctx, &config, kind).await,
        None => {
            while let Some(kind) = menu::choose_kind(ctx.console()).await {
                practice(&mut ctx, &config, kind).await;
            }
        }
    }
    ctx.say(&format!("\n{}", rule()));
    ctx.say("Thank you for practicing. Good luck on the TOEIC!");
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();
    let args = Args::parse();
    if let Err(err) = run(args).await {
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}
