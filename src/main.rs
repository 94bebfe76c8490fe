use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use classroom_feedback::{
    create_router, AppState, AudioFile, Config, HttpAnalysisClient, Phase, SeekOutcome,
    UploadSession,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "classroom-feedback", about = "Review classroom recordings by key moment")]
struct Cli {
    /// Config file (extension optional)
    #[arg(long, default_value = "config/classroom-feedback")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one recording and print its key moments
    Analyze {
        /// Audio file to submit
        file: PathBuf,

        /// Seek to this key moment (0-based) once the analysis is ready
        #[arg(long)]
        jump: Option<usize>,
    },
    /// Run the review API for a browser front-end
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("Loaded config: {}", cfg.service.name);

    let client = HttpAnalysisClient::new(&cfg.analysis.url, cfg.analysis.timeout())
        .context("Failed to build analysis client")?;
    let session = UploadSession::new(Arc::new(client));

    match cli.command {
        Command::Analyze { file, jump } => analyze(session, file, jump).await,
        Command::Serve => serve(session, &cfg).await,
    }
}

async fn analyze(mut session: UploadSession, path: PathBuf, jump: Option<usize>) -> Result<()> {
    let file = AudioFile::open(&path)?;
    session.select_file(file);
    session.analyze().await;

    let snapshot = session.snapshot();
    if snapshot.phase != Phase::Ready {
        let notice = snapshot.notice.unwrap_or_default();
        let detail = snapshot.detail.unwrap_or_default();
        anyhow::bail!("{} ({})", notice, detail);
    }

    println!("Key Insights: {} moments", snapshot.moments);
    for (index, item) in snapshot.feedback.iter().enumerate() {
        println!("\n[{}] {}  {}", index, item.timestamp, item.principle);
        println!("    {}", item.description);
    }

    if let Some(index) = jump {
        match session.seek_to_moment(index) {
            Some(SeekOutcome::Playing { offset_secs }) => {
                println!("\nPlayback positioned at {}s", offset_secs)
            }
            Some(outcome) => warn!("Could not jump to moment {}: {:?}", index, outcome),
            None => warn!("No key moment {}", index),
        }
    }

    session.close();
    Ok(())
}

async fn serve(session: UploadSession, cfg: &Config) -> Result<()> {
    let http = &cfg.service.http;
    let state = AppState::new(session, http.max_upload_bytes());
    let app = create_router(state.clone());

    let addr = format!("{}:{}", http.bind, http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Review API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await
        .context("HTTP server failed")?;

    state.session.lock().await.close();
    info!("Review API stopped");

    Ok(())
}
