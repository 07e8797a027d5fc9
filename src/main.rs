use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use speechpad::{
    CloudSpeechGateway, Config, MicrophoneDevice, Session, StopOutcome, TranscribeOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser)]
#[command(name = "speechpad", about = "Speech-to-text from a file or the microphone")]
struct Cli {
    /// Config file name (optional; built-in defaults apply without it)
    #[arg(long, default_value = "config/speechpad")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe a pre-recorded WAV file
    File { path: String },
    /// Record from the microphone, then transcribe the take
    Live,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("speechpad v0.1.0");

    let backend = Arc::new(CloudSpeechGateway::new(cfg.backend.clone())?);
    let device = Arc::new(MicrophoneDevice::new());
    let session = Arc::new(Session::new(device, backend, cfg.capture_config()));

    match cli.command {
        Command::File { path } => {
            let text = session.transcribe_file(&path).await?;
            println!("{}", text);
        }
        Command::Live => {
            // Mirror the session's status messages to the terminal, the way a
            // GUI would redraw its output panel.
            let mut status_rx = session.subscribe();
            tokio::spawn(async move {
                while status_rx.changed().await.is_ok() {
                    let event = status_rx.borrow_and_update().clone();
                    eprintln!("[{}] {}", event.status.label(), event.message);
                }
            });

            session.start_recording().await;

            eprintln!("Press Enter to stop recording.");
            let mut line = String::new();
            BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;

            match session.stop_recording().await {
                StopOutcome::Captured => match session.transcribe_captured().await {
                    TranscribeOutcome::Text(text) => println!("{}", text),
                    TranscribeOutcome::Failed(err) => anyhow::bail!("{}", err),
                    TranscribeOutcome::NothingCaptured => {
                        anyhow::bail!("no audio captured")
                    }
                },
                StopOutcome::CaptureFailed(err) => anyhow::bail!("{}", err),
                StopOutcome::NotRecording => anyhow::bail!("recording never started"),
            }
        }
    }

    Ok(())
}
