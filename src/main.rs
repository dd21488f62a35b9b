use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vista_gateway::Config;
use vista_gateway::api::{ApiServer, ApiState};

/// Vista - scene narration gateway for images
#[derive(Parser)]
#[command(name = "vista", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "VISTA_PORT")]
    port: Option<u16>,

    /// Analyzer strategy: aspect-ratio, pixel-sampling, or cloud-vision
    #[arg(long, env = "VISTA_ANALYZER")]
    analyzer: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a local image file and print the description
    Analyze {
        /// Path to the image
        image: PathBuf,
    },
    /// Synthesize text to a local MP3 file
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the scene narration voice.")]
        text: String,

        /// Output path
        #[arg(short, long, default_value = "tts-test.mp3")]
        output: PathBuf,
    },
}

const DEFAULT_PORT: u16 = 5000;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,vista_gateway=info",
        1 => "info,vista_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(analyzer) = &cli.analyzer {
        config.analyzer = analyzer.parse()?;
    }

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Analyze { image } => analyze_file(&config, &image).await,
            Command::TestTts { text, output } => test_tts(&config, &text, &output).await,
        };
    }

    let port = cli.port.or(config.port).unwrap_or(DEFAULT_PORT);

    tracing::info!(
        analyzer = ?config.analyzer,
        speech = ?config.speech.provider,
        delivery = config.delivery.as_str(),
        port,
        "starting vista gateway"
    );

    let state = ApiState::from_config(&config)?;
    ApiServer::new(state, port).run().await?;

    Ok(())
}

/// Run the configured analyzer against a local file
async fn analyze_file(config: &Config, image: &Path) -> anyhow::Result<()> {
    let state = ApiState::from_config(config)?;
    let data = tokio::fs::read(image).await?;

    let analysis = state.analyzer.analyze(&data, mime_from_path(image)).await;

    if let Some(scene_type) = &analysis.scene_type {
        println!("scene type: {scene_type}");
    }
    println!("{}", analysis.description);

    Ok(())
}

/// Synthesize text and write the MP3 to disk
async fn test_tts(config: &Config, text: &str, output: &Path) -> anyhow::Result<()> {
    let state = ApiState::from_config(config)?;

    println!("Synthesizing with {}...", state.speech.name());
    let audio = state.speech.synthesize(text).await?;
    tokio::fs::write(output, &audio).await?;
    println!("Wrote {} bytes to {}", audio.len(), output.display());

    Ok(())
}

/// Guess a MIME type from the file extension
fn mime_from_path(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}
