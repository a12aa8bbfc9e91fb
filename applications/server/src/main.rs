/// Vox Server - noise reduction, loudness normalization and stem separation
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vox_audio::WavSampleFormat;
use vox_core::{ProcessingResult, TracingObserver};
use vox_server::{
    config::{validate_target_lufs, ServerConfig},
    router,
    services::SeparationOptions,
    state::AppState,
    upload,
};

#[derive(Parser)]
#[command(name = "vox-server")]
#[command(about = "Vox audio cleanup server and command-line tools", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./vox.toml when present)
    #[arg(short, long, global = true, env = "VOX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Reduce background noise in an audio file
    Denoise {
        /// Input audio file
        input: PathBuf,
        /// Output WAV path
        output: PathBuf,
        /// Output sample format (float32 or pcm16)
        #[arg(long, value_parser = parse_format)]
        format: Option<WavSampleFormat>,
    },
    /// Normalize the loudness of an audio file
    Normalize {
        /// Input audio file
        input: PathBuf,
        /// Output WAV path
        output: PathBuf,
        /// Target integrated loudness in LUFS
        #[arg(long, allow_hyphen_values = true)]
        target_lufs: Option<f64>,
        /// Output sample format (float32 or pcm16)
        #[arg(long, value_parser = parse_format)]
        format: Option<WavSampleFormat>,
    },
    /// Separate vocals from accompaniment with Demucs
    Separate {
        /// Input audio file
        input: PathBuf,
        /// Demucs model name
        #[arg(long)]
        model: Option<String>,
        /// Stem selector
        #[arg(long)]
        stems: Option<String>,
    },
    /// Download the audio track of a video as WAV
    Download {
        /// Video URL
        url: String,
    },
}

fn parse_format(s: &str) -> Result<WavSampleFormat, String> {
    WavSampleFormat::parse(s).ok_or_else(|| format!("unknown sample format: {}", s))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vox_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = ServerConfig::load_from(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::Denoise {
            input,
            output,
            format,
        } => {
            if let Some(format) = format {
                config.processing.output_format = format;
            }
            let engine_config = config.noise_reduction();
            let result = tokio::task::spawn_blocking(move || {
                vox_denoise::reduce_noise(&input, &engine_config, &TracingObserver)
            })
            .await?;
            write_payload(result, &output)?;
        }
        Commands::Normalize {
            input,
            output,
            target_lufs,
            format,
        } => {
            if let Some(target) = target_lufs {
                validate_target_lufs(target).map_err(anyhow::Error::msg)?;
            }
            if let Some(format) = format {
                config.processing.output_format = format;
            }
            let engine_config = config.normalization(target_lufs);
            let result = tokio::task::spawn_blocking(move || {
                vox_loudness::normalize_loudness(&input, &engine_config, &TracingObserver)
            })
            .await?;
            write_payload(result, &output)?;
        }
        Commands::Separate {
            input,
            model,
            stems,
        } => {
            config.ensure_dirs()?;
            let state = AppState::new(config);
            let result = state
                .separation
                .separate(&input, &SeparationOptions { model, stems })
                .await;
            print_paths(result)?;
        }
        Commands::Download { url } => {
            config.ensure_dirs()?;
            let state = AppState::new(config);
            let result = state.download.download(&url).await;
            print_paths(result)?;
        }
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Vox Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    config.ensure_dirs()?;
    let removed = upload::clean_temp_dir(&config.temp_dir())?;
    if removed > 0 {
        tracing::info!(
            "Removed {} stale upload(s) from {}",
            removed,
            config.temp_dir().display()
        );
    }

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    let app = router(AppState::new(config));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn write_payload(result: ProcessingResult, output: &std::path::Path) -> anyhow::Result<()> {
    if !result.success {
        anyhow::bail!(result.message);
    }

    let bytes = result
        .audio_bytes()
        .context("engine reported success without audio")?;
    std::fs::write(output, bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("{} -> {}", result.message, output.display());
    Ok(())
}

fn print_paths(result: ProcessingResult) -> anyhow::Result<()> {
    if !result.success {
        anyhow::bail!(result.message);
    }

    println!("{}", result.message);
    for (name, path) in result.output_paths().into_iter().flatten() {
        println!("  {}: {}", name, path.display());
    }
    Ok(())
}
