use anyhow::Result;
use clap::Parser;
use macvendor_gen::{config::GeneratorConfig, generate};
use tracing::info;

/// macvendor-gen — build the compressed vendor registry artifact.
#[derive(Parser, Debug)]
#[command(name = "macvendor-gen", version, about)]
struct Cli {
    /// Path to a TOML configuration file (optional).
    #[arg(short, long)]
    config: Option<String>,

    /// Source registry JSON (file or URL). Overrides the config file.
    #[arg(short, long)]
    input: Option<String>,

    /// Destination artifact. Overrides the config file.
    #[arg(short, long)]
    output: Option<String>,

    /// zstd compression level. Overrides the config file.
    #[arg(short, long)]
    level: Option<i32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "macvendor_gen=info,macvendor_core=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = if let Some(ref path) = cli.config {
        GeneratorConfig::from_file(path)?
    } else {
        GeneratorConfig::default()
    };
    if let Some(input) = cli.input {
        config.source = input;
    }
    if let Some(output) = cli.output {
        config.output = output.into();
    }
    if let Some(level) = cli.level {
        config.compression_level = level;
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        source = %config.source,
        "Generating vendor registry"
    );

    generate(&config).await?;
    Ok(())
}
