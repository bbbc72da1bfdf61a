use clap::Parser;
use stonks_poller::cli::{Cli, Commands};
use stonks_poller::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using bundled example configuration");
            let mut config: Config = toml::from_str(include_str!("../config.toml.example"))?;
            config.apply_env_overrides();
            config
        }
    };
    config.validate()?;

    // Initialize telemetry
    stonks_poller::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!(symbol = %config.quote.symbol, "Starting quote poller");
            args.execute(&config).await?;
        }
        Commands::Fetch(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Provider: {}", config.quote.base_url);
            println!(
                "  Quote: {} {} ({})",
                config.quote.symbol,
                config.quote.interval,
                config.quote.output_size.as_str()
            );
            println!("  API key: {}", config.quote.masked_api_key());
            println!("  Poll interval: {}s", config.quote.poll_interval_secs);
            match config.quote.timeout_secs {
                Some(secs) => println!("  HTTP timeout: {}s", secs),
                None => println!("  HTTP timeout: transport default"),
            }
            println!(
                "  Logging: {} ({:?})",
                config.telemetry.log_level, config.telemetry.log_format
            );
            if let Some(port) = config.telemetry.metrics_port {
                println!("  Metrics: 0.0.0.0:{}", port);
            }
        }
    }

    Ok(())
}
