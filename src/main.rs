use anyhow::Result;
use clap::Parser;
use lifecycle::{
    forward_interrupts, BoxError, Context, HeartbeatService, HostConfig, LogFormat, Orchestrator,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "lifecycle-host")]
#[command(about = "Run a heartbeat service under the lifecycle orchestrator")]
#[command(version)]
#[command(long_about = "Runs a demo heartbeat service until it is interrupted or asks to stop. \
The first Ctrl+C / SIGTERM starts a graceful shutdown; a second one forces it.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "lifecycle.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without starting the service")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        println!("# lifecycle-host configuration (defaults)");
        print!("{}", HostConfig::default().to_toml()?);
        return Ok(());
    }

    let config = HostConfig::load_from_file(&args.config)?;
    init_logging(&args, &config)?;

    info!("Starting lifecycle-host v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    if args.validate_config {
        match config.validate() {
            Ok(()) => {
                info!("Configuration validation successful");
                println!("✓ Configuration is valid");
                return Ok(());
            }
            Err(e) => {
                error!("Configuration validation failed: {}", e);
                eprintln!("✗ Configuration validation failed: {}", e);
                std::process::exit(1);
            }
        }
    }
    config.validate()?;

    let host = Context::new();
    let heartbeat = config.heartbeat.clone();
    let orchestrator = Orchestrator::new(host.clone()).with_name("heartbeat");

    let result = orchestrator
        .run(|run_ctx| async move {
            forward_interrupts(run_ctx, host);
            Ok::<_, BoxError>(HeartbeatService::new(heartbeat))
        })
        .await;

    match result {
        Ok(()) => {
            info!("lifecycle-host exited cleanly");
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(args: &Args, config: &HostConfig) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    // Command line flags take precedence over the configured level
    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        config.log.level.as_str()
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("lifecycle={0},lifecycle_host={0}", log_level))
    });

    let format = match args.log_format.as_deref() {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some("pretty") => LogFormat::Pretty,
        Some(other) => {
            eprintln!("Warning: Unknown log format '{}', using configured format", other);
            config.log.format
        }
        None => config.log.format,
    };

    let fmt_layer = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    Ok(())
}
