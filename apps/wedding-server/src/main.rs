use anyhow::{Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use axum::Router;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use rsvp::{RsvpConfig, RsvpModule};
use runtime::{AppConfig, CliArgs};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

mod db;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Wedding RSVP server - guest intake and organizer reports
#[derive(Parser)]
#[command(name = "wedding-server")]
#[command(about = "Wedding RSVP server - guest intake and organizer reports")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
    /// Write the participants report PDF and exit
    ExportReport {
        /// Output file
        #[arg(short, long, default_value = "report_matrimonio.pdf")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!(
        home_dir = %config.server.home_dir,
        logging = ?runtime::logging::describe(&logging_config),
        "Wedding RSVP server starting"
    );

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args),
        Commands::ExportReport { out } => export_report(config, args, &out).await,
    }
}

/// Connect, migrate and build the rsvp module from configuration.
async fn init_rsvp(config: &AppConfig, args: &CliArgs) -> Result<RsvpModule> {
    let db_config = config
        .database
        .clone()
        .context("Database configuration is required")?;
    let dsn = db::resolve_dsn(&db_config, Path::new(&config.server.home_dir), args.mock)?;
    let conn = db::connect(&db_config, &dsn).await?;
    RsvpModule::migrate(&conn).await?;

    let rsvp_cfg: RsvpConfig = config.module_config(RsvpModule::NAME)?;
    RsvpModule::new(conn, &rsvp_cfg)
}

fn ingress_config(config: &AppConfig) -> Result<ApiIngressConfig> {
    let mut cfg: ApiIngressConfig = config.module_config(ApiIngress::NAME)?;
    if config.server.timeout_sec > 0 {
        cfg.request_timeout_sec = config.server.timeout_sec;
    }
    Ok(cfg)
}

fn listen_addr(config: &AppConfig) -> Result<SocketAddr> {
    let raw = format!("{}:{}", config.server.host, config.server.port);
    raw.parse()
        .with_context(|| format!("invalid listen address '{raw}'"))
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");
    let addr = listen_addr(&config)?;
    let rsvp = init_rsvp(&config, &args).await?;

    let ingress = ApiIngress::new(ingress_config(&config)?);
    ingress.set_openapi(RsvpModule::openapi());
    let router = ingress.build_router(rsvp.router(Router::new()));

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = runtime::shutdown::wait_for_shutdown().await {
            tracing::warn!(error = %e, "signal handler failed; shutting down");
        }
        on_signal.cancel();
    });

    ingress.serve(router, addr, cancel).await
}

fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    listen_addr(&config)?;
    ingress_config(&config)?;
    let rsvp_cfg: RsvpConfig = config.module_config(RsvpModule::NAME)?;
    rsvp_cfg.service_config()?;
    if !args.mock {
        if let Some(db_config) = &config.database {
            db::detect_backend(&db_config.url)?;
        }
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn export_report(config: AppConfig, args: CliArgs, out: &Path) -> Result<()> {
    let rsvp = init_rsvp(&config, &args).await?;
    let bytes = rsvp.service().export_report(chrono::Utc::now()).await?;

    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    tokio::fs::write(out, &bytes)
        .await
        .with_context(|| format!("failed to write {}", out.display()))?;

    tracing::info!(path = %out.display(), bytes = bytes.len(), "Report exported");
    println!("Report written to {}", out.display());
    Ok(())
}
