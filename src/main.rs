//! HRV Dashboard CLI
//!
//! Heart rate and RMSSD charts annotated by experimental condition.

use clap::{Parser, Subcommand};
use hrv_dashboard::{
    config::Config,
    dashboard::{error_html, load_file, load_remote_blocking, Dashboard, DashboardError},
    fetch::BlockingDataClient,
    render::{static_page_name, SelectorTarget},
    subject::{all_subjects, subject_entries, SubjectId},
    VERSION,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hrv-dashboard")]
#[command(version = VERSION)]
#[command(about = "Heart rate variability dashboard", long_about = None)]
struct Cli {
    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the selectable subjects
    Subjects,

    /// Print the descriptive summary and condition segments of a subject
    Summary {
        /// Subject to show (e.g. "Subject 3" or 3)
        #[arg(long, short, default_value = "Subject 1")]
        subject: String,

        /// Read the recording from a local file instead of fetching it
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Render dashboard pages and charts to disk
    Render {
        /// Subject to render (e.g. "Subject 3" or 3)
        #[arg(long, short, default_value = "Subject 1")]
        subject: String,

        /// Render every subject
        #[arg(long, conflicts_with = "input")]
        all: bool,

        /// Read the recording from a local file instead of fetching it
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Output directory (defaults to the configured output path)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Serve the interactive dashboard over HTTP (requires server feature)
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Show configuration
    Config {
        /// Write the current configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config ({e}), using defaults");
            Config::default()
        }
    };

    match cli.command {
        Commands::Subjects => {
            cmd_subjects(&config);
        }
        Commands::Summary {
            subject,
            input,
            json,
        } => {
            cmd_summary(&config, &subject, input.as_deref(), json);
        }
        Commands::Render {
            subject,
            all,
            input,
            output,
        } => {
            cmd_render(&config, &subject, all, input.as_deref(), output);
        }
        Commands::Serve { port } => {
            cmd_serve(config, port);
        }
        Commands::Config { init } => {
            cmd_config(&config, init);
        }
    }
}

fn cmd_subjects(config: &Config) {
    for entry in subject_entries(&config.base_url, config.subject_count) {
        println!("{:<12} {}", entry.name, entry.url);
    }
}

fn cmd_summary(config: &Config, subject: &str, input: Option<&Path>, json: bool) {
    let subject = parse_subject_or_exit(config, subject);
    let dashboard = match build_dashboard(config, subject, input) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&dashboard) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!("{} ({})", subject.name(), dashboard.source);
    println!();
    println!("Data Summary");
    println!("============");
    print!("{}", dashboard.summary.to_table());
    println!();
    println!("Conditions");
    println!("==========");
    print!("{}", dashboard.segment_table());
}

fn cmd_render(
    config: &Config,
    subject: &str,
    all: bool,
    input: Option<&Path>,
    output: Option<PathBuf>,
) {
    let output_dir = output.unwrap_or_else(|| config.output_path.clone());
    if let Err(e) = std::fs::create_dir_all(&output_dir) {
        eprintln!("Error: Could not create {output_dir:?}: {e}");
        std::process::exit(1);
    }

    let subjects = if all {
        all_subjects(config.subject_count)
    } else {
        vec![parse_subject_or_exit(config, subject)]
    };

    let mut failures = 0;
    for subject in subjects {
        match build_dashboard(config, subject, input) {
            Ok(dashboard) => {
                if let Err(e) = write_dashboard(&output_dir, config, &dashboard) {
                    eprintln!("Error writing {}: {e}", subject.name());
                    failures += 1;
                    continue;
                }
                println!(
                    "{}: {} records, {} segments -> {:?}",
                    subject.name(),
                    dashboard.records,
                    dashboard.segments.len(),
                    output_dir.join(static_page_name(subject))
                );
            }
            Err(e) => {
                eprintln!("{}: {e}", subject.name());
                let page = error_html(
                    subject,
                    config.subject_count,
                    SelectorTarget::StaticFiles,
                    &e,
                );
                if let Err(e) = std::fs::write(output_dir.join(static_page_name(subject)), page) {
                    eprintln!("Error writing error page: {e}");
                }
                failures += 1;
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}

#[cfg(feature = "server")]
fn cmd_serve(config: Config, port: Option<u16>) {
    use hrv_dashboard::server::{run, ServerConfig};

    let port = port.unwrap_or(config.server_port);
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: Could not start runtime: {e}");
            std::process::exit(1);
        }
    };

    runtime.block_on(async move {
        let (addr, shutdown_tx) = match run(ServerConfig::new(port, config)).await {
            Ok(started) => started,
            Err(e) => {
                eprintln!("Error: Could not start server: {e}");
                std::process::exit(1);
            }
        };

        println!("HRV Dashboard v{VERSION}");
        println!("Serving on http://{addr}");
        println!("Press Ctrl+C to stop");

        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Error waiting for Ctrl+C: {e}");
        }
        let _ = shutdown_tx.send(());
        println!();
        println!("Stopped.");
    });
}

#[cfg(not(feature = "server"))]
fn cmd_serve(_config: Config, _port: Option<u16>) {
    eprintln!("Error: serve is unavailable (server feature not enabled at compile time)");
    std::process::exit(1);
}

fn cmd_config(config: &Config, init: bool) {
    if init {
        if let Err(e) = config.save() {
            eprintln!("Error saving config: {e}");
            std::process::exit(1);
        }
        println!("Wrote {:?}", Config::config_path());
        println!();
    }

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(config).unwrap_or_else(|_| "Error".to_string())
    );
}

fn parse_subject_or_exit(config: &Config, raw: &str) -> SubjectId {
    match SubjectId::parse(raw, config.subject_count) {
        Ok(subject) => subject,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// One fetch-then-render cycle for the CLI.
fn build_dashboard(
    config: &Config,
    subject: SubjectId,
    input: Option<&Path>,
) -> Result<Dashboard, DashboardError> {
    let recording = match input {
        Some(path) => load_file(path)?,
        None => {
            let client = BlockingDataClient::new(config.request_timeout())?;
            load_remote_blocking(&client, config, subject)?
        }
    };
    Dashboard::build(subject, &recording, config)
}

fn write_dashboard(dir: &Path, config: &Config, dashboard: &Dashboard) -> io::Result<()> {
    let n = dashboard.subject.get();
    std::fs::write(
        dir.join(static_page_name(dashboard.subject)),
        dashboard.to_html(config.subject_count, SelectorTarget::StaticFiles),
    )?;
    std::fs::write(dir.join(format!("subject_{n}_hr.svg")), &dashboard.hr_svg)?;
    std::fs::write(dir.join(format!("subject_{n}_rmssd.svg")), &dashboard.rmssd_svg)?;
    Ok(())
}
