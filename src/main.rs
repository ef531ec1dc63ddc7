use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "babelcode")]
#[command(
    version,
    about = "Translate a prompt into many languages, generate code with a local LLM, and statically analyze what comes back"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize BabelCode in the current directory
    Init {
        #[arg(long, short, help = "Overwrite existing project config")]
        force: bool,
    },

    /// Run the full pipeline: translate, generate, analyze, report
    Run {
        #[arg(help = "Base prompt in English (asked interactively if omitted)")]
        prompt: Option<String>,
    },

    /// Translate the base prompt into every target language
    Translate {
        #[arg(help = "Base prompt in English (asked interactively if omitted)")]
        prompt: Option<String>,
    },

    /// Query the LLM for each saved translated prompt
    Generate,

    /// Extract and structurally analyze the saved LLM responses
    Analyze,

    /// Regenerate the summary report from saved analysis records
    Report {
        #[arg(long, help = "Emit the report as JSON instead of text")]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mBabelCode encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }

        eprintln!();
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Init { force } => {
            babelcode::cli::commands::init::run(force)?;
        }
        Commands::Run { prompt } => {
            let prompt = babelcode::cli::resolve_prompt(prompt)?;
            let rt = Runtime::new()?;
            rt.block_on(babelcode::cli::commands::run::run(prompt))?;
        }
        Commands::Translate { prompt } => {
            let prompt = babelcode::cli::resolve_prompt(prompt)?;
            let rt = Runtime::new()?;
            rt.block_on(babelcode::cli::commands::translate::run(prompt))?;
        }
        Commands::Generate => {
            let rt = Runtime::new()?;
            rt.block_on(babelcode::cli::commands::generate::run())?;
        }
        Commands::Analyze => {
            babelcode::cli::commands::analyze::run()?;
        }
        Commands::Report { json } => {
            babelcode::cli::commands::report::run(json)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => {
                babelcode::cli::commands::config::show(json)?;
            }
            ConfigAction::Path => {
                babelcode::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                babelcode::cli::commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
