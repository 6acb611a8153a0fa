#![forbid(unsafe_code)]

mod cmd;
mod identity;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error};
use referral_core::config::resolve_config;
use referral_core::error::ErrorCode;
use std::env;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "refer: find the best-placed referrer in your network",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (pretty, text, json).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Override user identity (skips env resolution).
    #[arg(long, global = true)]
    user: Option<String>,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Get the user flag as an Option<&str> for resolution.
    fn user_flag(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Output mode before config is available.
    fn fallback_output(&self) -> OutputMode {
        self.format
            .unwrap_or(if self.json { OutputMode::Json } else { OutputMode::Text })
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Lifecycle",
        about = "Initialize a referral network",
        long_about = "Create .referral/ with an empty network document and a default config.",
        after_help = "EXAMPLES:\n    # Initialize in the current directory\n    refer init\n\n    # Emit machine-readable output\n    refer init --format json"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Network",
        about = "Register your role and company",
        long_about = "Register (or update) the acting user with a job role and company.",
        after_help = "EXAMPLES:\n    # Register as an SDE2 at Acme\n    refer register SDE2 Acme\n\n    # Register someone else\n    refer --user alice register Manager Globex"
    )]
    Register(cmd::register::RegisterArgs),

    #[command(
        next_help_heading = "Network",
        about = "Connect two users",
        long_about = "Record a connection between two users. Connections are undirected for ranking.",
        after_help = "EXAMPLES:\n    # Connect alice and bob\n    refer connect alice bob"
    )]
    Connect(cmd::connect::ConnectArgs),

    #[command(
        next_help_heading = "Network",
        about = "Rate a user from 1 to 5",
        long_about = "Leave a 1-5 rating for a registered user.",
        after_help = "EXAMPLES:\n    # Rate bob 5 stars\n    refer rate bob 5"
    )]
    Rate(cmd::rate::RateArgs),

    #[command(
        next_help_heading = "Read",
        about = "Find the best referrer at a company",
        long_about = "Rank everyone in the network by authority and pick the best-placed person at the company.",
        after_help = "EXAMPLES:\n    # Who can refer me into Acme?\n    refer find-referrer Acme\n\n    # Emit machine-readable output\n    refer find-referrer Acme --format json"
    )]
    FindReferrer(cmd::find_referrer::FindReferrerArgs),

    #[command(
        next_help_heading = "Read",
        about = "Suggest users by role or company",
        long_about = "List users whose role or company matches the query, a case-insensitive regular expression.",
        after_help = "EXAMPLES:\n    # Everyone at a company\n    refer suggest acme\n\n    # Multi-word query\n    refer suggest big corp\n\n    # Pattern query\n    refer suggest '^sde[12]$'"
    )]
    Suggest(cmd::suggest::SuggestArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show or export the connection graph",
        long_about = "Print graph statistics and top authorities, or export nodes and edges as JSON.",
        after_help = "EXAMPLES:\n    # Summary\n    refer graph\n\n    # Visualizer export\n    refer graph --format json"
    )]
    Graph(cmd::graph::GraphArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Check that the CLI responds"
    )]
    Ping,

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    refer completions bash\n\n    # Generate zsh completions\n    refer completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose || env::var("DEBUG").is_ok() {
        "referral=debug,refer=debug,info"
    } else {
        "referral=info,refer=info,warn"
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("REFERRAL_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet)));

    let format = env::var("REFERRAL_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let project_root = env::current_dir()?;
    let config = match resolve_config(&project_root, cli.json) {
        Ok(c) => c,
        Err(e) => {
            render_error(
                cli.fallback_output(),
                &CliError::from_code(format!("{e:#}"), ErrorCode::ConfigParseError),
            )?;
            return Err(e);
        }
    };
    let output = cli
        .format
        .unwrap_or_else(|| OutputMode::from_resolved(&config.resolved_output));
    debug!(?output, root = %project_root.display(), "resolved cli context");

    match cli.command {
        Commands::Init(ref args) => {
            cmd::init::run_init(args, output, &project_root, &config.project.store)
        }
        Commands::Register(ref args) => cmd::register::run_register(
            args,
            cli.user_flag(),
            output,
            &project_root,
            &config,
        ),
        Commands::Connect(ref args) => {
            cmd::connect::run_connect(args, output, &project_root, &config.project.store)
        }
        Commands::Rate(ref args) => {
            cmd::rate::run_rate(args, output, &project_root, &config.project.store)
        }
        Commands::FindReferrer(ref args) => cmd::find_referrer::run_find_referrer(
            args,
            cli.user_flag(),
            output,
            &project_root,
            &config,
        ),
        Commands::Suggest(ref args) => {
            cmd::suggest::run_suggest(args, output, &project_root, &config.project.store)
        }
        Commands::Graph(ref args) => cmd::graph::run_graph(args, output, &project_root, &config),
        Commands::Ping => cmd::ping::run_ping(output),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
