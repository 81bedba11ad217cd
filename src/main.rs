use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;
mod discovery;
mod error;
mod git;
mod parse;
mod provider;
mod settings;
mod ssh;
mod storage;

use cli::commands::{self, AddArgs};
use cli::context::Context;
use cli::migrate;
use cli::prompt::Terminal;

#[derive(Parser)]
#[command(name = "krakn", version, about = "Manage multiple git/SSH identities")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an SSH key for an account
    GenerateKey {
        /// Account name (e.g. work)
        #[arg(short, long)]
        name: String,
        /// Email used as the key comment
        #[arg(short, long)]
        email: String,
        /// Provider name (github, gitlab, gitea, custom)
        #[arg(short, long)]
        provider: Option<String>,
        /// Hostname of a self-hosted provider
        #[arg(long)]
        hostname: Option<String>,
    },

    /// Add an account, prompting for anything not given
    Add {
        /// Account name
        #[arg(short, long)]
        name: Option<String>,
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
        /// Username at the provider
        #[arg(short, long)]
        username: Option<String>,
        /// Provider name (github, gitlab, gitea, custom)
        #[arg(short, long)]
        provider: Option<String>,
        /// Hostname of a self-hosted provider
        #[arg(long)]
        hostname: Option<String>,
        /// Path to an existing SSH private key
        #[arg(short, long)]
        key: Option<String>,
    },

    /// List accounts and the active git identity
    List {
        /// Show only the global git identity
        #[arg(short, long)]
        global: bool,
    },

    /// Switch the git identity of a repository (or globally)
    Use {
        /// Account name
        account: String,
        /// Repository path (global if omitted)
        path: Option<PathBuf>,
        /// Set the global identity instead
        #[arg(short, long)]
        global: bool,
    },

    /// Set the global git identity
    Global {
        /// Account name
        account: String,
    },

    /// Use an account for every repository under a directory
    Config {
        /// Directory (interactive for the current directory if omitted)
        dir: Option<PathBuf>,
        /// Account name
        account: Option<String>,
    },

    /// Show directory-based conditional includes
    ShowIncludes,

    /// Delete an account
    Remove {
        /// Account name
        account: String,
    },

    /// Re-run discovery of existing git/SSH identities
    Migrate,

    /// List known providers
    Providers,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Providers = cli.command {
        return commands::cmd_providers();
    }

    let ctx = Context::load()?;
    let mut prompter = Terminal;

    if !matches!(cli.command, Commands::Migrate) {
        migrate::first_run(&ctx, &mut prompter);
    }

    match cli.command {
        Commands::GenerateKey {
            name,
            email,
            provider,
            hostname,
        } => commands::cmd_generate_key(
            &ctx,
            &mut prompter,
            &name,
            &email,
            provider.as_deref(),
            hostname.as_deref(),
        ),
        Commands::Add {
            name,
            email,
            username,
            provider,
            hostname,
            key,
        } => commands::cmd_add(
            &ctx,
            &mut prompter,
            AddArgs {
                name,
                email,
                username,
                provider,
                hostname,
                key,
            },
        ),
        Commands::List { global } => commands::cmd_list(&ctx, global),
        Commands::Use {
            account,
            path,
            global,
        } => commands::cmd_use(&ctx, &account, path.as_deref(), global),
        Commands::Global { account } => commands::cmd_global(&ctx, &account),
        Commands::Config { dir, account } => {
            commands::cmd_config(&ctx, &mut prompter, dir.as_deref(), account.as_deref())
        }
        Commands::ShowIncludes => commands::cmd_show_includes(&ctx),
        Commands::Remove { account } => commands::cmd_remove(&ctx, &mut prompter, &account),
        Commands::Migrate => migrate::cmd_migrate(&ctx, &mut prompter),
        Commands::Providers => commands::cmd_providers(),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
