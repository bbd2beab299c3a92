use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use veil_core::session::Credentials;
use veil_infrastructure::{ConfigService, VeilPaths};

mod commands;
mod context;
mod logging;
mod output;

use context::AppContext;
use output::Reported;

#[derive(Parser)]
#[command(name = "veil")]
#[command(about = "Veil - hide data in images through a steganography service", long_about = None)]
#[command(version)]
struct Cli {
    /// Service base URL (overrides the config file and VEIL_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Directory holding config, session and logs (defaults to VEIL_HOME or the user config dir)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register(CredentialArgs),
    /// Log in and store the session token
    Login(CredentialArgs),
    /// Forget the stored session token
    Logout,
    /// Show session state and service address
    Status,
    /// Check whether the service is reachable
    Health,
    /// List the available operations
    Operations,
    /// Hide a payload inside a cover image
    Encode {
        #[command(subcommand)]
        action: EncodeAction,
    },
    /// Extract hidden content from an encoded image
    Decode {
        /// Encoded image
        image: PathBuf,
    },
    /// Inspect or write the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum EncodeAction {
    /// Hide a text message
    Text {
        /// Cover image
        cover: PathBuf,
        /// Secret message
        #[arg(short, long)]
        message: String,
    },
    /// Hide an image
    Image {
        /// Cover image
        cover: PathBuf,
        /// Image to hide
        hidden: PathBuf,
    },
    /// Hide an audio file
    Audio {
        /// Cover image
        cover: PathBuf,
        /// Audio file to hide (mp3, wav, mpeg, ogg)
        audio: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the effective configuration to the config file
    Init {
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
struct CredentialArgs {
    #[arg(long, env = "VEIL_EMAIL")]
    email: String,
    #[arg(long, env = "VEIL_PASSWORD", hide_env_values = true)]
    password: String,
}

impl From<CredentialArgs> for Credentials {
    fn from(args: CredentialArgs) -> Self {
        Credentials::new(args.email, args.password)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is::<Reported>() => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let paths = match cli.home {
        Some(home) => VeilPaths::with_root(home),
        None => VeilPaths::from_env().context("Could not determine the config directory")?,
    };

    let mut config = ConfigService::new(paths.clone())
        .load()
        .context("Failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
        config = config.validate().context("Invalid --base-url")?;
    }

    let _guard = logging::init(&config.log_level, &paths.logs_dir());
    tracing::debug!(base_url = %config.base_url, "starting");

    let ctx = AppContext::new(paths, config);

    match cli.command {
        Commands::Register(args) => commands::auth::register(&ctx, args.into()).await,
        Commands::Login(args) => commands::auth::login(&ctx, args.into()).await,
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Status => commands::auth::status(&ctx),
        Commands::Health => commands::service::health(&ctx).await,
        Commands::Operations => {
            commands::service::operations();
            Ok(())
        }
        Commands::Encode { action } => match action {
            EncodeAction::Text { cover, message } => {
                commands::media::encode_text(&ctx, &cover, message).await
            }
            EncodeAction::Image { cover, hidden } => {
                commands::media::encode_image(&ctx, &cover, &hidden).await
            }
            EncodeAction::Audio { cover, audio } => {
                commands::media::encode_audio(&ctx, &cover, &audio).await
            }
        },
        Commands::Decode { image } => commands::media::decode(&ctx, &image).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&ctx),
            ConfigAction::Init { force } => commands::config::init(&ctx, force),
        },
    }
}
