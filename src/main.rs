use clap::{Parser, Subcommand};
use stegcrypt::cli::{
    embed_into_image, extract_from_image, generate_master_key, show_info, EmbedOptions,
    ExtractOptions,
};
use stegcrypt::config::Config;
use stegcrypt::MasterKeyStore;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Version info from build.rs
const VERSION: &str = env!("CARGO_PKG_VERSION");
const PROFILE: &str = env!("STEGCRYPT_PROFILE");
const GIT_HASH: &str = env!("STEGCRYPT_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} ({})", PROFILE, VERSION, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "stegcrypt")]
#[command(author, about = "Hide encrypted text in the pixels of an image", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Base64 master key shared by both peers
    #[arg(long, global = true, env = "STEGCRYPT_MASTER_KEY", hide_env_values = true)]
    master_key: Option<String>,

    /// JSON config file with master_key and log_level
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a message and hide it in an image
    #[command(alias = "e")]
    Embed {
        /// Message to hide
        #[arg(short, long, required = true)]
        message: String,

        /// Cover image
        input: PathBuf,

        /// Output stego image (always PNG)
        output: PathBuf,

        /// Write Base64 PNG text instead of a PNG file
        #[arg(long)]
        transport: bool,
    },

    /// Recover a hidden message
    #[command(alias = "x")]
    Extract {
        /// Stego image
        input: PathBuf,

        /// Input is Base64 PNG text
        #[arg(long)]
        transport: bool,
    },

    /// Show capacity and frame information about an image
    #[command(alias = "i")]
    Info {
        /// Image to inspect
        file: PathBuf,

        /// Input is Base64 PNG text
        #[arg(long)]
        transport: bool,
    },

    /// Generate a new master key
    #[command(alias = "k")]
    Keygen,
}

fn load_config(cli: &Cli) -> stegcrypt::Result<Config> {
    let file = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    Ok(file.merge(Config {
        master_key: cli.master_key.clone(),
        log_level: cli.log_level.clone(),
    }))
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Handle --version flag
    if cli.version {
        println!("stegcrypt {}", get_version());
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            if let Err(e) = Cli::command().print_help() {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            println!();
            return ExitCode::SUCCESS;
        }
    };

    let store = MasterKeyStore::global();
    if let Some(key) = &config.master_key {
        store.set_master_key(key);
    }

    let result = match command {
        Commands::Embed {
            message,
            input,
            output,
            transport,
        } => {
            let options = EmbedOptions { message, transport };
            embed_into_image(&input, &output, &options, store).map(|report| {
                println!(
                    "Embedded {} bits into {} ({} bits available)",
                    report.required_bits,
                    output.display(),
                    report.available_bits
                );
            })
        }

        Commands::Extract { input, transport } => {
            let options = ExtractOptions { transport };
            extract_from_image(&input, &options, store).map(|message| println!("{}", message))
        }

        Commands::Info { file, transport } => {
            show_info(&file, transport).map(|info| print!("{}", info))
        }

        Commands::Keygen => generate_master_key().map(|key| println!("{}", key.to_base64())),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
