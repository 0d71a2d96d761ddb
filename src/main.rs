//! rsa-text: generate keys, encrypt and decrypt text with textbook RSA
//!
//!   keygen                                  - generate a key pair and write both key files
//!   encrypt [-m TEXT | -i FILE] [-o FILE]   - print (and optionally store) ciphertext tokens
//!   decrypt [--ciphertext TOKENS | -i FILE] - print the recovered message
//!
//! Without -m / --ciphertext / -i, one line is read from stdin.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use rsa_text::config::{LogFormat, RsaTextConfig};
use rsa_text::rsa::{
    generate_keypair, load_private_key, load_public_key, read_ciphertext_file, save_keypair,
    write_ciphertext_file, Ciphertext,
};

#[derive(Parser, Debug)]
#[command(
    name = "rsa-text",
    version,
    about = "Textbook RSA over radix-1000 character blocks"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', env = "RSA_TEXT_CONFIG", default_value = "rsa-text.toml")]
    config: PathBuf,

    /// Public key file (overrides keys.public_key)
    #[arg(long, env = "RSA_TEXT_PUBLIC_KEY")]
    public_key: Option<PathBuf>,

    /// Private key file (overrides keys.private_key)
    #[arg(long, env = "RSA_TEXT_PRIVATE_KEY")]
    private_key: Option<PathBuf>,

    /// Characters per block (overrides cipher.block_size)
    #[arg(long)]
    block_size: Option<usize>,

    /// Seed the random source for reproducible keys; never use for real keys
    #[arg(long, env = "RSA_TEXT_SEED")]
    seed: Option<u64>,

    /// Log filter (overrides log.level)
    #[arg(long, env = "RSA_TEXT_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new key pair and write both key files
    Keygen,

    /// Encrypt a message with the public key
    Encrypt {
        /// Message to encrypt
        #[arg(long, short = 'm', conflicts_with = "input")]
        message: Option<String>,

        /// Read the whole message from a file
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Also write the ciphertext to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Decrypt ciphertext tokens with the private key
    Decrypt {
        /// Space-separated decimal tokens
        #[arg(long, conflicts_with = "input")]
        ciphertext: Option<String>,

        /// Read the ciphertext from a file written by `encrypt --output`
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    init_tracing(
        log_filter(cli.log_level.as_deref(), &config.log.level),
        config.log.format,
    );

    match cli.command {
        Commands::Keygen => cmd_keygen(&config, cli.seed),
        Commands::Encrypt {
            ref message,
            ref input,
            ref output,
        } => cmd_encrypt(&config, message.as_deref(), input.as_deref(), output.as_deref()),
        Commands::Decrypt {
            ref ciphertext,
            ref input,
        } => cmd_decrypt(&config, ciphertext.as_deref(), input.as_deref()),
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

fn load_config(cli: &Cli) -> Result<RsaTextConfig> {
    let mut config = RsaTextConfig::load(&cli.config)
        .with_context(|| format!("loading config: {}", cli.config.display()))?;

    if let Some(path) = &cli.public_key {
        config.keys.public_key = path.clone();
    }
    if let Some(path) = &cli.private_key {
        config.keys.private_key = path.clone();
    }
    if let Some(block_size) = cli.block_size {
        config.cipher.block_size = block_size;
    }

    config.validate().context("validating configuration")?;
    Ok(config)
}

/// Filter precedence: --log-level / RSA_TEXT_LOG, then RUST_LOG, then log.level
fn log_filter(cli_level: Option<&str>, config_level: &str) -> EnvFilter {
    match cli_level {
        Some(level) => EnvFilter::new(level),
        None => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level))
        }
    }
}

/// Logs go to stderr; stdout carries only ciphertext and plaintext
fn init_tracing(filter: EnvFilter, format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            warn!(seed, "using a fixed seed, generated keys are reproducible");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

/// One line from stdin, without its terminator
fn read_stdin_line() -> Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading stdin")?;
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn cmd_keygen(config: &RsaTextConfig, seed: Option<u64>) -> Result<()> {
    let mut rng = make_rng(seed);
    let keypair =
        generate_keypair(&mut rng, &config.keygen_params()).context("generating key pair")?;

    let paths = config.key_paths();
    save_keypair(&keypair, &paths).context("saving key pair")?;

    println!(
        "Generated a {}-bit key pair: public key {}, private key {}",
        keypair.bit_length(),
        paths.public_key.display(),
        paths.private_key.display()
    );
    Ok(())
}

fn cmd_encrypt(
    config: &RsaTextConfig,
    message: Option<&str>,
    input: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let public_key = load_public_key(&config.keys.public_key)?;

    let plaintext = match (message, input) {
        (Some(message), _) => message.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("reading message: {}", path.display()))?,
        (None, None) => read_stdin_line()?,
    };

    let ciphertext = public_key
        .encrypt(&plaintext, config.cipher.block_size)
        .context("encrypting message")?;

    if let Some(path) = output {
        write_ciphertext_file(path, &ciphertext)?;
    }

    println!("{}", ciphertext);
    Ok(())
}

fn cmd_decrypt(
    config: &RsaTextConfig,
    tokens: Option<&str>,
    input: Option<&Path>,
) -> Result<()> {
    let private_key = load_private_key(&config.keys.private_key)?;

    let ciphertext: Ciphertext = match (tokens, input) {
        (Some(tokens), _) => tokens.parse()?,
        (None, Some(path)) => read_ciphertext_file(path)?,
        (None, None) => read_stdin_line()?.parse()?,
    };

    let plaintext = private_key
        .decrypt(&ciphertext, config.cipher.block_size)
        .context("decrypting ciphertext")?;

    println!("{}", plaintext);
    Ok(())
}
