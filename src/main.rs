//! Ledger Wallet CLI Application
//!
//! A command-line interface for a single-key custodial wallet.

use clap::{Parser, Subcommand};
use ledger_wallet::cli;
use ledger_wallet::config::{self, WalletConfig};
use ledger_wallet::wallet::Wallet;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "wallet")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "A minimal custodial wallet for account-based ledgers", long_about = None)]
struct Cli {
    /// JSON-RPC endpoint of the ledger node
    #[arg(short, long, env = "WALLET_RPC_URL", default_value = config::DEFAULT_RPC_URL)]
    url: String,

    /// Path to the wallet file
    #[arg(short, long, env = "WALLET_FILE", default_value = config::DEFAULT_WALLET_FILE)]
    wallet: PathBuf,

    /// Request timeout in seconds
    #[arg(long, default_value_t = config::DEFAULT_REQUEST_TIMEOUT.as_secs())]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new wallet
    Generate {
        /// Replace an existing wallet file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the wallet address
    Address,

    /// Show the wallet balance
    Balance,

    /// Send funds to an address
    Send {
        /// Recipient address
        address: String,

        /// Amount in whole units, e.g. 0.01
        amount: String,
    },

    /// Show the status of a transaction
    Status {
        /// Transaction hash
        hash: String,

        /// Poll until the transaction is mined
        #[arg(short, long)]
        wait: bool,

        /// Receipt lookups before giving up when waiting
        #[arg(short, long, default_value_t = config::DEFAULT_CONFIRMATION_ATTEMPTS)]
        attempts: u32,
    },

    /// Sign a message with the wallet key
    Sign {
        /// Message text
        message: String,
    },

    /// Verify a message signature
    Verify {
        /// Message text
        message: String,

        /// Signature hex (65 bytes)
        signature: String,

        /// Expected signer address
        address: String,
    },
}

fn main() -> ExitCode {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the command ran but reported a negative result
fn run(cli: Cli) -> cli::CliResult<bool> {
    let config = WalletConfig {
        rpc_url: cli.url,
        wallet_file: cli.wallet,
        request_timeout: Duration::from_secs(cli.timeout),
        ..Default::default()
    };
    let mut wallet = Wallet::from_config(&config)?;

    match cli.command {
        Commands::Generate { force } => cli::cmd_generate(&mut wallet, force)?,
        Commands::Address => cli::cmd_address(&mut wallet)?,
        Commands::Balance => cli::cmd_balance(&mut wallet)?,
        Commands::Send { address, amount } => cli::cmd_send(&mut wallet, &address, &amount)?,
        Commands::Status {
            hash,
            wait,
            attempts,
        } => cli::cmd_status(&wallet, &hash, wait.then_some(attempts))?,
        Commands::Sign { message } => cli::cmd_sign(&mut wallet, &message)?,
        Commands::Verify {
            message,
            signature,
            address,
        } => return cli::cmd_verify(&wallet, &message, &signature, &address),
    }

    Ok(true)
}
