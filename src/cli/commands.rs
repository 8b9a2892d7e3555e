//! CLI commands for the wallet
//!
//! Implements all command handlers for the CLI interface. Every handler
//! works on an explicitly constructed `Wallet`; anything except `generate`
//! loads the key from the wallet file first.

use crate::core::{ReceiptStatus, TransactionReceipt};
use crate::crypto::{format_address, hash_to_hex, Signature};
use crate::network::LedgerGateway;
use crate::units::format_amount;
use crate::wallet::Wallet;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Create a new wallet file
pub fn cmd_generate<G: LedgerGateway>(wallet: &mut Wallet<G>, force: bool) -> CliResult<()> {
    let key_pair = wallet.generate(force)?;
    let address = key_pair.address_hex();
    let public_key = key_pair.public_key_hex();

    println!("🔐 New wallet created!");
    println!("   📍 Address: {}", address);
    println!("   🔑 Public Key: {}...", &public_key[..32]);
    println!("   📁 File: {}", wallet.store().path().display());
    println!("\n   ⚠️  IMPORTANT: Your private key is stored unencrypted in the wallet file.");
    println!("   Back up this file to avoid losing access to your funds!");

    Ok(())
}

/// Show the wallet address
pub fn cmd_address<G: LedgerGateway>(wallet: &mut Wallet<G>) -> CliResult<()> {
    let key_pair = wallet.load()?;

    println!("📍 Address: {}", key_pair.address_hex());
    println!("   🔑 Public Key: {}", key_pair.public_key_hex());

    Ok(())
}

/// Get wallet balance
pub fn cmd_balance<G: LedgerGateway>(wallet: &mut Wallet<G>) -> CliResult<()> {
    wallet.load()?;
    let address = wallet.address()?;
    let balance = wallet.balance()?;

    println!("💰 Balance for {}", address);
    println!("   Total: {} ETH", format_amount(balance));
    println!("   Wei: {}", balance);

    Ok(())
}

/// Send funds
pub fn cmd_send<G: LedgerGateway>(
    wallet: &mut Wallet<G>,
    to: &str,
    amount: &str,
) -> CliResult<()> {
    wallet.load()?;
    let from = wallet.address()?;
    let sent = wallet.send(to, amount)?;

    println!("📤 Transaction submitted:");
    println!("   Hash: {}", sent.hash_hex());
    println!("   From: {}", from);
    println!("   To: {}", format_address(&sent.transaction.to));
    println!("   Amount: {} ETH", format_amount(sent.transaction.value));
    println!("   Nonce: {}", sent.transaction.nonce);
    println!(
        "   Gas: {}{}",
        sent.gas_limit.value,
        if sent.gas_limit.is_fallback() {
            " (default, estimate unavailable)"
        } else {
            ""
        }
    );
    println!("\n   Check progress with: wallet status {}", sent.hash_hex());

    Ok(())
}

/// Show a transaction's status, optionally waiting for it to be mined
pub fn cmd_status<G: LedgerGateway>(
    wallet: &Wallet<G>,
    hash: &str,
    wait_attempts: Option<u32>,
) -> CliResult<()> {
    let receipt = match wait_attempts {
        Some(attempts) => {
            println!("⏳ Waiting for {} ({} attempts)...", hash, attempts);
            Some(wallet.wait_for_transaction(hash, attempts)?)
        }
        None => wallet.transaction_status(hash)?,
    };

    match receipt {
        Some(receipt) => print_receipt(&receipt),
        None => {
            println!("🕐 Transaction {} is pending", hash);
            println!("   No receipt yet. Use --wait to poll until it is mined.");
        }
    }

    Ok(())
}

fn print_receipt(receipt: &TransactionReceipt) {
    match receipt.status {
        ReceiptStatus::Success => println!("✅ Transaction confirmed!"),
        ReceiptStatus::Failure => println!("❌ Transaction mined but reverted"),
        ReceiptStatus::Unknown => {
            println!("⛏️  Transaction mined (node did not report an outcome)")
        }
    }
    println!("   ├─ Hash: {}", hash_to_hex(&receipt.transaction_hash));
    println!("   ├─ Block: {}", receipt.block_number);
    println!("   └─ Gas used: {}", receipt.gas_used);
}

/// Sign a message with the wallet key
pub fn cmd_sign<G: LedgerGateway>(wallet: &mut Wallet<G>, message: &str) -> CliResult<()> {
    wallet.load()?;
    let signature = wallet.sign_message(message.as_bytes())?;

    println!("✍️  Message signed by {}", wallet.address()?);
    println!("   Signature: {}", signature.to_hex());

    Ok(())
}

/// Verify a message signature against an address
///
/// Does not need a wallet file.
pub fn cmd_verify<G: LedgerGateway>(
    wallet: &Wallet<G>,
    message: &str,
    signature: &str,
    address: &str,
) -> CliResult<bool> {
    let signature = Signature::from_hex(signature)?;
    let valid = wallet.verify_message(message.as_bytes(), &signature.to_bytes(), address);

    if valid {
        println!("✅ Signature is valid for {}", address);
    } else {
        println!("❌ Signature does NOT match {}", address);
    }

    Ok(valid)
}
