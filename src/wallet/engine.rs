//! Transfer pipeline
//!
//! validate → gather → estimate → build → sign → submit, strictly in
//! order, each step a single blocking call. Submission is never retried;
//! confirmation polling is a bounded fixed-interval loop.

use alloy::primitives::{Address, Bytes, B256, U256};
use std::thread;
use std::time::Duration;

use crate::core::{resolve_gas_limit, GasLimit, PendingTransaction, TransactionReceipt};
use crate::crypto::{format_address, hash_to_hex, parse_address, HashSigner};
use crate::error::{PipelineStage, WalletError, WalletResult};
use crate::network::{CallRequest, LedgerGateway};
use crate::units::{self, UnitError};

/// A validated transfer: well-formed recipient, positive amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub to: Address,
    /// Amount in smallest units
    pub value: U256,
}

impl TransferRequest {
    /// Validate a recipient address and a human-unit decimal amount
    pub fn parse(recipient: &str, amount: &str) -> WalletResult<Self> {
        let to = parse_address(recipient)
            .map_err(|_| WalletError::InvalidRecipient(recipient.to_string()))?;

        let value = units::parse_amount(amount).map_err(|e| match e {
            UnitError::Negative(_) => {
                WalletError::InvalidAmount(format!("{} (amount must be positive)", amount))
            }
            other => WalletError::InvalidAmount(other.to_string()),
        })?;
        if value.is_zero() {
            return Err(WalletError::InvalidAmount(format!(
                "{} (amount must be positive)",
                amount
            )));
        }

        Ok(Self { to, value })
    }
}

/// A built, unsigned transfer and how its gas limit was chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTransfer {
    pub transaction: PendingTransaction,
    pub gas_limit: GasLimit,
}

/// Outcome of a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentTransfer {
    /// Handle for later status polling
    pub hash: B256,
    pub transaction: PendingTransaction,
    pub gas_limit: GasLimit,
}

impl SentTransfer {
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }
}

/// Builds, signs and submits transfers through a ledger gateway
#[derive(Debug)]
pub struct TransactionEngine<G: LedgerGateway> {
    gateway: G,
    poll_interval: Duration,
}

impl<G: LedgerGateway> TransactionEngine<G> {
    pub fn new(gateway: G, poll_interval: Duration) -> Self {
        Self {
            gateway,
            poll_interval,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Gather nonce and fee data, estimate gas and build the transaction
    pub fn prepare(
        &self,
        sender: Address,
        request: &TransferRequest,
    ) -> WalletResult<PreparedTransfer> {
        let nonce = self
            .gateway
            .nonce(sender)
            .map_err(WalletError::network(PipelineStage::Gather))?;
        let gas_price = self
            .gateway
            .suggest_fee_price()
            .map_err(WalletError::network(PipelineStage::Gather))?;
        let chain_id = self
            .gateway
            .network_id()
            .map_err(WalletError::network(PipelineStage::Gather))?;

        let gas_limit = resolve_gas_limit(self.gateway.estimate_resource_limit(&CallRequest {
            from: sender,
            to: request.to,
            value: request.value,
            data: Bytes::new(),
        }));

        let transaction = PendingTransaction::transfer(
            sender,
            request.to,
            request.value,
            gas_limit.value,
            gas_price,
            nonce,
            chain_id,
        );

        log::debug!(
            "Prepared transfer nonce={} gas_limit={} ({:?}) gas_price={} chain_id={}",
            nonce,
            gas_limit.value,
            gas_limit.source,
            gas_price,
            chain_id
        );

        Ok(PreparedTransfer {
            transaction,
            gas_limit,
        })
    }

    /// Run the full pipeline for an already validated request
    pub fn send<S: HashSigner + ?Sized>(
        &self,
        signer: &S,
        request: &TransferRequest,
    ) -> WalletResult<SentTransfer> {
        let PreparedTransfer {
            transaction,
            gas_limit,
        } = self.prepare(signer.address(), request)?;

        let signed = transaction.sign(signer)?;
        let hash = signed.hash();

        // A transport failure leaves the outcome unknown; only an answer
        // from the node counts as a rejection
        self.gateway.submit(&signed.encoded()).map_err(|e| {
            if e.is_transport() {
                WalletError::network(PipelineStage::Submit)(e)
            } else {
                WalletError::Submission(e)
            }
        })?;

        log::info!(
            "Submitted transfer of {} to {} as {}",
            units::format_amount(request.value),
            format_address(&request.to),
            hash_to_hex(&hash)
        );

        Ok(SentTransfer {
            hash,
            transaction: signed.transaction().clone(),
            gas_limit,
        })
    }

    /// Validate raw user input, then run the pipeline
    pub fn send_to<S: HashSigner + ?Sized>(
        &self,
        signer: &S,
        recipient: &str,
        amount: &str,
    ) -> WalletResult<SentTransfer> {
        let request = TransferRequest::parse(recipient, amount)?;
        self.send(signer, &request)
    }

    /// Account balance in smallest units
    pub fn balance(&self, address: Address) -> WalletResult<U256> {
        self.gateway
            .balance(address)
            .map_err(WalletError::network(PipelineStage::Query))
    }

    /// Single receipt lookup; `None` while the transaction is unmined
    pub fn transaction_status(&self, hash: B256) -> WalletResult<Option<TransactionReceipt>> {
        self.gateway
            .receipt(hash)
            .map_err(WalletError::network(PipelineStage::Poll))
    }

    /// Poll for a receipt at most `max_attempts` times, `poll_interval` apart
    pub fn wait_for_transaction(
        &self,
        hash: B256,
        max_attempts: u32,
    ) -> WalletResult<TransactionReceipt> {
        for attempt in 1..=max_attempts {
            match self.gateway.receipt(hash) {
                Ok(Some(receipt)) => return Ok(receipt),
                Ok(None) => log::debug!(
                    "No receipt for {} yet (attempt {}/{})",
                    hash_to_hex(&hash),
                    attempt,
                    max_attempts
                ),
                Err(e) => log::warn!(
                    "Receipt lookup for {} failed (attempt {}/{}): {}",
                    hash_to_hex(&hash),
                    attempt,
                    max_attempts,
                    e
                ),
            }

            if attempt < max_attempts {
                thread::sleep(self.poll_interval);
            }
        }

        Err(WalletError::NotConfirmed {
            hash: hash_to_hex(&hash),
            attempts: max_attempts,
        })
    }
}
