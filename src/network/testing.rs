//! In-memory gateway for tests

use alloy::primitives::{Address, B256, U256};
use std::cell::{Cell, RefCell};

use super::gateway::{CallRequest, GatewayError, LedgerGateway};
use crate::core::{ReceiptStatus, TransactionReceipt};

/// Scriptable ledger gateway that records every call it receives
#[derive(Debug)]
pub struct MockGateway {
    pub balance: U256,
    pub nonce: u64,
    pub fee_price: u128,
    pub network_id: u64,
    /// `Err` makes estimation fail with that error
    pub estimate: Result<u64, GatewayError>,
    pub fail_nonce: bool,
    pub fail_fee_price: bool,
    /// `Some(message)` makes the node reject submissions
    pub reject_submission: Option<String>,
    /// Submissions time out before the node answers
    pub submit_timeout: bool,
    /// The first N receipt lookups fail with a transport error
    pub fail_receipt_queries: usize,
    /// Receipt becomes visible on this (1-based) query; `None` means never
    pub receipt_on_query: Option<usize>,
    pub receipt_status: ReceiptStatus,
    receipt_queries: Cell<usize>,
    submitted: RefCell<Vec<Vec<u8>>>,
    calls: RefCell<Vec<&'static str>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            balance: U256::from(5_000_000_000_000_000_000u64),
            nonce: 7,
            fee_price: 1_000_000_000,
            network_id: 11_155_111,
            estimate: Ok(21_000),
            fail_nonce: false,
            fail_fee_price: false,
            reject_submission: None,
            submit_timeout: false,
            fail_receipt_queries: 0,
            receipt_on_query: Some(1),
            receipt_status: ReceiptStatus::Success,
            receipt_queries: Cell::new(0),
            submitted: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn receipt_queries(&self) -> usize {
        self.receipt_queries.get()
    }

    pub fn submitted(&self) -> Vec<Vec<u8>> {
        self.submitted.borrow().clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.borrow_mut().push(call);
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerGateway for MockGateway {
    fn balance(&self, _address: Address) -> Result<U256, GatewayError> {
        self.record("balance");
        Ok(self.balance)
    }

    fn nonce(&self, _address: Address) -> Result<u64, GatewayError> {
        self.record("nonce");
        if self.fail_nonce {
            return Err(GatewayError::Transport("connection refused".to_string()));
        }
        Ok(self.nonce)
    }

    fn suggest_fee_price(&self) -> Result<u128, GatewayError> {
        self.record("fee_price");
        if self.fail_fee_price {
            return Err(GatewayError::Transport("request timed out".to_string()));
        }
        Ok(self.fee_price)
    }

    fn network_id(&self) -> Result<u64, GatewayError> {
        self.record("network_id");
        Ok(self.network_id)
    }

    fn estimate_resource_limit(&self, _request: &CallRequest) -> Result<u64, GatewayError> {
        self.record("estimate");
        self.estimate.clone()
    }

    fn submit(&self, raw_transaction: &[u8]) -> Result<(), GatewayError> {
        self.record("submit");
        if self.submit_timeout {
            return Err(GatewayError::Transport("operation timed out".to_string()));
        }
        if let Some(message) = &self.reject_submission {
            return Err(GatewayError::Rpc {
                code: -32000,
                message: message.clone(),
            });
        }
        self.submitted.borrow_mut().push(raw_transaction.to_vec());
        Ok(())
    }

    fn receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>, GatewayError> {
        self.record("receipt");
        let query = self.receipt_queries.get() + 1;
        self.receipt_queries.set(query);
        if query <= self.fail_receipt_queries {
            return Err(GatewayError::Transport("connection reset".to_string()));
        }

        match self.receipt_on_query {
            Some(visible_from) if query >= visible_from => Ok(Some(TransactionReceipt {
                transaction_hash: hash,
                status: self.receipt_status,
                block_number: 4_200_000,
                gas_used: 21_000,
            })),
            _ => Ok(None),
        }
    }
}
