//! Resource limit selection
//!
//! Estimation is advisory: a plain value transfer has a known minimum
//! cost, so a failed estimate falls back to that floor instead of
//! aborting the send.

use crate::network::GatewayError;

/// Minimum gas cost of a plain value transfer
pub const TRANSFER_GAS_FLOOR: u64 = 21_000;

/// Where the chosen gas limit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasLimitSource {
    /// Returned by the node's estimator
    Estimated,
    /// Estimation failed; the transfer floor was used
    Fallback,
}

/// A gas limit together with its provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasLimit {
    pub value: u64,
    pub source: GasLimitSource,
}

impl GasLimit {
    pub fn is_fallback(&self) -> bool {
        self.source == GasLimitSource::Fallback
    }
}

/// Pick the gas limit for a transfer from an estimation outcome
pub fn resolve_gas_limit(estimate: Result<u64, GatewayError>) -> GasLimit {
    match estimate {
        Ok(value) => GasLimit {
            value,
            source: GasLimitSource::Estimated,
        },
        Err(e) => {
            let class = if e.is_transport() {
                "transport failure"
            } else {
                "node rejected estimate"
            };
            log::warn!(
                "Gas estimation failed ({}: {}), using transfer floor of {}",
                class,
                e,
                TRANSFER_GAS_FLOOR
            );
            GasLimit {
                value: TRANSFER_GAS_FLOOR,
                source: GasLimitSource::Fallback,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_used_when_available() {
        let limit = resolve_gas_limit(Ok(30_000));
        assert_eq!(limit.value, 30_000);
        assert_eq!(limit.source, GasLimitSource::Estimated);
    }

    #[test]
    fn test_fallback_on_rpc_error() {
        let limit = resolve_gas_limit(Err(GatewayError::Rpc {
            code: -32000,
            message: "execution reverted".to_string(),
        }));
        assert_eq!(limit.value, TRANSFER_GAS_FLOOR);
        assert!(limit.is_fallback());
    }

    #[test]
    fn test_fallback_on_transport_error() {
        let limit = resolve_gas_limit(Err(GatewayError::Transport("timed out".to_string())));
        assert_eq!(limit.value, TRANSFER_GAS_FLOOR);
        assert!(limit.is_fallback());
    }
}
