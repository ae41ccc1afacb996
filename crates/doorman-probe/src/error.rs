//! Probe failure taxonomy.

use doorman_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ways a provisioning check can fail.
///
/// Every variant means "provisioning state unknown". A backend that answers
/// "not found" has *not* failed — that is
/// [`Provisioning::Incomplete`](crate::Provisioning), a successful check.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ProbeError {
    /// The request never produced an HTTP answer (timeout, DNS, connect).
    #[error("transport failure: {detail}")]
    Transport {
        /// Classified transport detail.
        detail: String,
    },

    /// The backend answered with a status outside the contract.
    #[error("unexpected backend status {status}")]
    Server {
        /// HTTP status code as received.
        status: u16,
    },

    /// A success status arrived without a usable profile body.
    #[error("unusable profile payload: {detail}")]
    Payload {
        /// What was wrong with the body.
        detail: String,
    },
}

impl ErrorCode for ProbeError {
    fn code(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "PROBE_TRANSPORT",
            Self::Server { .. } => "PROBE_SERVER_STATUS",
            Self::Payload { .. } => "PROBE_BAD_PAYLOAD",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            // 5xx is worth retrying; a 4xx contract violation is not.
            Self::Server { status } => *status >= 500,
            Self::Payload { .. } => false,
        }
    }
}
