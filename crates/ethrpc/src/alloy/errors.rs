use alloy::transports::{RpcError, TransportError};

pub trait TransportErrorExt {
    /// Returns whether the node executed the call and the EVM reverted it.
    /// On a view function that usually means the target does not implement
    /// the function at all.
    fn is_revert(&self) -> bool;

    /// Returns whether the error is caused by the node or the connection to
    /// it rather than by the call itself.
    fn is_node_error(&self) -> bool {
        !self.is_revert()
    }
}

impl TransportErrorExt for TransportError {
    fn is_revert(&self) -> bool {
        match self {
            // Calls to missing functions revert with empty data, in which case
            // `as_revert_data` returns `None` even though the call reverted.
            // Fall back to the message the node attached.
            RpcError::ErrorResp(err) => {
                let revert = err.as_revert_data().is_some() || err.message.contains("revert");
                tracing::debug!(?err, %revert, "rpc error response");
                revert
            }
            _ => false,
        }
    }
}

/// Create an error that classifies as a node error. Useful for testing.
#[cfg(any(test, feature = "test-util"))]
pub fn testing_node_error() -> TransportError {
    RpcError::ErrorResp(alloy::rpc::json_rpc::ErrorPayload::internal_error())
}

/// Create an error that classifies as a reverted call. Useful for testing.
#[cfg(any(test, feature = "test-util"))]
pub fn testing_revert_error() -> TransportError {
    RpcError::ErrorResp(alloy::rpc::json_rpc::ErrorPayload {
        code: 3,
        message: "execution reverted".into(),
        data: None,
    })
}
