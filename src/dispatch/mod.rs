//! Turning a resolved terminal step into a call to the transaction builder.

mod builder;
mod kinds;

pub use builder::{PayloadEchoBuilder, TransactionBuilder};
pub use kinds::{RESERVED_ADDRESS_TOKEN, TransactionKind, is_valid_address, scaled_amount};

use crate::error::DispatchError;
use crate::schema::ParamBag;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Validates a transaction request and hands it to the builder, bounded by a timeout.
#[derive(Clone)]
pub struct Dispatcher {
    builder: Arc<dyn TransactionBuilder>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(builder: Arc<dyn TransactionBuilder>, timeout: Duration) -> Self {
        Self { builder, timeout }
    }

    /// Validates `params` for `kind_tag` and, only if they pass, builds the transaction.
    ///
    /// The builder runs on its own task so that a panic inside it surfaces as
    /// `DispatchError::Build` instead of tearing down the request.
    pub async fn dispatch(
        &self,
        kind_tag: &str,
        account: &str,
        params: ParamBag,
    ) -> Result<String, DispatchError> {
        let kind = TransactionKind::from_tag(kind_tag);
        kind.validate(&params)?;
        if let TransactionKind::Other(tag) = &kind {
            debug!(kind = %tag, "no checks for this transaction kind, forwarding as-is");
        }

        let builder = Arc::clone(&self.builder);
        let tag = kind.tag().to_string();
        let account = account.to_string();
        let mut task = tokio::spawn(async move { builder.create(&tag, &account, &params).await });

        match tokio::time::timeout(self.timeout, &mut task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                warn!(error = %join_error, "transaction builder task failed");
                Err(DispatchError::Build(
                    "transaction builder stopped unexpectedly".to_string(),
                ))
            }
            Err(_) => {
                task.abort();
                Err(DispatchError::Timeout(self.timeout))
            }
        }
    }
}
