use crate::error::DispatchError;
use crate::schema::ParamBag;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Builds an unsigned transaction for `account` and returns it base64-encoded.
///
/// The engine treats implementations as opaque; they may hit the network and
/// may fail. Every failure is turned into an error envelope by the dispatcher.
#[async_trait]
pub trait TransactionBuilder: Send + Sync {
    async fn create(
        &self,
        kind: &str,
        account: &str,
        params: &ParamBag,
    ) -> Result<String, DispatchError>;
}

/// Development stand-in that encodes the build request itself instead of a
/// real transaction. Lets the whole flow run without a chain connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadEchoBuilder;

#[async_trait]
impl TransactionBuilder for PayloadEchoBuilder {
    async fn create(
        &self,
        kind: &str,
        account: &str,
        params: &ParamBag,
    ) -> Result<String, DispatchError> {
        let payload = serde_json::json!({
            "kind": kind,
            "account": account,
            "params": params,
        });
        let bytes = serde_json::to_vec(&payload).map_err(|e| DispatchError::Build(e.to_string()))?;
        Ok(STANDARD.encode(bytes))
    }
}
