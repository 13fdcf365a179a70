use crate::error::DispatchError;
use crate::resolver::placeholder_name;
use crate::schema::ParamBag;
use serde_json::Value;

/// Address token template authors use before filling in a real address.
/// It passes format checks untouched.
pub const RESERVED_ADDRESS_TOKEN: &str = "placeholder";

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const ADDRESS_LENGTH: std::ops::RangeInclusive<usize> = 32..=44;

const SOL_DECIMALS: u32 = 9;
const DEFAULT_TOKEN_DECIMALS: u32 = 9;
const MAX_DECIMALS: u32 = 18;

/// The transaction kinds the engine knows how to check before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    TransferSol,
    TransferToken,
    CreateToken,
    MintNft,
    /// Anything else is passed to the builder unchecked.
    Other(String),
}

impl TransactionKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "transfer" | "transferSol" | "transfer-sol" => TransactionKind::TransferSol,
            "transferToken" | "transfer-token" | "transferSpl" => TransactionKind::TransferToken,
            "createToken" | "create-token" => TransactionKind::CreateToken,
            "mintNft" | "mint-nft" => TransactionKind::MintNft,
            other => TransactionKind::Other(other.to_string()),
        }
    }

    /// The canonical tag handed to the transaction builder.
    pub fn tag(&self) -> &str {
        match self {
            TransactionKind::TransferSol => "transfer",
            TransactionKind::TransferToken => "transferToken",
            TransactionKind::CreateToken => "createToken",
            TransactionKind::MintNft => "mintNft",
            TransactionKind::Other(tag) => tag,
        }
    }

    /// Checks required fields and formats for this kind.
    pub fn validate(&self, params: &ParamBag) -> Result<(), DispatchError> {
        match self {
            TransactionKind::TransferSol => {
                require_address(self, params, "recipient")?;
                require_amount(self, params, "amount", SOL_DECIMALS)?;
            }
            TransactionKind::TransferToken => {
                require_address(self, params, "mint")?;
                require_address(self, params, "recipient")?;
                let decimals = decimals(params)?;
                require_amount(self, params, "amount", decimals)?;
            }
            TransactionKind::CreateToken => {
                require_text(self, params, "name")?;
                require_text(self, params, "symbol")?;
                let decimals = decimals(params)?;
                require_amount(self, params, "initialSupply", decimals)?;
            }
            TransactionKind::MintNft => {
                require_text(self, params, "name")?;
                require_text(self, params, "uri")?;
            }
            TransactionKind::Other(_) => {}
        }
        Ok(())
    }

    /// A one-line human description, e.g. `Transfer 0.5 SOL to <address>`.
    pub fn summary(&self, params: &ParamBag) -> String {
        let field = |name: &str| display(params.get(name));
        match self {
            TransactionKind::TransferSol => {
                format!("Transfer {} SOL to {}", field("amount"), field("recipient"))
            }
            TransactionKind::TransferToken => format!(
                "Transfer {} tokens of {} to {}",
                field("amount"),
                field("mint"),
                field("recipient")
            ),
            TransactionKind::CreateToken => format!(
                "Create token {} ({}) with an initial supply of {}",
                field("name"),
                field("symbol"),
                field("initialSupply")
            ),
            TransactionKind::MintNft => format!("Mint NFT {}", field("name")),
            TransactionKind::Other(tag) => format!("Approve the {} transaction", tag),
        }
    }
}

/// Whether `text` looks like a base58 account address.
pub fn is_valid_address(text: &str) -> bool {
    ADDRESS_LENGTH.contains(&text.len()) && text.chars().all(|c| BASE58_ALPHABET.contains(c))
}

/// Parses a positive amount and checks that it still fits a `u64` once scaled
/// by `10^decimals`. Returns the scaled integer amount.
pub fn scaled_amount(value: &Value, decimals: u32) -> Option<u64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !amount.is_finite() || amount <= 0.0 {
        return None;
    }
    let scaled = (amount * 10f64.powi(decimals as i32)).round();
    if scaled < 1.0 || scaled >= u64::MAX as f64 {
        return None;
    }
    Some(scaled as u64)
}

fn display(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "?".to_string(),
        Some(other) => other.to_string(),
    }
}

/// A field is present when it is not null, not blank, and not a placeholder
/// that was never resolved.
fn present<'a>(params: &'a ParamBag, field: &str) -> Option<&'a Value> {
    match params.get(field)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() || placeholder_name(s).is_some() => None,
        value => Some(value),
    }
}

fn missing(kind: &TransactionKind, field: &str) -> DispatchError {
    DispatchError::MissingField {
        kind: kind.tag().to_string(),
        field: field.to_string(),
    }
}

fn require_text(kind: &TransactionKind, params: &ParamBag, field: &str) -> Result<(), DispatchError> {
    present(params, field).map(|_| ()).ok_or_else(|| missing(kind, field))
}

fn require_address(
    kind: &TransactionKind,
    params: &ParamBag,
    field: &str,
) -> Result<(), DispatchError> {
    let value = present(params, field).ok_or_else(|| missing(kind, field))?;
    match value.as_str() {
        Some(RESERVED_ADDRESS_TOKEN) => Ok(()),
        Some(text) if is_valid_address(text) => Ok(()),
        _ => Err(DispatchError::InvalidAddress {
            field: field.to_string(),
            value: display(Some(value)),
        }),
    }
}

fn require_amount(
    kind: &TransactionKind,
    params: &ParamBag,
    field: &str,
    decimals: u32,
) -> Result<(), DispatchError> {
    let value = present(params, field).ok_or_else(|| missing(kind, field))?;
    scaled_amount(value, decimals)
        .map(|_| ())
        .ok_or_else(|| DispatchError::InvalidAmount {
            field: field.to_string(),
            value: display(Some(value)),
        })
}

fn decimals(params: &ParamBag) -> Result<u32, DispatchError> {
    let Some(value) = present(params, "decimals") else {
        return Ok(DEFAULT_TOKEN_DECIMALS);
    };
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match parsed {
        Some(d) if d <= MAX_DECIMALS as u64 => Ok(d as u32),
        _ => Err(DispatchError::InvalidParameter {
            field: "decimals".to_string(),
            message: format!("expected an integer between 0 and {}", MAX_DECIMALS),
        }),
    }
}
