use std::fmt;

use thiserror::Error;

/// Campo do pedido de pagamento que falhou na validação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentField {
    PixKey,
    MerchantName,
    MerchantCity,
    Amount,
    TransactionId,
}

impl fmt::Display for PaymentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentField::PixKey => "pix_key",
            PaymentField::MerchantName => "merchant_name",
            PaymentField::MerchantCity => "merchant_city",
            PaymentField::Amount => "amount",
            PaymentField::TransactionId => "transaction_id",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PixError {
    #[error("Invalid payment request: {field}: {reason}")]
    InvalidPaymentRequest { field: PaymentField, reason: String },

    #[error("Field {id} value has {len} characters, at most 99 fit")]
    FieldTooLong { id: String, len: usize },

    #[error("Malformed payload: {0}")]
    Decode(String),

    #[error("Checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch { expected: String, found: String },

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Cart total overflows")]
    AmountOverflow,

    #[error("Invalid order: {0}")]
    InvalidOrder(String),
}

impl PixError {
    pub(crate) fn invalid(field: PaymentField, reason: impl Into<String>) -> Self {
        PixError::InvalidPaymentRequest {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid {key} value: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("Missing required setting {0}")]
    Missing(&'static str),
}
