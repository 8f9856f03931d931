use serde::Serialize;

use crate::error::{PaymentField, PixError};
use crate::utils::money::Amount;
use crate::utils::text::{fold_to_ascii, is_printable_ascii};

/// Transaction id meaning "no specific id".
pub const DEFAULT_TRANSACTION_ID: &str = "***";

/// Longest key that still lets field 26 (`0014br.gov.bcb.pix01NN<key>`) fit
/// in 99 characters.
pub const MAX_PIX_KEY_LEN: usize = 77;
pub const MAX_TRANSACTION_ID_LEN: usize = 25;

/// A validated PIX charge request. Only obtainable through [`PixPaymentRequest::new`],
/// so every instance encodes without failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PixPaymentRequest {
    pix_key: String,
    merchant_name: String,
    merchant_city: String,
    amount: Amount,
    transaction_id: String,
}

impl PixPaymentRequest {
    /// Validates the boundary inputs. Merchant name and city are folded to
    /// ASCII here; their truncation to 25/15 characters happens silently when
    /// the payload is encoded.
    pub fn new(
        pix_key: &str,
        merchant_name: &str,
        merchant_city: &str,
        amount: Amount,
    ) -> Result<Self, PixError> {
        Ok(Self {
            pix_key: validate_pix_key(pix_key)?,
            merchant_name: validate_merchant_text(PaymentField::MerchantName, merchant_name)?,
            merchant_city: validate_merchant_text(PaymentField::MerchantCity, merchant_city)?,
            amount,
            transaction_id: DEFAULT_TRANSACTION_ID.to_string(),
        })
    }

    pub fn with_transaction_id(mut self, transaction_id: &str) -> Result<Self, PixError> {
        self.transaction_id = validate_transaction_id(transaction_id)?;
        Ok(self)
    }

    pub fn pix_key(&self) -> &str {
        &self.pix_key
    }

    pub fn merchant_name(&self) -> &str {
        &self.merchant_name
    }

    pub fn merchant_city(&self) -> &str {
        &self.merchant_city
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }
}

fn validate_pix_key(pix_key: &str) -> Result<String, PixError> {
    if pix_key.is_empty() {
        return Err(PixError::invalid(PaymentField::PixKey, "must not be empty"));
    }
    if !is_printable_ascii(pix_key) {
        return Err(PixError::invalid(PaymentField::PixKey, "must be printable ASCII"));
    }
    if pix_key.len() > MAX_PIX_KEY_LEN {
        return Err(PixError::invalid(
            PaymentField::PixKey,
            format!("has {} characters, at most {MAX_PIX_KEY_LEN} allowed", pix_key.len()),
        ));
    }
    Ok(pix_key.to_string())
}

fn validate_merchant_text(field: PaymentField, text: &str) -> Result<String, PixError> {
    let folded = fold_to_ascii(text.trim())
        .ok_or_else(|| PixError::invalid(field, "contains characters without an ASCII form"))?;
    if folded.is_empty() {
        return Err(PixError::invalid(field, "must not be empty"));
    }
    Ok(folded)
}

fn validate_transaction_id(transaction_id: &str) -> Result<String, PixError> {
    if transaction_id == DEFAULT_TRANSACTION_ID {
        return Ok(transaction_id.to_string());
    }
    if transaction_id.is_empty() || transaction_id.len() > MAX_TRANSACTION_ID_LEN {
        return Err(PixError::invalid(
            PaymentField::TransactionId,
            format!("must have 1 to {MAX_TRANSACTION_ID_LEN} characters"),
        ));
    }
    if !transaction_id.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(PixError::invalid(
            PaymentField::TransactionId,
            "must be alphanumeric or '***'",
        ));
    }
    Ok(transaction_id.to_string())
}
