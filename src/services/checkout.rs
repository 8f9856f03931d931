use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::app::config::Config;
use crate::error::{ConfigError, PixError};
use crate::models::order::{cart_total, OrderItem};
use crate::models::payment::PixPaymentRequest;
use crate::services::pix_payload::build_payload;
use crate::services::qr_code::qr_code_url;
use crate::utils::money::{format_brl, Amount};

/// What the storefront shows after "Finalizar Pedido": the copy-paste
/// payload and a QR image of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PixCharge {
    pub payload: String,
    pub qr_code_url: String,
    pub amount: Amount,
    pub amount_display: String,
}

/// Turns cart totals into PIX charges for one configured merchant.
#[derive(Debug, Clone)]
pub struct Checkout {
    config: Config,
    qr_base: Url,
}

impl Checkout {
    /// Fails if the merchant identity could never produce a valid payload.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let qr_base = Url::parse(&config.qr_code.base_url).map_err(|e| ConfigError::InvalidValue {
            key: "qr_code.base_url",
            reason: e.to_string(),
        })?;

        let merchant = &config.merchant;
        PixPaymentRequest::new(
            &merchant.pix_key,
            &merchant.merchant_name,
            &merchant.merchant_city,
            Amount::ZERO,
        )
        .map_err(|e| ConfigError::InvalidValue {
            key: "merchant",
            reason: e.to_string(),
        })?;

        info!(
            "Checkout ready for merchant {} ({})",
            merchant.merchant_name, merchant.merchant_city
        );
        Ok(Self { config, qr_base })
    }

    pub fn payment_request(
        &self,
        amount: Amount,
        transaction_id: Option<&str>,
    ) -> Result<PixPaymentRequest, PixError> {
        let merchant = &self.config.merchant;
        let request = PixPaymentRequest::new(
            &merchant.pix_key,
            &merchant.merchant_name,
            &merchant.merchant_city,
            amount,
        )?;
        match transaction_id {
            Some(txid) => request.with_transaction_id(txid),
            None => Ok(request),
        }
    }

    pub fn charge_amount(
        &self,
        amount: Amount,
        transaction_id: Option<&str>,
    ) -> Result<PixCharge, PixError> {
        let request = self.payment_request(amount, transaction_id)?;
        let payload = build_payload(&request);
        let qr_code_url = qr_code_url(&self.qr_base, &payload, self.config.qr_code.size);

        debug!("Generated PIX payload: {}", payload);
        info!("PIX charge created: {}", format_brl(amount));

        Ok(PixCharge {
            payload,
            qr_code_url: qr_code_url.into(),
            amount,
            amount_display: format_brl(amount),
        })
    }

    /// Charges the cart total. Empty carts cannot be checked out.
    pub fn charge(
        &self,
        items: &[OrderItem],
        transaction_id: Option<&str>,
    ) -> Result<PixCharge, PixError> {
        if items.is_empty() {
            return Err(PixError::EmptyCart);
        }
        let total = cart_total(items)?;
        self.charge_amount(total, transaction_id)
    }
}
