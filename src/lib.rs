//! PIX "copia e cola" (BR Code) payloads for the MenuGo storefront checkout.
//!
//! ```
//! use menugo_pix::{build_payload, Amount, PixPaymentRequest};
//!
//! let request = PixPaymentRequest::new(
//!     "07772321112",
//!     "Kaua Henrique S De A",
//!     "SAO PAULO",
//!     Amount::from_reais(10.0)?,
//! )?;
//! assert!(build_payload(&request).ends_with("63044CA5"));
//! # Ok::<(), menugo_pix::PixError>(())
//! ```

pub mod app;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use app::config::{Config, MerchantConfig, QrCodeConfig};
pub use error::{ConfigError, PaymentField, PixError};
pub use models::{OrderItem, OrderSubmission, PixPaymentRequest};
pub use services::{build_payload, verify_payload, Checkout, PixCharge};
pub use utils::Amount;
