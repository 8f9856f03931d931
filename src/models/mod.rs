pub mod order;
pub mod payment;

pub use order::{cart_total, OrderItem, OrderSubmission};
pub use payment::{PixPaymentRequest, DEFAULT_TRANSACTION_ID};
