pub mod checkout;
pub mod crc16;
pub mod pix_payload;
pub mod qr_code;
pub mod tlv;

pub use checkout::{Checkout, PixCharge};
pub use pix_payload::{assemble, build_payload, verify_payload};
pub use tlv::{decode_fields, format_field, TlvField};
