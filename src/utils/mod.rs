pub mod money;
pub mod text;

pub use money::{format_brl, Amount, MAX_AMOUNT_CENTS};
