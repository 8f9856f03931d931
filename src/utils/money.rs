// Utilitários para manipulação de valores monetários (centavos)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PaymentField, PixError};

/// Largest amount whose two-decimal rendering fits the 13 characters the
/// BR Code amount field allows (`9999999999.99`).
pub const MAX_AMOUNT_CENTS: u64 = 999_999_999_999;

/// Non-negative monetary amount in centavos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn from_cents(cents: u64) -> Result<Self, PixError> {
        if cents > MAX_AMOUNT_CENTS {
            return Err(PixError::invalid(
                PaymentField::Amount,
                format!("{} exceeds the maximum of {}", format_cents(cents), format_cents(MAX_AMOUNT_CENTS)),
            ));
        }
        Ok(Amount(cents))
    }

    /// Converts a floating amount in reais to centavos.
    ///
    /// Rounds half away from zero on the exact binary value of `reais`, so
    /// `19.999` becomes `20.00`, `0.125` becomes `0.13` and `1.005` (stored
    /// as `1.00499...`) becomes `1.00`.
    pub fn from_reais(reais: f64) -> Result<Self, PixError> {
        if !reais.is_finite() {
            return Err(PixError::invalid(PaymentField::Amount, "must be a finite number"));
        }
        if reais.is_sign_negative() && reais != 0.0 {
            return Err(PixError::invalid(PaymentField::Amount, "must not be negative"));
        }
        // Acima disso já estoura o limite; evita overflow no deslocamento.
        if reais >= 1e13 {
            return Err(PixError::invalid(PaymentField::Amount, "exceeds the maximum amount"));
        }
        Self::from_cents(round_to_cents(reais))
    }

    /// Parses operator-typed text such as `10`, `10.5`, `10,50` or `R$ 10,50`.
    pub fn parse(text: &str) -> Result<Self, PixError> {
        let cleaned = text.trim().trim_start_matches("R$").trim();
        if cleaned.is_empty() {
            return Err(PixError::invalid(PaymentField::Amount, "is empty"));
        }

        let (whole, fraction) = match cleaned.find(|c: char| c == '.' || c == ',') {
            Some(pos) => (&cleaned[..pos], Some(&cleaned[pos + 1..])),
            None => (cleaned, None),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        // Separador sem casas decimais ("10.") não é aceito
        let fraction_ok = fraction.map_or(true, |f| !f.is_empty() && f.len() <= 2 && all_digits(f));
        let fraction = fraction.unwrap_or("");
        if whole.is_empty() || !all_digits(whole) || !fraction_ok {
            return Err(PixError::invalid(
                PaymentField::Amount,
                format!("'{text}' is not a decimal amount with up to two fraction digits"),
            ));
        }

        let reais: u64 = whole
            .parse()
            .map_err(|_| PixError::invalid(PaymentField::Amount, "exceeds the maximum amount"))?;
        let centavos = match fraction.len() {
            0 => 0,
            1 => u64::from(fraction.as_bytes()[0] - b'0') * 10,
            _ => u64::from(fraction.as_bytes()[0] - b'0') * 10 + u64::from(fraction.as_bytes()[1] - b'0'),
        };

        let cents = reais
            .checked_mul(100)
            .and_then(|c| c.checked_add(centavos))
            .ok_or_else(|| PixError::invalid(PaymentField::Amount, "exceeds the maximum amount"))?;
        Self::from_cents(cents)
    }

    pub fn cents(self) -> u64 {
        self.0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0
            .checked_add(other.0)
            .filter(|c| *c <= MAX_AMOUNT_CENTS)
            .map(Amount)
    }

    pub fn checked_mul(self, quantity: u32) -> Option<Amount> {
        self.0
            .checked_mul(u64::from(quantity))
            .filter(|c| *c <= MAX_AMOUNT_CENTS)
            .map(Amount)
    }
}

impl TryFrom<u64> for Amount {
    type Error = PixError;

    fn try_from(cents: u64) -> Result<Self, Self::Error> {
        Amount::from_cents(cents)
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> u64 {
        amount.0
    }
}

/// Two-decimal rendering used inside the payload: `7.00`, `1234.56`.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_cents(self.0))
    }
}

pub fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// pt-BR currency display, e.g. `R$ 1.234,56`.
pub fn format_brl(amount: Amount) -> String {
    let reais = (amount.0 / 100).to_string();
    let mut grouped = String::with_capacity(reais.len() + reais.len() / 3);
    for (i, ch) in reais.chars().enumerate() {
        if i > 0 && (reais.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("R$ {},{:02}", grouped, amount.0 % 100)
}

/// Serde adapter for API fields that carry amounts as a JSON number in
/// reais (`"preco": 19.9`). Reading goes through [`Amount::from_reais`].
pub mod reais {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::Amount;

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(amount.0 as f64 / 100.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Amount::from_reais(value).map_err(de::Error::custom)
    }
}

/// Exact `round(reais * 100)` with ties away from zero. Caller guarantees
/// `0 <= reais < 1e13`.
fn round_to_cents(reais: f64) -> u64 {
    if reais == 0.0 {
        return 0;
    }

    let bits = reais.to_bits();
    let biased_exp = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    // reais == mantissa * 2^exp
    let (mantissa, exp) = if biased_exp == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased_exp - 1075)
    };

    let scaled = u128::from(mantissa) * 100;
    if exp >= 0 {
        // Só acontece para valores >= 2^52, já barrados pelo limite.
        return (scaled << exp) as u64;
    }

    let shift = (-exp) as u32;
    if shift >= 128 {
        return 0;
    }
    let quotient = scaled >> shift;
    let remainder = scaled - (quotient << shift);
    let half = 1u128 << (shift - 1);
    if remainder >= half {
        (quotient + 1) as u64
    } else {
        quotient as u64
    }
}
