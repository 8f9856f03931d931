//! BR Code ("PIX copia e cola") payload builder.
//!
//! A payload is a sequence of TLV fields in a fixed order, terminated by the
//! CRC field `63` whose value is the CRC16/CCITT-FALSE of everything before
//! it, including the `6304` prefix of the CRC field itself.

use crate::error::PixError;
use crate::models::payment::PixPaymentRequest;
use crate::services::crc16::checksum_hex;
use crate::services::tlv::{decode_fields, push_field, TlvField};
use crate::utils::text::truncate_chars;

pub const ID_PAYLOAD_FORMAT: &str = "00";
pub const ID_MERCHANT_ACCOUNT: &str = "26";
pub const ID_MERCHANT_CATEGORY: &str = "52";
pub const ID_CURRENCY: &str = "53";
pub const ID_AMOUNT: &str = "54";
pub const ID_COUNTRY: &str = "58";
pub const ID_MERCHANT_NAME: &str = "59";
pub const ID_MERCHANT_CITY: &str = "60";
pub const ID_ADDITIONAL_DATA: &str = "62";
pub const ID_CRC: &str = "63";

// Subcampos do 26 e do 62
pub const ID_GUI: &str = "00";
pub const ID_PIX_KEY: &str = "01";
pub const ID_TRANSACTION_ID: &str = "05";

pub const PAYLOAD_FORMAT: &str = "01";
pub const PIX_GUI: &str = "br.gov.bcb.pix";
pub const MERCHANT_CATEGORY: &str = "0000";
/// ISO 4217 code for BRL.
pub const CURRENCY_BRL: &str = "986";
pub const COUNTRY: &str = "BR";

pub const MAX_MERCHANT_NAME_LEN: usize = 25;
pub const MAX_MERCHANT_CITY_LEN: usize = 15;

/// `63` + length `04`, the prefix the checksum covers.
pub const CRC_PREFIX: &str = "6304";
const CRC_HEX_LEN: usize = 4;

/// Top-level field order of every payload this builder emits.
pub const FIELD_ORDER: [&str; 10] = [
    ID_PAYLOAD_FORMAT,
    ID_MERCHANT_ACCOUNT,
    ID_MERCHANT_CATEGORY,
    ID_CURRENCY,
    ID_AMOUNT,
    ID_COUNTRY,
    ID_MERCHANT_NAME,
    ID_MERCHANT_CITY,
    ID_ADDITIONAL_DATA,
    ID_CRC,
];

/// Builds the payload up to and including `6304`, ready for the checksum.
pub fn assemble(request: &PixPaymentRequest) -> String {
    let mut merchant_account = String::with_capacity(99);
    push_field(&mut merchant_account, ID_GUI, PIX_GUI);
    push_field(&mut merchant_account, ID_PIX_KEY, request.pix_key());

    let mut additional_data = String::with_capacity(29);
    push_field(&mut additional_data, ID_TRANSACTION_ID, request.transaction_id());

    let amount = request.amount().to_string();

    let mut payload = String::with_capacity(256);
    push_field(&mut payload, ID_PAYLOAD_FORMAT, PAYLOAD_FORMAT);
    push_field(&mut payload, ID_MERCHANT_ACCOUNT, &merchant_account);
    push_field(&mut payload, ID_MERCHANT_CATEGORY, MERCHANT_CATEGORY);
    push_field(&mut payload, ID_CURRENCY, CURRENCY_BRL);
    push_field(&mut payload, ID_AMOUNT, &amount);
    push_field(&mut payload, ID_COUNTRY, COUNTRY);
    push_field(
        &mut payload,
        ID_MERCHANT_NAME,
        truncate_chars(request.merchant_name(), MAX_MERCHANT_NAME_LEN),
    );
    push_field(
        &mut payload,
        ID_MERCHANT_CITY,
        truncate_chars(request.merchant_city(), MAX_MERCHANT_CITY_LEN),
    );
    push_field(&mut payload, ID_ADDITIONAL_DATA, &additional_data);
    payload.push_str(CRC_PREFIX);
    payload
}

/// The complete "copia e cola" payload: assembled fields plus checksum.
pub fn build_payload(request: &PixPaymentRequest) -> String {
    let mut payload = assemble(request);
    let crc = checksum_hex(&payload);
    payload.push_str(&crc);
    payload
}

/// Checks that `payload` ends in a CRC field whose value matches the
/// checksum of everything before it, and returns the decoded top-level
/// fields (CRC field included).
pub fn verify_payload(payload: &str) -> Result<Vec<TlvField>, PixError> {
    let payload = payload.trim();
    if payload.len() < CRC_PREFIX.len() + CRC_HEX_LEN || !payload.is_char_boundary(payload.len() - CRC_HEX_LEN) {
        return Err(PixError::Decode("payload too short to carry a checksum".to_string()));
    }

    let (covered, found) = payload.split_at(payload.len() - CRC_HEX_LEN);
    if !covered.ends_with(CRC_PREFIX) {
        return Err(PixError::Decode("payload does not end with a CRC field".to_string()));
    }

    let fields = decode_fields(payload)?;
    match fields.last() {
        Some(last) if last.id == ID_CRC && last.value.len() == CRC_HEX_LEN => {}
        _ => return Err(PixError::Decode("CRC field is not the last field".to_string())),
    }

    let expected = checksum_hex(covered);
    if !expected.eq_ignore_ascii_case(found) {
        return Err(PixError::ChecksumMismatch {
            expected,
            found: found.to_string(),
        });
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::money::Amount;

    const GOLDEN: &str = "00020126330014br.gov.bcb.pix011107772321112520400005303986540510.005802BR5920Kaua Henrique S De A6009SAO PAULO62070503***63044CA5";

    fn request(cents: u64) -> PixPaymentRequest {
        PixPaymentRequest::new(
            "07772321112",
            "Kaua Henrique S De A",
            "SAO PAULO",
            Amount::from_cents(cents).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_golden_vector() {
        assert_eq!(build_payload(&request(1000)), GOLDEN);
    }

    #[test]
    fn test_assemble_ends_with_crc_prefix() {
        let assembled = assemble(&request(1000));
        assert!(assembled.ends_with("62070503***6304"));
        assert_eq!(&GOLDEN[..GOLDEN.len() - 4], assembled);
    }

    #[test]
    fn test_amount_field() {
        assert!(build_payload(&request(700)).contains("54047.00"));
        assert!(build_payload(&request(5)).contains("54040.05"));
        assert!(build_payload(&request(0)).contains("54040.00"));
    }

    #[test]
    fn test_truncates_merchant_name_and_city() {
        let request = PixPaymentRequest::new(
            "07772321112",
            "Lanchonete Sabor Da Casa Ltda ME",
            "RIBEIRAO PRETO SP",
            Amount::from_cents(1000).unwrap(),
        )
        .unwrap();
        let payload = build_payload(&request);

        assert_eq!(
            payload,
            "00020126330014br.gov.bcb.pix011107772321112520400005303986540510.005802BR5925Lanchonete Sabor Da Casa 6015RIBEIRAO PRETO 62070503***6304B9E1"
        );
    }

    #[test]
    fn test_transaction_id() {
        let request = PixPaymentRequest::new(
            "loja@example.com",
            "Padaria Central",
            "CAMPINAS",
            Amount::from_cents(4250).unwrap(),
        )
        .unwrap()
        .with_transaction_id("PEDIDO123")
        .unwrap();

        assert_eq!(
            build_payload(&request),
            "00020126380014br.gov.bcb.pix0116loja@example.com520400005303986540542.505802BR5915Padaria Central6008CAMPINAS62130509PEDIDO1236304A92F"
        );
    }

    #[test]
    fn test_verify_accepts_golden_and_lowercase_crc() {
        let fields = verify_payload(GOLDEN).unwrap();
        let ids: Vec<&str> = fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, FIELD_ORDER);

        let lower = format!("{}4ca5", &GOLDEN[..GOLDEN.len() - 4]);
        assert!(verify_payload(&lower).is_ok());
    }

    #[test]
    fn test_verify_rejects_tampering() {
        let tampered = GOLDEN.replace("10.00", "99.00");
        assert_eq!(
            verify_payload(&tampered),
            Err(PixError::ChecksumMismatch {
                expected: checksum_hex(&tampered[..tampered.len() - 4]),
                found: "4CA5".to_string(),
            })
        );

        assert!(matches!(verify_payload("6304"), Err(PixError::Decode(_))));
        assert!(matches!(verify_payload(&GOLDEN[..GOLDEN.len() - 1]), Err(PixError::Decode(_))));
        assert!(matches!(verify_payload("01086304ABCD"), Err(PixError::Decode(_))));
    }
}
