//! Tag-length-value fields: `id` (2 digits) + length (2 digits) + value.

use crate::error::PixError;

pub const MAX_VALUE_LEN: usize = 99;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvField {
    pub id: String,
    pub value: String,
}

impl TlvField {
    /// Decodes this field's value as a nested TLV sequence, as used by the
    /// merchant account information (`26`) and additional data (`62`) fields.
    pub fn nested(&self) -> Result<Vec<TlvField>, PixError> {
        decode_fields(&self.value)
    }
}

/// Formats a single field. Never truncates: values over 99 characters are an
/// error.
pub fn format_field(id: &str, value: &str) -> Result<String, PixError> {
    let len = value.chars().count();
    if len > MAX_VALUE_LEN {
        return Err(PixError::FieldTooLong {
            id: id.to_string(),
            len,
        });
    }
    let mut out = String::with_capacity(id.len() + 2 + value.len());
    push_field(&mut out, id, value);
    Ok(out)
}

/// Appends a field whose value is already known to fit.
pub(crate) fn push_field(out: &mut String, id: &str, value: &str) {
    let len = value.chars().count();
    debug_assert_eq!(id.len(), 2);
    debug_assert!(len <= MAX_VALUE_LEN, "field {id} value too long: {len}");
    out.push_str(id);
    out.push_str(&format!("{len:02}"));
    out.push_str(value);
}

/// Parses a flat TLV sequence. Nested values are left as raw strings; see
/// [`TlvField::nested`].
pub fn decode_fields(input: &str) -> Result<Vec<TlvField>, PixError> {
    let mut fields = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        let (id, after_id) = split_chars(rest, 2)
            .ok_or_else(|| PixError::Decode(format!("truncated field header at '{rest}'")))?;
        let (len, after_len) = split_chars(after_id, 2)
            .ok_or_else(|| PixError::Decode(format!("truncated length for field {id}")))?;

        if !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PixError::Decode(format!("field id '{id}' is not numeric")));
        }
        if !len.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PixError::Decode(format!("length '{len}' of field {id} is not numeric")));
        }
        let len: usize = len
            .parse()
            .map_err(|_| PixError::Decode(format!("length '{len}' of field {id} is not numeric")))?;

        let (value, remaining) = split_chars(after_len, len).ok_or_else(|| {
            PixError::Decode(format!("field {id} declares {len} characters past end of input"))
        })?;

        fields.push(TlvField {
            id: id.to_string(),
            value: value.to_string(),
        });
        rest = remaining;
    }

    Ok(fields)
}

/// Splits off the first `n` characters, or `None` if `s` is shorter.
fn split_chars(s: &str, n: usize) -> Option<(&str, &str)> {
    if n == 0 {
        return Some(("", s));
    }
    let mut indices = s.char_indices().map(|(i, _)| i).chain(std::iter::once(s.len()));
    let end = indices.nth(n)?;
    Some(s.split_at(end))
}
