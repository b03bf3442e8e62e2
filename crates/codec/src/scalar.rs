//! Fixed-width and text codecs
//!
//! ```text
//! BooleanType   1 byte   0x00 | 0x01
//! Int32Type     4 bytes  big-endian two's complement
//! LongType      8 bytes  big-endian two's complement (also counters)
//! DateType      8 bytes  big-endian milliseconds since epoch
//! FloatType     4 bytes  big-endian IEEE-754
//! DoubleType    8 bytes  big-endian IEEE-754
//! IntegerType   1..=8    minimal big-endian two's complement
//! BytesType / AsciiType / UTF8Type: raw bytes
//! ```

use byteorder::{BigEndian, ByteOrder};
use cassia_core::{CassiaError, CassiaResult, Value};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

fn wrong_value(type_name: &str, expected: &str, value: &Value) -> CassiaError {
    CassiaError::encode(
        type_name,
        format!("expected {}, got {}", expected, value.type_name()),
    )
}

fn expect_len(type_name: &str, bytes: &[u8], len: usize) -> CassiaResult<()> {
    if bytes.len() != len {
        return Err(CassiaError::decode(
            type_name,
            format!("expected {} byte(s), got {}", len, bytes.len()),
        ));
    }
    Ok(())
}

// ============================================================================
// Boolean
// ============================================================================

pub(crate) fn pack_bool(type_name: &str, value: &Value) -> CassiaResult<Vec<u8>> {
    match value {
        Value::Bool(b) => Ok(vec![u8::from(*b)]),
        other => Err(wrong_value(type_name, "Bool", other)),
    }
}

pub(crate) fn unpack_bool(type_name: &str, bytes: &[u8]) -> CassiaResult<Value> {
    expect_len(type_name, bytes, 1)?;
    match bytes[0] {
        0x00 => Ok(Value::Bool(false)),
        0x01 => Ok(Value::Bool(true)),
        other => Err(CassiaError::decode(
            type_name,
            format!("invalid boolean byte 0x{:02x}", other),
        )),
    }
}

// ============================================================================
// Fixed-width integers
// ============================================================================

pub(crate) fn pack_i64(type_name: &str, value: &Value) -> CassiaResult<Vec<u8>> {
    match value {
        Value::Int(i) => Ok(i.to_be_bytes().to_vec()),
        other => Err(wrong_value(type_name, "Int", other)),
    }
}

pub(crate) fn read_i64(type_name: &str, bytes: &[u8]) -> CassiaResult<i64> {
    expect_len(type_name, bytes, 8)?;
    Ok(BigEndian::read_i64(bytes))
}

pub(crate) fn pack_i32(type_name: &str, value: &Value) -> CassiaResult<Vec<u8>> {
    match value {
        Value::Int(i) => {
            let narrow = i32::try_from(*i).map_err(|_| {
                CassiaError::encode(type_name, format!("{} does not fit in 32 bits", i))
            })?;
            Ok(narrow.to_be_bytes().to_vec())
        }
        other => Err(wrong_value(type_name, "Int", other)),
    }
}

pub(crate) fn read_i32(type_name: &str, bytes: &[u8]) -> CassiaResult<i32> {
    expect_len(type_name, bytes, 4)?;
    Ok(BigEndian::read_i32(bytes))
}

// ============================================================================
// Varint
// ============================================================================

/// Minimal two's complement, at least one byte
pub(crate) fn pack_varint(type_name: &str, value: &Value) -> CassiaResult<Vec<u8>> {
    let i = match value {
        Value::Int(i) => *i,
        other => return Err(wrong_value(type_name, "Int", other)),
    };
    let full = i.to_be_bytes();
    Ok(strip_sign_bytes(&full).to_vec())
}

pub(crate) fn unpack_varint(type_name: &str, bytes: &[u8]) -> CassiaResult<Value> {
    if bytes.is_empty() {
        return Err(CassiaError::decode(type_name, "empty varint"));
    }
    let minimal = strip_sign_bytes(bytes);
    if minimal.len() > 8 {
        return Err(CassiaError::decode(
            type_name,
            format!("varint of {} bytes exceeds 64 bits", minimal.len()),
        ));
    }
    let fill = if minimal[0] & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut buf = [fill; 8];
    buf[8 - minimal.len()..].copy_from_slice(minimal);
    Ok(Value::Int(i64::from_be_bytes(buf)))
}

/// Drop redundant leading sign-extension bytes
fn strip_sign_bytes(bytes: &[u8]) -> &[u8] {
    let mut start = 0;
    while start + 1 < bytes.len() {
        let (b, next) = (bytes[start], bytes[start + 1]);
        let redundant = (b == 0x00 && next & 0x80 == 0) || (b == 0xFF && next & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    &bytes[start..]
}

/// Order varints of any length without decoding them
pub(crate) fn compare_varint(a: &[u8], b: &[u8]) -> Ordering {
    let (a, b) = (strip_sign_bytes(a), strip_sign_bytes(b));
    let a_neg = a[0] & 0x80 != 0;
    let b_neg = b[0] & 0x80 != 0;
    match (a_neg, b_neg) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
        (true, true) => b.len().cmp(&a.len()).then_with(|| a.cmp(b)),
    }
}

// ============================================================================
// Floating point
// ============================================================================

pub(crate) fn pack_f32(type_name: &str, value: &Value) -> CassiaResult<Vec<u8>> {
    match value {
        Value::Float(f) => Ok(f.to_be_bytes().to_vec()),
        other => Err(wrong_value(type_name, "Float", other)),
    }
}

pub(crate) fn read_f32(type_name: &str, bytes: &[u8]) -> CassiaResult<f32> {
    expect_len(type_name, bytes, 4)?;
    Ok(BigEndian::read_f32(bytes))
}

pub(crate) fn pack_f64(type_name: &str, value: &Value) -> CassiaResult<Vec<u8>> {
    match value {
        Value::Double(f) => Ok(f.to_be_bytes().to_vec()),
        other => Err(wrong_value(type_name, "Double", other)),
    }
}

pub(crate) fn read_f64(type_name: &str, bytes: &[u8]) -> CassiaResult<f64> {
    expect_len(type_name, bytes, 8)?;
    Ok(BigEndian::read_f64(bytes))
}

// ============================================================================
// Date
// ============================================================================

/// Sub-millisecond precision is dropped
pub(crate) fn pack_date(type_name: &str, value: &Value) -> CassiaResult<Vec<u8>> {
    match value {
        Value::Date(d) => Ok(d.timestamp_millis().to_be_bytes().to_vec()),
        other => Err(wrong_value(type_name, "Date", other)),
    }
}

pub(crate) fn unpack_date(type_name: &str, bytes: &[u8]) -> CassiaResult<Value> {
    let millis = read_i64(type_name, bytes)?;
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(Value::Date)
        .ok_or_else(|| CassiaError::decode(type_name, format!("{} ms is out of range", millis)))
}

// ============================================================================
// Text and bytes
// ============================================================================

pub(crate) fn pack_bytes(type_name: &str, value: &Value) -> CassiaResult<Vec<u8>> {
    match value {
        Value::Bytes(b) => Ok(b.clone()),
        Value::Text(s) => Ok(s.as_bytes().to_vec()),
        other => Err(wrong_value(type_name, "Bytes or Text", other)),
    }
}

pub(crate) fn pack_ascii(type_name: &str, value: &Value) -> CassiaResult<Vec<u8>> {
    match value {
        Value::Text(s) if s.is_ascii() => Ok(s.as_bytes().to_vec()),
        Value::Text(_) => Err(CassiaError::encode(type_name, "text contains non-ASCII characters")),
        other => Err(wrong_value(type_name, "Text", other)),
    }
}

pub(crate) fn unpack_ascii(type_name: &str, bytes: &[u8]) -> CassiaResult<Value> {
    if !bytes.is_ascii() {
        return Err(CassiaError::decode(type_name, "bytes are not ASCII"));
    }
    unpack_utf8(type_name, bytes)
}

pub(crate) fn pack_utf8(type_name: &str, value: &Value) -> CassiaResult<Vec<u8>> {
    match value {
        Value::Text(s) => Ok(s.as_bytes().to_vec()),
        other => Err(wrong_value(type_name, "Text", other)),
    }
}

pub(crate) fn unpack_utf8(type_name: &str, bytes: &[u8]) -> CassiaResult<Value> {
    std::str::from_utf8(bytes)
        .map(|s| Value::Text(s.to_string()))
        .map_err(|e| CassiaError::decode(type_name, format!("invalid UTF-8: {}", e)))
}
