//! UUID codecs and orderings
//!
//! All three UUID types store the 16 raw bytes. They differ in which UUIDs
//! they accept and in how they sort:
//!
//! - `TimeUUIDType`: version 1 only, ordered by embedded timestamp
//! - `LexicalUUIDType`: any version, ordered as two signed 64-bit halves
//! - `UUIDType`: any version, ordered by version, then time for version 1
//!
//! A TimeUUID can also be packed from an instant. Stored data gets a fresh
//! UUID with random clock sequence and node; a slice boundary gets the
//! lowest or highest UUID that can carry that instant.

use crate::context::PackContext;
use byteorder::{BigEndian, ByteOrder};
use cassia_core::{CassiaError, CassiaResult, Value};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use uuid::Uuid;

/// 100ns intervals between 1582-10-15 and 1970-01-01
const GREGORIAN_OFFSET: i64 = 0x01B2_1DD2_1381_4000;

/// Clock sequence and node of the lowest TimeUUID for an instant
const MIN_CLOCK_AND_NODE: [u8; 8] = [0x80; 8];

/// Clock sequence and node of the highest TimeUUID for an instant
const MAX_CLOCK_AND_NODE: [u8; 8] = [0x7F; 8];

fn read_uuid(type_name: &str, bytes: &[u8]) -> CassiaResult<Uuid> {
    Uuid::from_slice(bytes).map_err(|_| {
        CassiaError::decode(type_name, format!("expected 16 bytes, got {}", bytes.len()))
    })
}

pub(crate) fn pack_uuid(type_name: &str, value: &Value) -> CassiaResult<Vec<u8>> {
    match value {
        Value::Uuid(u) => Ok(u.as_bytes().to_vec()),
        other => Err(CassiaError::encode(
            type_name,
            format!("expected Uuid, got {}", other.type_name()),
        )),
    }
}

pub(crate) fn unpack_uuid(type_name: &str, bytes: &[u8]) -> CassiaResult<Value> {
    read_uuid(type_name, bytes).map(Value::Uuid)
}

pub(crate) fn pack_time_uuid(
    type_name: &str,
    value: &Value,
    ctx: PackContext,
) -> CassiaResult<Vec<u8>> {
    match value {
        Value::Uuid(u) if u.get_version_num() == 1 => Ok(u.as_bytes().to_vec()),
        Value::Uuid(u) => Err(CassiaError::encode(
            type_name,
            format!("expected a version 1 UUID, got version {}", u.get_version_num()),
        )),
        Value::Date(d) => {
            let tail = match ctx.boundary() {
                Some(end) if end.sorts_high() => MAX_CLOCK_AND_NODE,
                Some(_) => MIN_CLOCK_AND_NODE,
                None => random_clock_and_node(),
            };
            let uuid = time_uuid_from_date(type_name, d, tail)?;
            Ok(uuid.as_bytes().to_vec())
        }
        other => Err(CassiaError::encode(
            type_name,
            format!("expected Uuid or Date, got {}", other.type_name()),
        )),
    }
}

fn read_time_uuid(type_name: &str, bytes: &[u8]) -> CassiaResult<Uuid> {
    let uuid = read_uuid(type_name, bytes)?;
    if uuid.get_version_num() != 1 {
        return Err(CassiaError::decode(
            type_name,
            format!("expected a version 1 UUID, got version {}", uuid.get_version_num()),
        ));
    }
    Ok(uuid)
}

pub(crate) fn unpack_time_uuid(type_name: &str, bytes: &[u8]) -> CassiaResult<Value> {
    read_time_uuid(type_name, bytes).map(Value::Uuid)
}

fn random_clock_and_node() -> [u8; 8] {
    let random = Uuid::new_v4();
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&random.as_bytes()[8..]);
    // RFC 4122 variant
    tail[0] = (tail[0] & 0x3F) | 0x80;
    tail
}

fn time_uuid_from_date(
    type_name: &str,
    date: &DateTime<Utc>,
    clock_and_node: [u8; 8],
) -> CassiaResult<Uuid> {
    let ticks = date
        .timestamp_micros()
        .checked_mul(10)
        .and_then(|t| t.checked_add(GREGORIAN_OFFSET))
        .filter(|t| (0..1 << 60).contains(t))
        .ok_or_else(|| {
            CassiaError::encode(type_name, format!("{} cannot be stored in a TimeUUID", date))
        })? as u64;

    let mut bytes = [0u8; 16];
    BigEndian::write_u32(&mut bytes[0..4], (ticks & 0xFFFF_FFFF) as u32);
    BigEndian::write_u16(&mut bytes[4..6], ((ticks >> 32) & 0xFFFF) as u16);
    BigEndian::write_u16(&mut bytes[6..8], (((ticks >> 48) & 0x0FFF) as u16) | 0x1000);
    bytes[8..].copy_from_slice(&clock_and_node);
    Ok(Uuid::from_bytes(bytes))
}

/// 60-bit timestamp field of a version 1 UUID, in 100ns ticks
fn raw_ticks(bytes: &[u8; 16]) -> u64 {
    let time_low = u64::from(BigEndian::read_u32(&bytes[0..4]));
    let time_mid = u64::from(BigEndian::read_u16(&bytes[4..6]));
    let time_hi = u64::from(BigEndian::read_u16(&bytes[6..8]) & 0x0FFF);
    (time_hi << 48) | (time_mid << 32) | time_low
}

/// Microseconds since Unix epoch embedded in a version 1 UUID
///
/// Returns `None` for other versions.
pub fn time_uuid_micros(uuid: &Uuid) -> Option<i64> {
    if uuid.get_version_num() != 1 {
        return None;
    }
    let ticks = raw_ticks(uuid.as_bytes()) as i64;
    Some((ticks - GREGORIAN_OFFSET) / 10)
}

fn signed_bytes_cmp(a: &[u8], b: &[u8]) -> Ordering {
    a.iter()
        .map(|&x| x as i8)
        .cmp(b.iter().map(|&x| x as i8))
}

pub(crate) fn compare_time_uuid(type_name: &str, a: &[u8], b: &[u8]) -> CassiaResult<Ordering> {
    let (ua, ub) = (read_time_uuid(type_name, a)?, read_time_uuid(type_name, b)?);
    Ok(raw_ticks(ua.as_bytes())
        .cmp(&raw_ticks(ub.as_bytes()))
        .then_with(|| signed_bytes_cmp(a, b)))
}

pub(crate) fn compare_lexical_uuid(
    type_name: &str,
    a: &[u8],
    b: &[u8],
) -> CassiaResult<Ordering> {
    read_uuid(type_name, a)?;
    read_uuid(type_name, b)?;
    let msb = |x: &[u8]| BigEndian::read_i64(&x[0..8]);
    let lsb = |x: &[u8]| BigEndian::read_i64(&x[8..16]);
    Ok(msb(a).cmp(&msb(b)).then_with(|| lsb(a).cmp(&lsb(b))))
}

pub(crate) fn compare_any_uuid(type_name: &str, a: &[u8], b: &[u8]) -> CassiaResult<Ordering> {
    let (ua, ub) = (read_uuid(type_name, a)?, read_uuid(type_name, b)?);
    let (va, vb) = (ua.get_version_num(), ub.get_version_num());
    if va != vb {
        return Ok(va.cmp(&vb));
    }
    if va == 1 {
        return compare_time_uuid(type_name, a, b);
    }
    Ok(a.cmp(b))
}
