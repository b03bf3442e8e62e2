//! Composite name codec
//!
//! ```text
//! Composite Layout:
//! ┌─────────────────┬──────────────────┬─────────────┐
//! │ Length (u16 BE) │ Component bytes  │ EOC (1 byte)│  × components
//! └─────────────────┴──────────────────┴─────────────┘
//! ```
//!
//! The end-of-component byte is `0x00` for stored names. The last component
//! of a slice boundary instead carries `0x01` (sorts above every name with
//! that prefix) or `0xFF` (sorts below), so a prefix can bound a slice.

use crate::context::{PackContext, SliceEnd};
use crate::data_type::DataType;
use byteorder::{BigEndian, ByteOrder};
use cassia_core::{CassiaError, CassiaResult, Value};
use std::cmp::Ordering;

const EOC_EQUAL: u8 = 0x00;
const EOC_HIGH: u8 = 0x01;
const EOC_LOW: u8 = 0xFF;

/// One decoded component: payload and end-of-component byte
struct Component<'a> {
    bytes: &'a [u8],
    eoc: u8,
}

pub(crate) fn pack(
    type_name: &str,
    types: &[DataType],
    value: &Value,
    ctx: PackContext,
) -> CassiaResult<Vec<u8>> {
    let components = match value {
        Value::Composite(c) => c,
        other => {
            return Err(CassiaError::encode(
                type_name,
                format!("expected Composite, got {}", other.type_name()),
            ))
        }
    };
    let boundary = ctx.boundary();
    if components.len() > types.len() {
        return Err(CassiaError::encode(
            type_name,
            format!(
                "{} components given, type has {}",
                components.len(),
                types.len()
            ),
        ));
    }
    if components.is_empty() && boundary.is_none() {
        return Err(CassiaError::encode(type_name, "composite has no components"));
    }

    let mut out = Vec::new();
    let last = components.len().saturating_sub(1);
    for (i, (component, component_type)) in components.iter().zip(types).enumerate() {
        let is_last = i == last;
        let component_ctx = if is_last { ctx } else { PackContext::name() };
        let bytes = component_type.pack(component, component_ctx)?;
        let len = u16::try_from(bytes.len()).map_err(|_| {
            CassiaError::encode(
                type_name,
                format!("component {} is {} bytes, limit is 65535", i, bytes.len()),
            )
        })?;
        let eoc = match boundary {
            Some(end) if is_last => {
                if end.sorts_high() {
                    EOC_HIGH
                } else if matches!(end, SliceEnd::Finish { .. }) {
                    EOC_LOW
                } else {
                    EOC_EQUAL
                }
            }
            _ => EOC_EQUAL,
        };
        let mut header = [0u8; 2];
        BigEndian::write_u16(&mut header, len);
        out.extend_from_slice(&header);
        out.extend_from_slice(&bytes);
        out.push(eoc);
    }
    Ok(out)
}

fn split<'a>(type_name: &str, mut bytes: &'a [u8]) -> CassiaResult<Vec<Component<'a>>> {
    let mut components = Vec::new();
    while !bytes.is_empty() {
        if bytes.len() < 2 {
            return Err(CassiaError::decode(type_name, "truncated component length"));
        }
        let len = BigEndian::read_u16(&bytes[0..2]) as usize;
        let end = 2 + len;
        if bytes.len() < end + 1 {
            return Err(CassiaError::decode(
                type_name,
                format!(
                    "component {} declares {} bytes, {} available",
                    components.len(),
                    len,
                    bytes.len().saturating_sub(3)
                ),
            ));
        }
        components.push(Component {
            bytes: &bytes[2..end],
            eoc: bytes[end],
        });
        bytes = &bytes[end + 1..];
    }
    Ok(components)
}

pub(crate) fn unpack(type_name: &str, types: &[DataType], bytes: &[u8]) -> CassiaResult<Value> {
    if bytes.is_empty() {
        return Err(CassiaError::decode(type_name, "composite has no components"));
    }
    let components = split(type_name, bytes)?;
    if components.len() > types.len() {
        return Err(CassiaError::decode(
            type_name,
            format!(
                "{} components found, type has {}",
                components.len(),
                types.len()
            ),
        ));
    }
    let values = components
        .iter()
        .zip(types)
        .map(|(c, t)| t.unpack(c.bytes, true))
        .collect::<CassiaResult<Vec<_>>>()?;
    Ok(Value::Composite(values))
}

pub(crate) fn compare(
    type_name: &str,
    types: &[DataType],
    a: &[u8],
    b: &[u8],
) -> CassiaResult<Ordering> {
    let (ca, cb) = (split(type_name, a)?, split(type_name, b)?);
    for ((x, y), t) in ca.iter().zip(cb.iter()).zip(types) {
        let ord = t.compare(x.bytes, y.bytes)?;
        if ord != Ordering::Equal {
            return Ok(ord);
        }
        let eoc = (x.eoc as i8).cmp(&(y.eoc as i8));
        if eoc != Ordering::Equal {
            return Ok(eoc);
        }
    }
    Ok(ca.len().cmp(&cb.len()))
}
