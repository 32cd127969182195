//! Primitive value I/O: one typed value, or a homogeneous array payload.
//!
//! A single String or Binary value is `i32` byte-count prefixed. An array
//! payload is an `i32` element count followed by raw little-endian
//! elements for fixed-width kinds, or by a packed block (`i32` byte
//! length, then varint-length-prefixed elements) for String and Binary.

use std::io::Read;

use bytes::{Buf, BufMut, Bytes};

use crate::array::ValueArray;
use crate::codec;
use crate::decimal::Decimal128;
use crate::error::FormatError;
use crate::temporal;
use crate::types::ValueKind;
use crate::value::Value;

/// Write one plain value in its primitive wire form.
///
/// Envelopes have no primitive form and are rejected; the streaming
/// writer demultiplexes them into sidebands before reaching this layer.
pub fn write_value(dst: &mut impl BufMut, value: &Value) -> Result<(), FormatError> {
    match value {
        Value::Bool(v) => codec::write_bool(dst, *v),
        Value::Int(v) => dst.put_i32_le(*v),
        Value::Long(v) => dst.put_i64_le(*v),
        Value::Float(v) => codec::write_f32(dst, *v),
        Value::Double(v) => codec::write_f64(dst, *v),
        Value::DateTime(v) => dst.put_i64_le(temporal::datetime_to_wire(*v)?),
        Value::Date(v) => dst.put_i64_le(temporal::date_to_wire(*v)?),
        Value::Time(v) => dst.put_i64_le(temporal::time_to_wire(*v)),
        Value::TimeSpan(v) => dst.put_i64_le(temporal::timespan_to_wire(*v)),
        Value::String(v) => codec::write_string(dst, v),
        Value::Binary(v) => {
            dst.put_i32_le(v.len() as i32);
            dst.put_slice(v);
        }
        Value::Decimal(v) => dst.put_slice(&v.to_le_bytes()),
        Value::Invalid | Value::Error(_) | Value::Replaced(_) => {
            return Err(FormatError::UnserializableValue);
        }
    }
    Ok(())
}

/// Read one value of the given kind in its primitive wire form.
pub fn read_value<R: Read>(src: &mut R, kind: ValueKind) -> Result<Value, FormatError> {
    let value = match kind {
        ValueKind::Bool => Value::Bool(codec::read_bool(src)?),
        ValueKind::Int => Value::Int(codec::read_i32(src)?),
        ValueKind::Long => Value::Long(codec::read_i64(src)?),
        ValueKind::Float => Value::Float(codec::read_f32(src)?),
        ValueKind::Double => Value::Double(codec::read_f64(src)?),
        ValueKind::DateTime => Value::DateTime(temporal::datetime_from_wire(codec::read_i64(src)?)?),
        ValueKind::Date => Value::Date(temporal::date_from_wire(codec::read_i64(src)?)?),
        ValueKind::Time => Value::Time(temporal::time_from_wire(codec::read_i64(src)?)),
        ValueKind::TimeSpan => Value::TimeSpan(temporal::timespan_from_wire(codec::read_i64(src)?)),
        ValueKind::String => Value::String(codec::read_string(src)?),
        ValueKind::Binary => {
            let len = codec::length_to_usize(codec::read_i32(src)?)?;
            Value::Binary(codec::read_blob(src, len)?)
        }
        ValueKind::Decimal => {
            let mut bytes = [0u8; 16];
            src.read_exact(&mut bytes).map_err(FormatError::from)?;
            Value::Decimal(Decimal128::from_le_bytes(bytes)?)
        }
        ValueKind::Unknown | ValueKind::UserDefined => {
            return Err(FormatError::UnknownValueType(kind.code()));
        }
    };
    Ok(value)
}

/// Advance past one value of the given kind without materializing it.
pub fn skip_value<R: Read>(src: &mut R, kind: ValueKind) -> Result<(), FormatError> {
    match kind.fixed_size() {
        Some(size) => codec::skip_bytes(src, size as u64),
        None if kind.is_array() => {
            let len = codec::length_to_usize(codec::read_i32(src)?)?;
            codec::skip_bytes(src, len as u64)
        }
        None => Err(FormatError::UnknownValueType(kind.code())),
    }
}

fn packed_block_len(lengths: impl Iterator<Item = usize>) -> i32 {
    lengths
        .map(|len| codec::packed_i32_len(len as i32) + len)
        .sum::<usize>() as i32
}

/// Write a homogeneous array payload: `i32` count, then the elements.
pub fn write_array_payload(dst: &mut impl BufMut, array: &ValueArray) -> Result<(), FormatError> {
    dst.put_i32_le(array.len() as i32);
    match array {
        ValueArray::Bool(values) => {
            for &v in values {
                codec::write_bool(dst, v);
            }
        }
        ValueArray::Int(values) => {
            for &v in values {
                dst.put_i32_le(v);
            }
        }
        ValueArray::Long(values) => {
            for &v in values {
                dst.put_i64_le(v);
            }
        }
        ValueArray::Float(values) => {
            for &v in values {
                codec::write_f32(dst, v);
            }
        }
        ValueArray::Double(values) => {
            for &v in values {
                codec::write_f64(dst, v);
            }
        }
        ValueArray::DateTime(values) => {
            for &v in values {
                dst.put_i64_le(temporal::datetime_to_wire(v)?);
            }
        }
        ValueArray::Date(values) => {
            for &v in values {
                dst.put_i64_le(temporal::date_to_wire(v)?);
            }
        }
        ValueArray::Time(values) => {
            for &v in values {
                dst.put_i64_le(temporal::time_to_wire(v));
            }
        }
        ValueArray::TimeSpan(values) => {
            for &v in values {
                dst.put_i64_le(temporal::timespan_to_wire(v));
            }
        }
        ValueArray::Decimal(values) => {
            for v in values {
                dst.put_slice(&v.to_le_bytes());
            }
        }
        ValueArray::String(values) => {
            dst.put_i32_le(packed_block_len(values.iter().map(String::len)));
            for v in values {
                codec::write_packed_i32(dst, v.len() as i32);
                dst.put_slice(v.as_bytes());
            }
        }
        ValueArray::Binary(values) => {
            dst.put_i32_le(packed_block_len(values.iter().map(Bytes::len)));
            for v in values {
                codec::write_packed_i32(dst, v.len() as i32);
                dst.put_slice(v);
            }
        }
    }
    Ok(())
}

fn fixed_payload_len(count: usize, size: usize) -> Result<usize, FormatError> {
    count.checked_mul(size).ok_or(FormatError::UnexpectedEof)
}

/// Split a packed-block element off the front of the cursor.
fn packed_element<'a>(cursor: &mut &'a [u8]) -> Result<&'a [u8], FormatError> {
    let len = codec::length_to_usize(codec::read_packed_i32(cursor)?)?;
    let remaining: &'a [u8] = *cursor;
    if remaining.len() < len {
        return Err(FormatError::UnexpectedEof);
    }
    let (element, tail) = remaining.split_at(len);
    *cursor = tail;
    Ok(element)
}

/// Read a homogeneous array payload of the given kind.
pub fn read_array_payload<R: Read>(
    src: &mut R,
    kind: ValueKind,
) -> Result<ValueArray, FormatError> {
    let count = codec::length_to_usize(codec::read_i32(src)?)?;

    if let Some(size) = kind.fixed_size() {
        let data = codec::read_blob(src, fixed_payload_len(count, size)?)?;
        let mut buf = &data[..];
        return Ok(match kind {
            ValueKind::Bool => ValueArray::Bool((0..count).map(|_| buf.get_u8() != 0).collect()),
            ValueKind::Int => ValueArray::Int((0..count).map(|_| buf.get_i32_le()).collect()),
            ValueKind::Long => ValueArray::Long((0..count).map(|_| buf.get_i64_le()).collect()),
            ValueKind::Float => {
                ValueArray::Float((0..count).map(|_| f32::from_bits(buf.get_u32_le())).collect())
            }
            ValueKind::Double => {
                ValueArray::Double((0..count).map(|_| f64::from_bits(buf.get_u64_le())).collect())
            }
            ValueKind::DateTime => {
                let mut values = Vec::with_capacity(count);
                for _ in 0..count {
                    values.push(temporal::datetime_from_wire(buf.get_i64_le())?);
                }
                ValueArray::DateTime(values)
            }
            ValueKind::Date => {
                let mut values = Vec::with_capacity(count);
                for _ in 0..count {
                    values.push(temporal::date_from_wire(buf.get_i64_le())?);
                }
                ValueArray::Date(values)
            }
            ValueKind::Time => ValueArray::Time(
                (0..count)
                    .map(|_| temporal::time_from_wire(buf.get_i64_le()))
                    .collect(),
            ),
            ValueKind::TimeSpan => ValueArray::TimeSpan(
                (0..count)
                    .map(|_| temporal::timespan_from_wire(buf.get_i64_le()))
                    .collect(),
            ),
            ValueKind::Decimal => {
                let mut values = Vec::with_capacity(count);
                for _ in 0..count {
                    let mut bytes = [0u8; 16];
                    buf.copy_to_slice(&mut bytes);
                    values.push(Decimal128::from_le_bytes(bytes)?);
                }
                ValueArray::Decimal(values)
            }
            _ => return Err(FormatError::UnknownValueType(kind.code())),
        });
    }

    let block_len = codec::length_to_usize(codec::read_i32(src)?)?;
    let block = codec::read_blob(src, block_len)?;
    let mut cursor = &block[..];
    match kind {
        ValueKind::String => {
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                let element = packed_element(&mut cursor)?;
                values.push(
                    std::str::from_utf8(element)
                        .map_err(|_| FormatError::InvalidUtf8)?
                        .to_string(),
                );
            }
            Ok(ValueArray::String(values))
        }
        ValueKind::Binary => {
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(Bytes::copy_from_slice(packed_element(&mut cursor)?));
            }
            Ok(ValueArray::Binary(values))
        }
        _ => Err(FormatError::UnknownValueType(kind.code())),
    }
}

/// Advance past a homogeneous array payload of the given kind.
pub fn skip_array_payload<R: Read>(src: &mut R, kind: ValueKind) -> Result<(), FormatError> {
    let count = codec::length_to_usize(codec::read_i32(src)?)?;
    match kind.fixed_size() {
        Some(size) => codec::skip_bytes(src, fixed_payload_len(count, size)? as u64),
        None if kind.is_array() => {
            let block_len = codec::length_to_usize(codec::read_i32(src)?)?;
            codec::skip_bytes(src, block_len as u64)
        }
        None => Err(FormatError::UnknownValueType(kind.code())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bytes::BytesMut;

    use super::*;

    fn roundtrip_value(value: &Value, kind: ValueKind) -> Value {
        let mut buf = BytesMut::new();
        write_value(&mut buf, value).unwrap();
        read_value(&mut buf.as_ref(), kind).unwrap()
    }

    #[test]
    fn test_single_value_roundtrips() {
        let cases = [
            (Value::Bool(true), ValueKind::Bool),
            (Value::Int(-42), ValueKind::Int),
            (Value::Long(1 << 40), ValueKind::Long),
            (Value::Float(1.5), ValueKind::Float),
            (Value::Double(-2.25), ValueKind::Double),
            (Value::from("hello"), ValueKind::String),
            (Value::from(vec![0u8, 255, 7]), ValueKind::Binary),
            (
                Value::Decimal(Decimal128::new(12345, 3).unwrap()),
                ValueKind::Decimal,
            ),
        ];
        for (value, kind) in cases {
            assert_eq!(roundtrip_value(&value, kind), value);
        }
    }

    #[test]
    fn test_envelope_has_no_primitive_form() {
        let mut buf = BytesMut::new();
        assert!(matches!(
            write_value(&mut buf, &Value::Invalid),
            Err(FormatError::UnserializableValue)
        ));
    }

    #[test]
    fn test_int_array_payload_layout() {
        let array = ValueArray::Int(vec![1, 2]);
        let mut buf = BytesMut::new();
        write_array_payload(&mut buf, &array).unwrap();
        assert_eq!(
            &buf[..],
            &[2, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0],
            "count then little-endian elements"
        );
    }

    #[test]
    fn test_string_array_packed_block() {
        let array = ValueArray::String(vec!["ab".to_string(), String::new(), "c".to_string()]);
        let mut buf = BytesMut::new();
        write_array_payload(&mut buf, &array).unwrap();
        // count 3, block length 6, then (2,"ab") (0,"") (1,"c").
        assert_eq!(
            &buf[..],
            &[3, 0, 0, 0, 6, 0, 0, 0, 2, b'a', b'b', 0, 1, b'c']
        );
        let back = read_array_payload(&mut buf.as_ref(), ValueKind::String).unwrap();
        assert_eq!(back, array);
    }

    #[test]
    fn test_array_payload_roundtrips() {
        let arrays = [
            ValueArray::Bool(vec![true, false, true]),
            ValueArray::Long(vec![i64::MIN, 0, i64::MAX]),
            ValueArray::Double(vec![0.0, -0.0, 3.25]),
            ValueArray::Binary(vec![Bytes::from_static(b"xy"), Bytes::new()]),
            ValueArray::Decimal(vec![
                Decimal128::ZERO,
                Decimal128::new(-999, 2).unwrap(),
            ]),
        ];
        for array in arrays {
            let mut buf = BytesMut::new();
            write_array_payload(&mut buf, &array).unwrap();
            let back = read_array_payload(&mut buf.as_ref(), array.kind()).unwrap();
            assert_eq!(back, array);
        }
    }

    #[test]
    fn test_skip_matches_read() {
        for array in [
            ValueArray::Int(vec![1, 2, 3]),
            ValueArray::String(vec!["abc".to_string(), "de".to_string()]),
        ] {
            let mut buf = BytesMut::new();
            write_array_payload(&mut buf, &array).unwrap();
            buf.put_u8(0xEE); // sentinel after the payload
            let mut src = buf.as_ref();
            skip_array_payload(&mut src, array.kind()).unwrap();
            assert_eq!(codec::read_u8(&mut src).unwrap(), 0xEE);
        }
    }

    #[test]
    fn test_skip_single_values() {
        let values = [
            Value::Long(9),
            Value::from("skip me"),
            Value::Decimal(Decimal128::ZERO),
        ];
        let mut buf = BytesMut::new();
        for value in &values {
            write_value(&mut buf, value).unwrap();
        }
        buf.put_u8(0xC3);
        let mut src = buf.as_ref();
        for kind in [ValueKind::Long, ValueKind::String, ValueKind::Decimal] {
            skip_value(&mut src, kind).unwrap();
        }
        assert_eq!(codec::read_u8(&mut src).unwrap(), 0xC3);
    }

    #[test]
    fn test_truncated_payload_is_eof() {
        let array = ValueArray::Int(vec![1, 2, 3]);
        let mut buf = BytesMut::new();
        write_array_payload(&mut buf, &array).unwrap();
        let truncated = &buf[..buf.len() - 1];
        assert!(matches!(
            read_array_payload(&mut &truncated[..], ValueKind::Int),
            Err(FormatError::UnexpectedEof)
        ));
    }
}
