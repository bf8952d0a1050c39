//! Binary encode/decode primitives for the archive format.
//!
//! All integers are little-endian. Strings and byte arrays are
//! length-prefixed with a `u32` length. [`Value`] and [`ValueType`] are
//! tag-encoded so component payloads and manifest records share one
//! representation.

use std::io::{Read, Write};

use weft_core::{Value, ValueType};

use crate::error::ArchiveError;

/// Type tag for [`ValueType::Float`].
pub const TAG_FLOAT: u8 = 0;
/// Type tag for [`ValueType::Int`].
pub const TAG_INT: u8 = 1;
/// Type tag for [`ValueType::Bool`].
pub const TAG_BOOL: u8 = 2;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), ArchiveError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), ArchiveError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u64.
pub fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), ArchiveError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian i64.
pub fn write_i64_le(w: &mut dyn Write, v: i64) -> Result<(), ArchiveError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f64.
pub fn write_f64_le(w: &mut dyn Write, v: f64) -> Result<(), ArchiveError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a bool as one byte (0 or 1).
pub fn write_bool(w: &mut dyn Write, v: bool) -> Result<(), ArchiveError> {
    write_u8(w, u8::from(v))
}

/// Write a length-prefixed UTF-8 string (u32 length + bytes).
pub fn write_length_prefixed_str(w: &mut dyn Write, s: &str) -> Result<(), ArchiveError> {
    write_u32_le(w, s.len() as u32)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

/// Write a length-prefixed byte array (u32 length + bytes).
pub fn write_length_prefixed_bytes(w: &mut dyn Write, b: &[u8]) -> Result<(), ArchiveError> {
    write_u32_le(w, b.len() as u32)?;
    w.write_all(b)?;
    Ok(())
}

/// Write a [`ValueType`] as its one-byte tag.
pub fn write_value_type(w: &mut dyn Write, t: ValueType) -> Result<(), ArchiveError> {
    let tag = match t {
        ValueType::Float => TAG_FLOAT,
        ValueType::Int => TAG_INT,
        ValueType::Bool => TAG_BOOL,
    };
    write_u8(w, tag)
}

/// Write a [`Value`] as a type tag followed by its payload.
pub fn write_value(w: &mut dyn Write, v: Value) -> Result<(), ArchiveError> {
    write_value_type(w, v.value_type())?;
    match v {
        Value::Float(x) => write_f64_le(w, x),
        Value::Int(x) => write_i64_le(w, x),
        Value::Bool(x) => write_bool(w, x),
    }
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, ArchiveError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, ArchiveError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian u64.
pub fn read_u64_le(r: &mut dyn Read) -> Result<u64, ArchiveError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Read a little-endian i64.
pub fn read_i64_le(r: &mut dyn Read) -> Result<i64, ArchiveError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(i64::from_le_bytes(buf))
}

/// Read a little-endian f64.
pub fn read_f64_le(r: &mut dyn Read) -> Result<f64, ArchiveError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

/// Read a bool encoded as one byte.
pub fn read_bool(r: &mut dyn Read) -> Result<bool, ArchiveError> {
    match read_u8(r)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(ArchiveError::Malformed {
            detail: format!("invalid bool byte {other}"),
        }),
    }
}

/// Read a length-prefixed UTF-8 string.
pub fn read_length_prefixed_str(r: &mut dyn Read) -> Result<String, ArchiveError> {
    let len = read_u32_le(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| ArchiveError::Malformed {
        detail: format!("invalid UTF-8 string: {e}"),
    })
}

/// Read a length-prefixed byte array.
pub fn read_length_prefixed_bytes(r: &mut dyn Read) -> Result<Vec<u8>, ArchiveError> {
    let len = read_u32_le(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

/// Read a [`ValueType`] from its one-byte tag.
pub fn read_value_type(r: &mut dyn Read) -> Result<ValueType, ArchiveError> {
    match read_u8(r)? {
        TAG_FLOAT => Ok(ValueType::Float),
        TAG_INT => Ok(ValueType::Int),
        TAG_BOOL => Ok(ValueType::Bool),
        other => Err(ArchiveError::Malformed {
            detail: format!("unknown value type tag {other}"),
        }),
    }
}

/// Read a tag-encoded [`Value`].
pub fn read_value(r: &mut dyn Read) -> Result<Value, ArchiveError> {
    match read_value_type(r)? {
        ValueType::Float => Ok(Value::Float(read_f64_le(r)?)),
        ValueType::Int => Ok(Value::Int(read_i64_le(r)?)),
        ValueType::Bool => Ok(Value::Bool(read_bool(r)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    #[test]
    fn value_round_trip() {
        for v in [Value::Float(0.73), Value::Int(-42), Value::Bool(true)] {
            let mut buf = Vec::new();
            write_value(&mut buf, v).unwrap();
            let got = read_value(&mut Cursor::new(&buf)).unwrap();
            assert_eq!(got, v);
        }
    }

    #[test]
    fn truncated_string_is_malformed_or_io() {
        let mut buf = Vec::new();
        write_length_prefixed_str(&mut buf, "hello").unwrap();
        buf.truncate(buf.len() - 2);
        let err = read_length_prefixed_str(&mut Cursor::new(&buf)).unwrap_err();
        assert!(matches!(err, ArchiveError::Io(_)));
    }

    #[test]
    fn bad_bool_byte_rejected() {
        let buf = [7u8];
        let err = read_bool(&mut Cursor::new(&buf[..])).unwrap_err();
        assert!(matches!(err, ArchiveError::Malformed { .. }));
    }

    #[test]
    fn bad_value_type_tag_rejected() {
        let buf = [9u8];
        let err = read_value_type(&mut Cursor::new(&buf[..])).unwrap_err();
        assert!(matches!(err, ArchiveError::Malformed { .. }));
    }

    proptest! {
        #[test]
        fn strings_round_trip(s in ".{0,64}") {
            let mut buf = Vec::new();
            write_length_prefixed_str(&mut buf, &s).unwrap();
            let got = read_length_prefixed_str(&mut Cursor::new(&buf)).unwrap();
            prop_assert_eq!(got, s);
        }

        #[test]
        fn floats_round_trip(v in proptest::num::f64::ANY) {
            let mut buf = Vec::new();
            write_f64_le(&mut buf, v).unwrap();
            let got = read_f64_le(&mut Cursor::new(&buf)).unwrap();
            prop_assert_eq!(got.to_bits(), v.to_bits());
        }
    }
}
