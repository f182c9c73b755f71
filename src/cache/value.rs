//! Scalar values and the decoders that read them back.

use crate::error::DecodeError;

// == Value ==
/// A scalar accepted by `TypedCache::store`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
}

impl Value {
    /// Serializes the value to the bytes written to the store.
    ///
    /// Strings are UTF-8, bytes pass through, numbers are decimal text so
    /// the store's `incr` and the numeric decoders can read them.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Value::Str(text) => text.into_bytes(),
            Value::Bytes(bytes) => bytes,
            Value::Int(number) => number.to_string().into_bytes(),
            Value::Float(number) => number.to_string().into_bytes(),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

// == Decoders ==
/// Decodes UTF-8 text.
pub fn utf8(raw: &[u8]) -> Result<String, DecodeError> {
    String::from_utf8(raw.to_vec()).map_err(|err| DecodeError::InvalidUtf8(err.to_string()))
}

/// Decodes a base-10 signed integer. Anything else is an error, never 0.
pub fn int(raw: &[u8]) -> Result<i64, DecodeError> {
    let text = utf8(raw)?;
    text.parse().map_err(|_| DecodeError::NotAnInteger(text))
}

/// Decodes a floating point number.
pub fn float(raw: &[u8]) -> Result<f64, DecodeError> {
    let text = utf8(raw)?;
    text.parse().map_err(|_| DecodeError::NotAFloat(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_encoding() {
        assert_eq!(Value::from("hello").into_bytes(), b"hello");
        assert_eq!(Value::from(vec![0u8, 159, 146, 150]).into_bytes(), vec![0, 159, 146, 150]);
        assert_eq!(Value::from(-42).into_bytes(), b"-42");
        assert_eq!(Value::from(3.25).into_bytes(), b"3.25");
    }

    #[test]
    fn test_int_decoder() {
        assert_eq!(int(b"1024"), Ok(1024));
        assert_eq!(int(b"-7"), Ok(-7));
        assert_eq!(int(b"abc"), Err(DecodeError::NotAnInteger("abc".to_string())));
        assert_eq!(int(b""), Err(DecodeError::NotAnInteger(String::new())));
        assert_eq!(int(b"1.5"), Err(DecodeError::NotAnInteger("1.5".to_string())));
    }

    #[test]
    fn test_float_decoder() {
        assert_eq!(float(b"3.25"), Ok(3.25));
        assert_eq!(float(b"2"), Ok(2.0));
        assert!(matches!(float(b"pi"), Err(DecodeError::NotAFloat(_))));
    }

    #[test]
    fn test_utf8_decoder_rejects_invalid_bytes() {
        assert_eq!(utf8(b"caf\xc3\xa9"), Ok("café".to_string()));
        assert!(matches!(utf8(&[0xff, 0xfe]), Err(DecodeError::InvalidUtf8(_))));
    }
}
