#![doc = r#"
Variable length quantities

Delta times and meta/sysex lengths in a file are written 7 bits per byte,
most significant group first. Every byte but the last has its top bit set:

```text
0x00000000  00
0x0000007F  7F
0x00000080  81 00
0x00003FFF  FF 7F
0x00004000  81 80 00
0x0FFFFFFF  FF FF FF 7F
```

Four bytes carry 28 bits; larger values are rejected.
"#]

use crate::{ContainerError, ContainerResult};
use alloc::vec::Vec;
use thiserror::Error;

/// Largest value a quantity can hold.
pub const MAX_VALUE: u32 = 0x0FFF_FFFF;

/// Errors while decoding a quantity.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VlqError {
    /// The input ended with the continuation bit still set.
    #[error("Variable length quantity is truncated")]
    Truncated,
    /// More than four bytes.
    #[error("Variable length quantity is longer than four bytes")]
    TooLong,
}

/// Number of bytes [`encode`] writes for `value`.
pub const fn encoded_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        _ => 4,
    }
}

/// Append the encoding of `value` to `out`.
pub fn encode(value: u32, out: &mut Vec<u8>) -> ContainerResult<()> {
    if value > MAX_VALUE {
        return Err(ContainerError::VlqOverflow(value));
    }
    let len = encoded_len(value);
    for group in (1..len).rev() {
        out.push(((value >> (7 * group)) & 0x7F) as u8 | 0x80);
    }
    out.push((value & 0x7F) as u8);
    Ok(())
}

/// Decode a quantity from the start of `bytes`.
///
/// Returns the value and the number of bytes read.
pub fn decode(bytes: &[u8]) -> Result<(u32, usize), VlqError> {
    let mut value = 0u32;
    for (i, byte) in bytes.iter().enumerate() {
        if i == 4 {
            return Err(VlqError::TooLong);
        }
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    if bytes.len() >= 4 {
        Err(VlqError::TooLong)
    } else {
        Err(VlqError::Truncated)
    }
}
