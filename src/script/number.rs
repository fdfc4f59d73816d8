//! Script number and boolean encodings
//!
//! Numbers are little-endian with the sign in the high bit of the last byte. Operands are
//! limited to 4 bytes, or 5 for lock times, but results may be longer.

use super::ScriptError;
use crate::result::{Error, Result};

/// Default maximum size of a number operand
pub const MAX_NUM_SIZE: usize = 4;

/// Maximum size of a lock time operand
pub const MAX_LOCKTIME_NUM_SIZE: usize = 5;

/// Converts a stack item to a bool
///
/// Any non-zero byte is true, except for negative zero.
#[inline]
pub fn decode_bool(s: &[u8]) -> bool {
    if s.len() == 0 {
        return false;
    }
    for i in 0..s.len() - 1 {
        if s[i] != 0 {
            return true;
        }
    }
    s[s.len() - 1] & 127 != 0
}

/// Converts a bool to its canonical stack item
#[inline]
pub fn encode_bool(b: bool) -> Vec<u8> {
    if b {
        vec![1]
    } else {
        vec![]
    }
}

/// Converts a stack item to a number
///
/// Fails if the item is longer than `max_size`, or if `require_minimal` is set and the item
/// has unnecessary trailing zero bytes.
#[inline]
pub fn decode_num(s: &[u8], max_size: usize, require_minimal: bool) -> Result<i64> {
    if s.len() > max_size {
        return Err(Error::ScriptError(ScriptError::NumberOverflow));
    }
    if s.is_empty() {
        return Ok(0);
    }
    let last = s[s.len() - 1];
    if require_minimal && last & 0x7f == 0 {
        // A zero last byte is only needed when the byte before it has its high bit set
        if s.len() == 1 || s[s.len() - 2] & 0x80 == 0 {
            return Err(Error::ScriptError(ScriptError::MinimalNumber));
        }
    }
    let mut val: i64 = 0;
    for (i, b) in s.iter().enumerate() {
        val |= (*b as i64) << (8 * i);
    }
    if last & 0x80 != 0 {
        let mask = !(0x80_i64 << (8 * (s.len() - 1)));
        val = -(val & mask);
    }
    Ok(val)
}

/// Converts a number to a minimally encoded stack item
#[inline]
pub fn encode_num(val: i64) -> Vec<u8> {
    if val == 0 {
        return vec![];
    }
    let negative = val < 0;
    let mut posval = val.unsigned_abs();
    let mut v = Vec::with_capacity(9);
    while posval > 0 {
        v.push((posval & 0xff) as u8);
        posval >>= 8;
    }
    let last = v.len() - 1;
    if v[last] & 0x80 != 0 {
        v.push(if negative { 0x80 } else { 0 });
    } else if negative {
        v[last] |= 0x80;
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_bool_tests() {
        assert!(decode_bool(&[1]));
        assert!(decode_bool(&[255, 0, 0, 0]));
        assert!(decode_bool(&[0, 0, 0, 129]));
        assert!(decode_bool(&[0, 0x80, 0]));
        assert!(!decode_bool(&[0]));
        assert!(!decode_bool(&[0, 0, 0, 0]));
        assert!(!decode_bool(&[0, 0, 0, 128]));
        assert!(!decode_bool(&[0x80]));
        assert!(!decode_bool(&[]));
    }

    #[test]
    fn decode_num_tests() {
        assert_eq!(decode_num(&[], 4, true).unwrap(), 0);
        assert_eq!(decode_num(&[1], 4, true).unwrap(), 1);
        assert_eq!(decode_num(&[129], 4, true).unwrap(), -1);
        assert_eq!(decode_num(&[127], 4, true).unwrap(), 127);
        assert_eq!(decode_num(&[128, 0], 4, true).unwrap(), 128);
        assert_eq!(decode_num(&[128, 128], 4, true).unwrap(), -128);
        assert_eq!(decode_num(&[255, 255, 255, 127], 4, true).unwrap(), 2147483647);
        assert_eq!(decode_num(&[255, 255, 255, 255], 4, true).unwrap(), -2147483647);
        assert_eq!(decode_num(&[255, 255, 255, 255, 0], 5, true).unwrap(), 4294967295);
    }

    #[test]
    fn decode_num_limits() {
        let overflow = decode_num(&[1, 0, 0, 0, 0], 4, false).unwrap_err();
        assert_eq!(overflow.script_error(), Some(ScriptError::NumberOverflow));
        let minimal = decode_num(&[1, 0], 4, true).unwrap_err();
        assert_eq!(minimal.script_error(), Some(ScriptError::MinimalNumber));
        assert!(decode_num(&[0x80], 4, true).is_err());
        assert!(decode_num(&[0], 4, true).is_err());
        // Non-minimal forms decode when minimality is not required
        assert_eq!(decode_num(&[1, 0], 4, false).unwrap(), 1);
        assert_eq!(decode_num(&[0x80], 4, false).unwrap(), 0);
        assert_eq!(decode_num(&[1, 0x80], 4, false).unwrap(), -1);
    }

    #[test]
    fn encode_num_tests() {
        assert_eq!(encode_num(0), Vec::<u8>::new());
        assert_eq!(encode_num(1), vec![1]);
        assert_eq!(encode_num(-1), vec![129]);
        assert_eq!(encode_num(127), vec![127]);
        assert_eq!(encode_num(128), vec![128, 0]);
        assert_eq!(encode_num(-128), vec![128, 128]);
        assert_eq!(encode_num(255), vec![255, 0]);
        assert_eq!(encode_num(256), vec![0, 1]);
        assert_eq!(encode_num(-32768), vec![0, 128, 128]);
        assert_eq!(encode_num(2147483647), vec![255, 255, 255, 127]);
        assert_eq!(encode_num(-2147483647), vec![255, 255, 255, 255]);
        assert_eq!(encode_num(4294967294), vec![254, 255, 255, 255, 0]);
    }

    #[test]
    fn encoded_numbers_are_minimal() {
        for n in [-70000i64, -256, -129, -2, 2, 100, 129, 40000, 1 << 31, -(1 << 33)] {
            let v = encode_num(n);
            assert_eq!(decode_num(&v, 8, true).unwrap(), n);
        }
    }
}
