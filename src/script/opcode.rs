//! Decoded opcodes

use super::op_codes as op;
use std::fmt;

/// A script instruction identifier, covering every byte value
///
/// Direct pushes of 1 to 75 bytes carry their length and bytes that name no instruction carry
/// their raw value, so conversion to and from `u8` is lossless.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    OP_0,
    OP_PUSHBYTES(u8),
    OP_PUSHDATA1,
    OP_PUSHDATA2,
    OP_PUSHDATA4,
    OP_1NEGATE,
    OP_RESERVED,
    OP_1,
    OP_2,
    OP_3,
    OP_4,
    OP_5,
    OP_6,
    OP_7,
    OP_8,
    OP_9,
    OP_10,
    OP_11,
    OP_12,
    OP_13,
    OP_14,
    OP_15,
    OP_16,
    OP_NOP,
    OP_VER,
    OP_IF,
    OP_NOTIF,
    OP_VERIF,
    OP_VERNOTIF,
    OP_ELSE,
    OP_ENDIF,
    OP_VERIFY,
    OP_RETURN,
    OP_TOALTSTACK,
    OP_FROMALTSTACK,
    OP_2DROP,
    OP_2DUP,
    OP_3DUP,
    OP_2OVER,
    OP_2ROT,
    OP_2SWAP,
    OP_IFDUP,
    OP_DEPTH,
    OP_DROP,
    OP_DUP,
    OP_NIP,
    OP_OVER,
    OP_PICK,
    OP_ROLL,
    OP_ROT,
    OP_SWAP,
    OP_TUCK,
    OP_CAT,
    OP_SUBSTR,
    OP_LEFT,
    OP_RIGHT,
    OP_SIZE,
    OP_INVERT,
    OP_AND,
    OP_OR,
    OP_XOR,
    OP_EQUAL,
    OP_EQUALVERIFY,
    OP_RESERVED1,
    OP_RESERVED2,
    OP_1ADD,
    OP_1SUB,
    OP_2MUL,
    OP_2DIV,
    OP_NEGATE,
    OP_ABS,
    OP_NOT,
    OP_0NOTEQUAL,
    OP_ADD,
    OP_SUB,
    OP_MUL,
    OP_DIV,
    OP_MOD,
    OP_LSHIFT,
    OP_RSHIFT,
    OP_BOOLAND,
    OP_BOOLOR,
    OP_NUMEQUAL,
    OP_NUMEQUALVERIFY,
    OP_NUMNOTEQUAL,
    OP_LESSTHAN,
    OP_GREATERTHAN,
    OP_LESSTHANOREQUAL,
    OP_GREATERTHANOREQUAL,
    OP_MIN,
    OP_MAX,
    OP_WITHIN,
    OP_RIPEMD160,
    OP_SHA1,
    OP_SHA256,
    OP_HASH160,
    OP_HASH256,
    OP_CODESEPARATOR,
    OP_CHECKSIG,
    OP_CHECKSIGVERIFY,
    OP_CHECKMULTISIG,
    OP_CHECKMULTISIGVERIFY,
    OP_NOP1,
    OP_CHECKLOCKTIMEVERIFY,
    OP_CHECKSEQUENCEVERIFY,
    OP_NOP4,
    OP_NOP5,
    OP_NOP6,
    OP_NOP7,
    OP_NOP8,
    OP_NOP9,
    OP_NOP10,
    OP_UNKNOWN(u8),
}

impl Opcode {
    /// Returns the number pushed by OP_0, OP_1NEGATE and OP_1 through OP_16
    pub fn small_int(&self) -> Option<i64> {
        match *self {
            Opcode::OP_0 => Some(0),
            Opcode::OP_1NEGATE => Some(-1),
            _ => {
                let byte = u8::from(*self);
                if (op::OP_1..=op::OP_16).contains(&byte) {
                    Some((byte - op::OP_RESERVED) as i64)
                } else {
                    None
                }
            }
        }
    }

    /// Returns whether the opcode pushes a value, OP_RESERVED included
    pub fn is_push(&self) -> bool {
        u8::from(*self) <= op::OP_16
    }

    /// Returns whether the opcode counts toward MAX_OPS_PER_SCRIPT
    pub fn is_counted(&self) -> bool {
        u8::from(*self) > op::OP_16
    }

    /// Returns whether the opcode carries data bytes
    pub fn has_data(&self) -> bool {
        u8::from(*self) <= op::OP_PUSHDATA4
    }

    /// Returns whether the opcode fails the script wherever it appears
    pub fn is_disabled(&self) -> bool {
        matches!(
            self,
            Opcode::OP_CAT
                | Opcode::OP_SUBSTR
                | Opcode::OP_LEFT
                | Opcode::OP_RIGHT
                | Opcode::OP_INVERT
                | Opcode::OP_AND
                | Opcode::OP_OR
                | Opcode::OP_XOR
                | Opcode::OP_2MUL
                | Opcode::OP_2DIV
                | Opcode::OP_MUL
                | Opcode::OP_DIV
                | Opcode::OP_MOD
                | Opcode::OP_LSHIFT
                | Opcode::OP_RSHIFT
        )
    }

    /// Returns whether the opcode is evaluated inside unexecuted branches
    pub fn is_conditional(&self) -> bool {
        (op::OP_IF..=op::OP_ENDIF).contains(&u8::from(*self))
    }
}

impl From<u8> for Opcode {
    fn from(byte: u8) -> Opcode {
        match byte {
            op::OP_0 => Opcode::OP_0,
            len @ 1..=75 => Opcode::OP_PUSHBYTES(len),
            op::OP_PUSHDATA1 => Opcode::OP_PUSHDATA1,
            op::OP_PUSHDATA2 => Opcode::OP_PUSHDATA2,
            op::OP_PUSHDATA4 => Opcode::OP_PUSHDATA4,
            op::OP_1NEGATE => Opcode::OP_1NEGATE,
            op::OP_RESERVED => Opcode::OP_RESERVED,
            op::OP_1 => Opcode::OP_1,
            op::OP_2 => Opcode::OP_2,
            op::OP_3 => Opcode::OP_3,
            op::OP_4 => Opcode::OP_4,
            op::OP_5 => Opcode::OP_5,
            op::OP_6 => Opcode::OP_6,
            op::OP_7 => Opcode::OP_7,
            op::OP_8 => Opcode::OP_8,
            op::OP_9 => Opcode::OP_9,
            op::OP_10 => Opcode::OP_10,
            op::OP_11 => Opcode::OP_11,
            op::OP_12 => Opcode::OP_12,
            op::OP_13 => Opcode::OP_13,
            op::OP_14 => Opcode::OP_14,
            op::OP_15 => Opcode::OP_15,
            op::OP_16 => Opcode::OP_16,
            op::OP_NOP => Opcode::OP_NOP,
            op::OP_VER => Opcode::OP_VER,
            op::OP_IF => Opcode::OP_IF,
            op::OP_NOTIF => Opcode::OP_NOTIF,
            op::OP_VERIF => Opcode::OP_VERIF,
            op::OP_VERNOTIF => Opcode::OP_VERNOTIF,
            op::OP_ELSE => Opcode::OP_ELSE,
            op::OP_ENDIF => Opcode::OP_ENDIF,
            op::OP_VERIFY => Opcode::OP_VERIFY,
            op::OP_RETURN => Opcode::OP_RETURN,
            op::OP_TOALTSTACK => Opcode::OP_TOALTSTACK,
            op::OP_FROMALTSTACK => Opcode::OP_FROMALTSTACK,
            op::OP_2DROP => Opcode::OP_2DROP,
            op::OP_2DUP => Opcode::OP_2DUP,
            op::OP_3DUP => Opcode::OP_3DUP,
            op::OP_2OVER => Opcode::OP_2OVER,
            op::OP_2ROT => Opcode::OP_2ROT,
            op::OP_2SWAP => Opcode::OP_2SWAP,
            op::OP_IFDUP => Opcode::OP_IFDUP,
            op::OP_DEPTH => Opcode::OP_DEPTH,
            op::OP_DROP => Opcode::OP_DROP,
            op::OP_DUP => Opcode::OP_DUP,
            op::OP_NIP => Opcode::OP_NIP,
            op::OP_OVER => Opcode::OP_OVER,
            op::OP_PICK => Opcode::OP_PICK,
            op::OP_ROLL => Opcode::OP_ROLL,
            op::OP_ROT => Opcode::OP_ROT,
            op::OP_SWAP => Opcode::OP_SWAP,
            op::OP_TUCK => Opcode::OP_TUCK,
            op::OP_CAT => Opcode::OP_CAT,
            op::OP_SUBSTR => Opcode::OP_SUBSTR,
            op::OP_LEFT => Opcode::OP_LEFT,
            op::OP_RIGHT => Opcode::OP_RIGHT,
            op::OP_SIZE => Opcode::OP_SIZE,
            op::OP_INVERT => Opcode::OP_INVERT,
            op::OP_AND => Opcode::OP_AND,
            op::OP_OR => Opcode::OP_OR,
            op::OP_XOR => Opcode::OP_XOR,
            op::OP_EQUAL => Opcode::OP_EQUAL,
            op::OP_EQUALVERIFY => Opcode::OP_EQUALVERIFY,
            op::OP_RESERVED1 => Opcode::OP_RESERVED1,
            op::OP_RESERVED2 => Opcode::OP_RESERVED2,
            op::OP_1ADD => Opcode::OP_1ADD,
            op::OP_1SUB => Opcode::OP_1SUB,
            op::OP_2MUL => Opcode::OP_2MUL,
            op::OP_2DIV => Opcode::OP_2DIV,
            op::OP_NEGATE => Opcode::OP_NEGATE,
            op::OP_ABS => Opcode::OP_ABS,
            op::OP_NOT => Opcode::OP_NOT,
            op::OP_0NOTEQUAL => Opcode::OP_0NOTEQUAL,
            op::OP_ADD => Opcode::OP_ADD,
            op::OP_SUB => Opcode::OP_SUB,
            op::OP_MUL => Opcode::OP_MUL,
            op::OP_DIV => Opcode::OP_DIV,
            op::OP_MOD => Opcode::OP_MOD,
            op::OP_LSHIFT => Opcode::OP_LSHIFT,
            op::OP_RSHIFT => Opcode::OP_RSHIFT,
            op::OP_BOOLAND => Opcode::OP_BOOLAND,
            op::OP_BOOLOR => Opcode::OP_BOOLOR,
            op::OP_NUMEQUAL => Opcode::OP_NUMEQUAL,
            op::OP_NUMEQUALVERIFY => Opcode::OP_NUMEQUALVERIFY,
            op::OP_NUMNOTEQUAL => Opcode::OP_NUMNOTEQUAL,
            op::OP_LESSTHAN => Opcode::OP_LESSTHAN,
            op::OP_GREATERTHAN => Opcode::OP_GREATERTHAN,
            op::OP_LESSTHANOREQUAL => Opcode::OP_LESSTHANOREQUAL,
            op::OP_GREATERTHANOREQUAL => Opcode::OP_GREATERTHANOREQUAL,
            op::OP_MIN => Opcode::OP_MIN,
            op::OP_MAX => Opcode::OP_MAX,
            op::OP_WITHIN => Opcode::OP_WITHIN,
            op::OP_RIPEMD160 => Opcode::OP_RIPEMD160,
            op::OP_SHA1 => Opcode::OP_SHA1,
            op::OP_SHA256 => Opcode::OP_SHA256,
            op::OP_HASH160 => Opcode::OP_HASH160,
            op::OP_HASH256 => Opcode::OP_HASH256,
            op::OP_CODESEPARATOR => Opcode::OP_CODESEPARATOR,
            op::OP_CHECKSIG => Opcode::OP_CHECKSIG,
            op::OP_CHECKSIGVERIFY => Opcode::OP_CHECKSIGVERIFY,
            op::OP_CHECKMULTISIG => Opcode::OP_CHECKMULTISIG,
            op::OP_CHECKMULTISIGVERIFY => Opcode::OP_CHECKMULTISIGVERIFY,
            op::OP_NOP1 => Opcode::OP_NOP1,
            op::OP_CHECKLOCKTIMEVERIFY => Opcode::OP_CHECKLOCKTIMEVERIFY,
            op::OP_CHECKSEQUENCEVERIFY => Opcode::OP_CHECKSEQUENCEVERIFY,
            op::OP_NOP4 => Opcode::OP_NOP4,
            op::OP_NOP5 => Opcode::OP_NOP5,
            op::OP_NOP6 => Opcode::OP_NOP6,
            op::OP_NOP7 => Opcode::OP_NOP7,
            op::OP_NOP8 => Opcode::OP_NOP8,
            op::OP_NOP9 => Opcode::OP_NOP9,
            op::OP_NOP10 => Opcode::OP_NOP10,
            other => Opcode::OP_UNKNOWN(other),
        }
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> u8 {
        match opcode {
            Opcode::OP_0 => op::OP_0,
            Opcode::OP_PUSHBYTES(len) => len,
            Opcode::OP_PUSHDATA1 => op::OP_PUSHDATA1,
            Opcode::OP_PUSHDATA2 => op::OP_PUSHDATA2,
            Opcode::OP_PUSHDATA4 => op::OP_PUSHDATA4,
            Opcode::OP_1NEGATE => op::OP_1NEGATE,
            Opcode::OP_RESERVED => op::OP_RESERVED,
            Opcode::OP_1 => op::OP_1,
            Opcode::OP_2 => op::OP_2,
            Opcode::OP_3 => op::OP_3,
            Opcode::OP_4 => op::OP_4,
            Opcode::OP_5 => op::OP_5,
            Opcode::OP_6 => op::OP_6,
            Opcode::OP_7 => op::OP_7,
            Opcode::OP_8 => op::OP_8,
            Opcode::OP_9 => op::OP_9,
            Opcode::OP_10 => op::OP_10,
            Opcode::OP_11 => op::OP_11,
            Opcode::OP_12 => op::OP_12,
            Opcode::OP_13 => op::OP_13,
            Opcode::OP_14 => op::OP_14,
            Opcode::OP_15 => op::OP_15,
            Opcode::OP_16 => op::OP_16,
            Opcode::OP_NOP => op::OP_NOP,
            Opcode::OP_VER => op::OP_VER,
            Opcode::OP_IF => op::OP_IF,
            Opcode::OP_NOTIF => op::OP_NOTIF,
            Opcode::OP_VERIF => op::OP_VERIF,
            Opcode::OP_VERNOTIF => op::OP_VERNOTIF,
            Opcode::OP_ELSE => op::OP_ELSE,
            Opcode::OP_ENDIF => op::OP_ENDIF,
            Opcode::OP_VERIFY => op::OP_VERIFY,
            Opcode::OP_RETURN => op::OP_RETURN,
            Opcode::OP_TOALTSTACK => op::OP_TOALTSTACK,
            Opcode::OP_FROMALTSTACK => op::OP_FROMALTSTACK,
            Opcode::OP_2DROP => op::OP_2DROP,
            Opcode::OP_2DUP => op::OP_2DUP,
            Opcode::OP_3DUP => op::OP_3DUP,
            Opcode::OP_2OVER => op::OP_2OVER,
            Opcode::OP_2ROT => op::OP_2ROT,
            Opcode::OP_2SWAP => op::OP_2SWAP,
            Opcode::OP_IFDUP => op::OP_IFDUP,
            Opcode::OP_DEPTH => op::OP_DEPTH,
            Opcode::OP_DROP => op::OP_DROP,
            Opcode::OP_DUP => op::OP_DUP,
            Opcode::OP_NIP => op::OP_NIP,
            Opcode::OP_OVER => op::OP_OVER,
            Opcode::OP_PICK => op::OP_PICK,
            Opcode::OP_ROLL => op::OP_ROLL,
            Opcode::OP_ROT => op::OP_ROT,
            Opcode::OP_SWAP => op::OP_SWAP,
            Opcode::OP_TUCK => op::OP_TUCK,
            Opcode::OP_CAT => op::OP_CAT,
            Opcode::OP_SUBSTR => op::OP_SUBSTR,
            Opcode::OP_LEFT => op::OP_LEFT,
            Opcode::OP_RIGHT => op::OP_RIGHT,
            Opcode::OP_SIZE => op::OP_SIZE,
            Opcode::OP_INVERT => op::OP_INVERT,
            Opcode::OP_AND => op::OP_AND,
            Opcode::OP_OR => op::OP_OR,
            Opcode::OP_XOR => op::OP_XOR,
            Opcode::OP_EQUAL => op::OP_EQUAL,
            Opcode::OP_EQUALVERIFY => op::OP_EQUALVERIFY,
            Opcode::OP_RESERVED1 => op::OP_RESERVED1,
            Opcode::OP_RESERVED2 => op::OP_RESERVED2,
            Opcode::OP_1ADD => op::OP_1ADD,
            Opcode::OP_1SUB => op::OP_1SUB,
            Opcode::OP_2MUL => op::OP_2MUL,
            Opcode::OP_2DIV => op::OP_2DIV,
            Opcode::OP_NEGATE => op::OP_NEGATE,
            Opcode::OP_ABS => op::OP_ABS,
            Opcode::OP_NOT => op::OP_NOT,
            Opcode::OP_0NOTEQUAL => op::OP_0NOTEQUAL,
            Opcode::OP_ADD => op::OP_ADD,
            Opcode::OP_SUB => op::OP_SUB,
            Opcode::OP_MUL => op::OP_MUL,
            Opcode::OP_DIV => op::OP_DIV,
            Opcode::OP_MOD => op::OP_MOD,
            Opcode::OP_LSHIFT => op::OP_LSHIFT,
            Opcode::OP_RSHIFT => op::OP_RSHIFT,
            Opcode::OP_BOOLAND => op::OP_BOOLAND,
            Opcode::OP_BOOLOR => op::OP_BOOLOR,
            Opcode::OP_NUMEQUAL => op::OP_NUMEQUAL,
            Opcode::OP_NUMEQUALVERIFY => op::OP_NUMEQUALVERIFY,
            Opcode::OP_NUMNOTEQUAL => op::OP_NUMNOTEQUAL,
            Opcode::OP_LESSTHAN => op::OP_LESSTHAN,
            Opcode::OP_GREATERTHAN => op::OP_GREATERTHAN,
            Opcode::OP_LESSTHANOREQUAL => op::OP_LESSTHANOREQUAL,
            Opcode::OP_GREATERTHANOREQUAL => op::OP_GREATERTHANOREQUAL,
            Opcode::OP_MIN => op::OP_MIN,
            Opcode::OP_MAX => op::OP_MAX,
            Opcode::OP_WITHIN => op::OP_WITHIN,
            Opcode::OP_RIPEMD160 => op::OP_RIPEMD160,
            Opcode::OP_SHA1 => op::OP_SHA1,
            Opcode::OP_SHA256 => op::OP_SHA256,
            Opcode::OP_HASH160 => op::OP_HASH160,
            Opcode::OP_HASH256 => op::OP_HASH256,
            Opcode::OP_CODESEPARATOR => op::OP_CODESEPARATOR,
            Opcode::OP_CHECKSIG => op::OP_CHECKSIG,
            Opcode::OP_CHECKSIGVERIFY => op::OP_CHECKSIGVERIFY,
            Opcode::OP_CHECKMULTISIG => op::OP_CHECKMULTISIG,
            Opcode::OP_CHECKMULTISIGVERIFY => op::OP_CHECKMULTISIGVERIFY,
            Opcode::OP_NOP1 => op::OP_NOP1,
            Opcode::OP_CHECKLOCKTIMEVERIFY => op::OP_CHECKLOCKTIMEVERIFY,
            Opcode::OP_CHECKSEQUENCEVERIFY => op::OP_CHECKSEQUENCEVERIFY,
            Opcode::OP_NOP4 => op::OP_NOP4,
            Opcode::OP_NOP5 => op::OP_NOP5,
            Opcode::OP_NOP6 => op::OP_NOP6,
            Opcode::OP_NOP7 => op::OP_NOP7,
            Opcode::OP_NOP8 => op::OP_NOP8,
            Opcode::OP_NOP9 => op::OP_NOP9,
            Opcode::OP_NOP10 => op::OP_NOP10,
            Opcode::OP_UNKNOWN(byte) => byte,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Opcode::OP_PUSHBYTES(len) => write!(f, "OP_PUSHBYTES_{}", len),
            Opcode::OP_UNKNOWN(byte) => write!(f, "OP_UNKNOWN_{:#04x}", byte),
            other => write!(f, "{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_conversion() {
        for byte in 0..=255u8 {
            assert_eq!(u8::from(Opcode::from(byte)), byte);
        }
        assert_eq!(Opcode::from(20), Opcode::OP_PUSHBYTES(20));
        assert_eq!(Opcode::from(0xb1), Opcode::OP_CHECKLOCKTIMEVERIFY);
        assert_eq!(Opcode::from(0xba), Opcode::OP_UNKNOWN(0xba));
    }

    #[test]
    fn small_ints() {
        assert_eq!(Opcode::OP_0.small_int(), Some(0));
        assert_eq!(Opcode::OP_1NEGATE.small_int(), Some(-1));
        assert_eq!(Opcode::OP_1.small_int(), Some(1));
        assert_eq!(Opcode::OP_16.small_int(), Some(16));
        assert_eq!(Opcode::OP_RESERVED.small_int(), None);
        assert_eq!(Opcode::OP_NOP.small_int(), None);
    }

    #[test]
    fn classes() {
        assert!(Opcode::OP_RESERVED.is_push());
        assert!(!Opcode::OP_RESERVED.is_counted());
        assert!(Opcode::OP_NOP.is_counted());
        assert!(Opcode::OP_VERIF.is_conditional());
        assert!(Opcode::OP_ENDIF.is_conditional());
        assert!(!Opcode::OP_VERIFY.is_conditional());
        assert!(Opcode::OP_CAT.is_disabled());
        assert!(Opcode::OP_MOD.is_disabled());
        assert!(!Opcode::OP_SIZE.is_disabled());
    }

    #[test]
    fn names() {
        assert_eq!(Opcode::OP_CHECKSIG.to_string(), "OP_CHECKSIG");
        assert_eq!(Opcode::OP_PUSHBYTES(33).to_string(), "OP_PUSHBYTES_33");
        assert_eq!(Opcode::OP_UNKNOWN(0xff).to_string(), "OP_UNKNOWN_0xff");
    }
}
