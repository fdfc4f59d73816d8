//! Script opcodes, interpreter and verification

use self::op_codes::*;
use super::result::Result;
use hex;
use std::fmt;
use std::io::Cursor;

mod checker;
mod conditional;
mod context;
mod error;
mod flags;
mod interpreter;
mod number;
#[allow(dead_code)]
pub mod op_codes;
mod opcode;
mod operation;
mod standard;
mod verify;

pub use self::checker::{
    Checker, TransactionChecker, TransactionlessChecker, LOCKTIME_THRESHOLD, SEQUENCE_FINAL,
};
pub use self::conditional::ConditionalStack;
pub use self::context::EvaluationContext;
pub use self::error::ScriptError;
pub use self::flags::{RuleFlags, SigVersion};
pub use self::interpreter::{eval, run};
pub use self::number::{decode_bool, decode_num, encode_bool, encode_num};
pub use self::opcode::Opcode;
pub use self::operation::{decode, encode, find_and_delete, Operation};
pub use self::standard::ScriptPattern;
pub use self::verify::verify_script;

pub(crate) use self::operation::next_op;

/// Maximum number of bytes pushable to the stack
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;

/// Maximum number of multisig keys
pub const MAX_PUBKEYS_PER_MULTISIG: usize = 20;

/// Maximum number of non-push operations per script
pub const MAX_OPS_PER_SCRIPT: usize = 201;

/// Maximum script length in bytes
pub const MAX_SCRIPT_SIZE: usize = 10000;

/// Maximum number of elements on the stack and alt stack combined
pub const MAX_STACK_SIZE: usize = 1000;

/// Transaction script
#[derive(Default, Clone, PartialEq, Eq, Hash)]
pub struct Script(pub Vec<u8>);

impl Script {
    /// Creates a new empty script
    pub fn new() -> Script {
        Script(vec![])
    }

    /// Appends a single opcode or data byte
    pub fn append(&mut self, byte: u8) {
        self.0.push(byte);
    }

    /// Appends a slice of data
    pub fn append_slice(&mut self, slice: &[u8]) {
        self.0.extend_from_slice(slice);
    }

    /// Appends the opcodes and provided data that push it onto the stack
    pub fn append_data(&mut self, data: &[u8]) {
        // Writing to a vector cannot fail
        let _ = Operation::push(data).write(&mut self.0);
    }

    /// Appends the opcodes to push a number to the stack
    ///
    /// Uses OP_0, OP_1NEGATE and OP_1 through OP_16 where possible.
    pub fn append_num(&mut self, n: i64) {
        match n {
            0 => self.0.push(OP_0),
            -1 => self.0.push(OP_1NEGATE),
            1..=16 => self.0.push(OP_1 + n as u8 - 1),
            _ => self.append_data(&encode_num(n)),
        }
    }

    /// Decodes the script into its operations
    pub fn operations(&self) -> Result<Vec<Operation>> {
        decode(&self.0)
    }

    /// Returns whether the script only pushes data
    pub fn is_push_only(&self) -> bool {
        standard::is_push_only(&self.0)
    }

    /// Returns whether the script is a P2SH output
    pub fn is_pay_to_script_hash(&self) -> bool {
        standard::is_pay_to_script_hash(&self.0)
    }

    /// Returns the version and program if the script is a witness program
    pub fn witness_program(&self) -> Option<(u8, &[u8])> {
        standard::witness_program(&self.0)
    }

    /// Classifies the script as a standard output form
    pub fn pattern(&self) -> ScriptPattern {
        standard::pattern(&self.0)
    }

    /// Counts the signature operations in the script
    pub fn sigop_count(&self, accurate: bool) -> usize {
        standard::sigop_count(&self.0, accurate)
    }

    /// Counts the signature operations of a P2SH redeem script pushed by `script_sig`
    pub fn p2sh_sigop_count(&self, script_sig: &Script) -> usize {
        standard::p2sh_sigop_count(&self.0, &script_sig.0)
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let script = &self.0;
        let mut parts = Vec::new();
        let mut pc = 0;
        while pc < script.len() {
            let end = match next_op(script, pc) {
                Ok((_, end)) => end,
                Err(_) => break,
            };
            match Operation::read(&mut Cursor::new(&script[pc..end])) {
                Ok(op) => parts.push(format!("{:?}", op)),
                Err(_) => break,
            }
            pc = end;
        }
        let mut ret = format!("[{}", parts.join(" "));

        // Add whatever is remaining if we exited early
        for b in script.iter().skip(pc) {
            ret.push_str(&format!(" {}", b));
        }
        ret.push_str(", hex: ");
        ret.push_str(&hex::encode(script));
        ret.push(']');
        f.write_str(&ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_data() {
        let mut s = Script::new();
        s.append_data(&[]);
        s.append_data(&[7; 3]);
        assert_eq!(s.0, vec![OP_0, 3, 7, 7, 7]);

        let mut s = Script::new();
        s.append_data(&[1; 76]);
        assert_eq!(&s.0[..2], &[OP_PUSHDATA1, 76]);
        assert_eq!(s.0.len(), 78);

        let mut s = Script::new();
        s.append_data(&[1; 256]);
        assert_eq!(&s.0[..3], &[OP_PUSHDATA2, 0, 1]);
        assert_eq!(s.0.len(), 259);
    }

    #[test]
    fn append_num() {
        let mut s = Script::new();
        s.append_num(0);
        s.append_num(-1);
        s.append_num(1);
        s.append_num(16);
        s.append_num(17);
        s.append_num(-2);
        assert_eq!(s.0, vec![OP_0, OP_1NEGATE, OP_1, OP_16, 1, 17, 1, 0x82]);
    }

    #[test]
    fn operations() {
        let mut s = Script::new();
        s.append(OP_DUP);
        s.append_data(&[9; 20]);
        let ops = s.operations().unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].opcode, Opcode::OP_DUP);
        assert_eq!(ops[1].data, vec![9; 20]);
        assert!(Script(vec![OP_PUSHDATA1]).operations().is_err());
    }

    #[test]
    fn analysis() {
        let p2sh = Script(hex::decode("a914748284390f9e263a4b766a75d0633c50426eb87587").unwrap());
        assert!(p2sh.is_pay_to_script_hash());
        assert_eq!(p2sh.pattern(), ScriptPattern::PayScriptHash);
        assert!(p2sh.witness_program().is_none());
        let mut script_sig = Script::new();
        script_sig.append_data(&[OP_1, OP_CHECKSIG]);
        assert!(script_sig.is_push_only());
        assert_eq!(p2sh.p2sh_sigop_count(&script_sig), 1);
        assert_eq!(Script(vec![OP_CHECKSIG, OP_CHECKSIG]).sigop_count(false), 2);
    }

    #[test]
    fn debug() {
        let mut s = Script::new();
        s.append(OP_DUP);
        s.append_data(&[0xab, 0xcd]);
        s.append(OP_EQUAL);
        let d = format!("{:?}", s);
        assert_eq!(d, "[OP_DUP OP_PUSHBYTES_2 abcd OP_EQUAL, hex: 7602abcd87]");
        let d = format!("{:?}", Script(vec![OP_1, 5, 1]));
        assert_eq!(d, "[OP_1 5 1, hex: 510501]");
    }
}
