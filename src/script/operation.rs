//! Script operations and decoding

use super::op_codes::*;
use super::{Opcode, ScriptError};
use crate::result::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io;
use std::io::{Cursor, Write};

/// A single decoded script instruction
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Operation {
    /// Instruction
    pub opcode: Opcode,
    /// Bytes pushed, empty for non-push opcodes
    pub data: Vec<u8>,
}

impl Operation {
    /// Creates a non-push operation
    pub fn new(opcode: Opcode) -> Operation {
        Operation {
            opcode,
            data: vec![],
        }
    }

    /// Creates the operation that pushes `data` with the shortest length prefix
    ///
    /// Single byte values are pushed directly rather than as OP_1 through OP_16.
    pub fn push(data: &[u8]) -> Operation {
        let opcode = match data.len() {
            0 => Opcode::OP_0,
            len @ 1..=75 => Opcode::OP_PUSHBYTES(len as u8),
            76..=0xff => Opcode::OP_PUSHDATA1,
            0x100..=0xffff => Opcode::OP_PUSHDATA2,
            _ => Opcode::OP_PUSHDATA4,
        };
        Operation {
            opcode,
            data: data.to_vec(),
        }
    }

    /// Reads one operation, failing with BadPush if a push runs past the end
    pub fn read(cursor: &mut Cursor<&[u8]>) -> Result<Operation> {
        let script: &[u8] = *cursor.get_ref();
        let pc = cursor.position() as usize;
        let (opcode, start, end) = op_bounds(script, pc).map_err(bad_push)?;
        cursor.set_position(end as u64);
        Ok(Operation {
            opcode: Opcode::from(opcode),
            data: script[start..end].to_vec(),
        })
    }

    /// Writes the operation exactly as it was decoded, keeping non-minimal length prefixes
    pub fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_u8(u8::from(self.opcode))?;
        match self.opcode {
            Opcode::OP_PUSHDATA1 => writer.write_u8(self.data.len() as u8)?,
            Opcode::OP_PUSHDATA2 => writer.write_u16::<LittleEndian>(self.data.len() as u16)?,
            Opcode::OP_PUSHDATA4 => writer.write_u32::<LittleEndian>(self.data.len() as u32)?,
            _ => {}
        }
        writer.write_all(&self.data)
    }

    /// Returns the serialized operation
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut v = Vec::with_capacity(self.data.len() + 5);
        // Writing to a vector cannot fail
        let _ = self.write(&mut v);
        v
    }

    /// Returns whether the push uses the smallest possible encoding (BIP62 rule 3)
    ///
    /// Only meaningful for opcodes up to OP_PUSHDATA4.
    pub fn is_minimal_push(&self) -> bool {
        let opcode = u8::from(self.opcode);
        let data = &self.data;
        if data.is_empty() {
            // Should have used OP_0
            return opcode == OP_0;
        }
        if data.len() == 1 && data[0] >= 1 && data[0] <= 16 {
            // Should have used OP_1 .. OP_16
            return false;
        }
        if data.len() == 1 && data[0] == 0x81 {
            // Should have used OP_1NEGATE
            return false;
        }
        if data.len() <= 75 {
            return opcode as usize == data.len();
        }
        if data.len() <= 255 {
            return opcode == OP_PUSHDATA1;
        }
        if data.len() <= 65535 {
            return opcode == OP_PUSHDATA2;
        }
        true
    }

    /// Returns whether the operation pushes a value, OP_RESERVED included
    pub fn is_push(&self) -> bool {
        self.opcode.is_push()
    }

    /// Returns whether the operation counts toward MAX_OPS_PER_SCRIPT
    pub fn is_counted(&self) -> bool {
        self.opcode.is_counted()
    }

    /// Returns whether the operation fails the script wherever it appears
    pub fn is_disabled(&self) -> bool {
        self.opcode.is_disabled()
    }

    /// Returns whether the operation is evaluated inside unexecuted branches
    pub fn is_conditional(&self) -> bool {
        self.opcode.is_conditional()
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.opcode.has_data() && !self.data.is_empty() {
            write!(f, "{} {}", self.opcode, hex::encode(&self.data))
        } else {
            write!(f, "{}", self.opcode)
        }
    }
}

fn bad_push<E>(_: E) -> Error {
    Error::ScriptError(ScriptError::BadPush)
}

/// Decodes a script into its operations
pub fn decode(script: &[u8]) -> Result<Vec<Operation>> {
    let mut ops = Vec::new();
    let mut cursor = Cursor::new(script);
    while (cursor.position() as usize) < script.len() {
        ops.push(Operation::read(&mut cursor)?);
    }
    Ok(ops)
}

/// Serializes a sequence of operations
pub fn encode(ops: &[Operation]) -> Vec<u8> {
    let mut v = Vec::new();
    for op in ops.iter() {
        let _ = op.write(&mut v);
    }
    v
}

/// Steps over the operation starting at `pc`
///
/// Returns the opcode and the index of the following operation. On a truncated push it returns
/// the index where reading stopped, which is past the opcode and any length bytes read.
pub(crate) fn next_op(script: &[u8], pc: usize) -> std::result::Result<(u8, usize), usize> {
    op_bounds(script, pc).map(|(opcode, _, end)| (opcode, end))
}

/// Locates the operation at `pc` as its opcode, the start of its data and its end
fn op_bounds(script: &[u8], pc: usize) -> std::result::Result<(u8, usize, usize), usize> {
    if pc >= script.len() {
        return Err(pc);
    }
    let opcode = script[pc];
    let mut i = pc + 1;
    let prefix = match opcode {
        OP_PUSHDATA1 => 1,
        OP_PUSHDATA2 => 2,
        OP_PUSHDATA4 => 4,
        _ => 0,
    };
    if script.len() - i < prefix {
        return Err(i);
    }
    let len = match opcode {
        len @ 0..=75 => len as usize,
        OP_PUSHDATA1 | OP_PUSHDATA2 | OP_PUSHDATA4 => {
            let mut bytes = &script[i..i + prefix];
            bytes.read_uint::<LittleEndian>(prefix).map_err(|_| i)? as usize
        }
        _ => 0,
    };
    i += prefix;
    if script.len() - i < len {
        return Err(i);
    }
    Ok((opcode, i, i + len))
}

/// Removes every occurrence of `pattern` that starts on an operation boundary
///
/// Returns the number of occurrences removed. Scanning stops at a truncated push, leaving the
/// rest of the script as is.
pub fn find_and_delete(script: &mut Vec<u8>, pattern: &[u8]) -> usize {
    if pattern.is_empty() {
        return 0;
    }
    let mut found = 0;
    let mut result = Vec::with_capacity(script.len());
    let mut pc = 0;
    let mut pc2 = 0;
    loop {
        result.extend_from_slice(&script[pc2..pc]);
        while script.len() - pc >= pattern.len() && script[pc..pc + pattern.len()] == *pattern {
            pc += pattern.len();
            found += 1;
        }
        pc2 = pc;
        match next_op(script, pc) {
            Ok((_, next)) => pc = next,
            Err(_) => break,
        }
    }
    if found > 0 {
        result.extend_from_slice(&script[pc2..]);
        *script = result;
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::Rng;

    #[test]
    fn decode_pushes() {
        let script = hex::decode("0002abcd4c01ff4d0200aabb4e01000000cc51ac").unwrap();
        let ops = decode(&script).unwrap();
        assert_eq!(ops.len(), 7);
        assert_eq!(ops[0], Operation::new(Opcode::OP_0));
        assert_eq!(ops[1].opcode, Opcode::OP_PUSHBYTES(2));
        assert_eq!(ops[1].data, vec![0xab, 0xcd]);
        assert_eq!(ops[2].opcode, Opcode::OP_PUSHDATA1);
        assert_eq!(ops[2].data, vec![0xff]);
        assert_eq!(ops[3].opcode, Opcode::OP_PUSHDATA2);
        assert_eq!(ops[3].data, vec![0xaa, 0xbb]);
        assert_eq!(ops[4].opcode, Opcode::OP_PUSHDATA4);
        assert_eq!(ops[4].data, vec![0xcc]);
        assert_eq!(ops[5].opcode, Opcode::OP_1);
        assert_eq!(ops[6].opcode, Opcode::OP_CHECKSIG);
    }

    #[test]
    fn decode_truncated() {
        let bad = |h: &str| {
            let script = hex::decode(h).unwrap();
            decode(&script).unwrap_err().script_error() == Some(ScriptError::BadPush)
        };
        assert!(bad("02ab"));
        assert!(bad("4c"));
        assert!(bad("4c02ab"));
        assert!(bad("4d01"));
        assert!(bad("4dffff00"));
        assert!(bad("4e010000"));
        assert!(bad("4effffffff"));
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn reencode_keeps_non_minimal() {
        let script = hex::decode("4c0102760087").unwrap();
        let ops = decode(&script).unwrap();
        assert_eq!(encode(&ops), script);
        assert_eq!(decode(&encode(&ops)).unwrap(), ops);
    }

    #[test]
    fn reencode_random_scripts() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let mut ops = vec![Operation::push(&[rng.gen(), rng.gen()])];
            for (opcode, max) in [
                (Opcode::OP_PUSHDATA1, 0x100),
                (Opcode::OP_PUSHDATA2, 0x200),
                (Opcode::OP_PUSHDATA4, 0x40),
            ] {
                let data = vec![rng.gen(); rng.gen_range(0..max)];
                ops.push(Operation { opcode, data });
            }
            for _ in 0..rng.gen_range(0..20) {
                let byte: u8 = rng.gen();
                let len = match byte {
                    1..=75 => byte as usize,
                    OP_PUSHDATA1 => rng.gen_range(0..0x100),
                    OP_PUSHDATA2 => rng.gen_range(0..0x200),
                    OP_PUSHDATA4 => rng.gen_range(0..0x40),
                    _ => 0,
                };
                let data = (0..len).map(|_| rng.gen()).collect();
                ops.push(Operation { opcode: Opcode::from(byte), data });
            }
            ops.shuffle(&mut rng);

            let script = encode(&ops);
            let decoded = decode(&script).unwrap();
            assert_eq!(decoded, ops);
            assert_eq!(encode(&decoded), script);
            assert_eq!(decode(&encode(&decoded)).unwrap(), decoded);
        }

        // Arbitrary bytes that happen to decode
        let mut decoded_count = 0;
        for _ in 0..2000 {
            let script: Vec<u8> = (0..rng.gen_range(0..16)).map(|_| rng.gen()).collect();
            if let Ok(ops) = decode(&script) {
                decoded_count += 1;
                assert_eq!(encode(&ops), script);
                assert_eq!(decode(&encode(&ops)).unwrap(), ops);
            }
        }
        assert!(decoded_count > 0);
    }

    #[test]
    fn push_constructor() {
        assert_eq!(Operation::push(&[]).to_bytes(), vec![0]);
        assert_eq!(Operation::push(&[7]).to_bytes(), vec![1, 7]);
        assert_eq!(Operation::push(&[0; 76]).to_bytes()[..2], [OP_PUSHDATA1, 76]);
        assert_eq!(Operation::push(&[0; 256]).to_bytes()[..3], [OP_PUSHDATA2, 0, 1]);
    }

    #[test]
    fn minimal_pushes() {
        assert!(Operation::new(Opcode::OP_0).is_minimal_push());
        assert!(!Operation { opcode: Opcode::OP_PUSHDATA1, data: vec![] }.is_minimal_push());
        assert!(!Operation::push(&[5]).is_minimal_push());
        assert!(!Operation::push(&[0x81]).is_minimal_push());
        assert!(Operation::push(&[0x80]).is_minimal_push());
        assert!(Operation::push(&[0; 75]).is_minimal_push());
        assert!(Operation::push(&[0; 76]).is_minimal_push());
        assert!(Operation::push(&[0; 300]).is_minimal_push());
        let op = Operation { opcode: Opcode::OP_PUSHDATA1, data: vec![0; 20] };
        assert!(!op.is_minimal_push());
        let op = Operation { opcode: Opcode::OP_PUSHDATA2, data: vec![0; 200] };
        assert!(!op.is_minimal_push());
    }

    #[test]
    fn walk_ops() {
        let script = hex::decode("0201025176").unwrap();
        assert_eq!(next_op(&script, 0), Ok((2, 3)));
        assert_eq!(next_op(&script, 3), Ok((OP_1, 4)));
        assert_eq!(next_op(&script, 4), Ok((OP_DUP, 5)));
        assert_eq!(next_op(&script, 5), Err(5));
        assert_eq!(next_op(&[0x4d, 0x05, 0x00, 0x01], 0), Err(3));
        assert_eq!(next_op(&[0x4d, 0x05], 0), Err(1));
    }

    #[test]
    fn find_and_delete_boundaries() {
        let mut script = hex::decode("0302ff030302ff03").unwrap();
        assert_eq!(find_and_delete(&mut script, &hex::decode("0302ff03").unwrap()), 2);
        assert!(script.is_empty());

        // Pattern inside push data is not an operation boundary
        let mut script = hex::decode("0302ff0351").unwrap();
        assert_eq!(find_and_delete(&mut script, &[0xff, 0x03]), 0);
        assert_eq!(script, hex::decode("0302ff0351").unwrap());

        let mut script = hex::decode("51ab52ab").unwrap();
        assert_eq!(find_and_delete(&mut script, &[OP_CODESEPARATOR]), 2);
        assert_eq!(script, vec![OP_1, OP_2]);

        let mut script = vec![OP_1];
        assert_eq!(find_and_delete(&mut script, &[]), 0);
    }
}
