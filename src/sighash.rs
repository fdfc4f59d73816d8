//! Transaction sighash helpers

use super::amount::Amount;
use super::hash256::{sha256d, Hash256};
use super::result::{Error, Result};
use super::script::op_codes::OP_CODESEPARATOR;
use super::script::{next_op, SigVersion};
use super::transaction::{OutPoint, Tx, TxOut};
use super::var_int;
use crate::serdes::Serializable;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io;
use std::io::Write;

/// Signs all of the outputs
pub const SIGHASH_ALL: u8 = 0x01;
/// Sign none of the outputs so that they may be spent anywhere
pub const SIGHASH_NONE: u8 = 0x02;
/// Sign only the output paired with the input
pub const SIGHASH_SINGLE: u8 = 0x03;
/// Sign only this input so others may add inputs to the transaction
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;

/// Digest returned by the legacy algorithm when there is nothing valid to sign
///
/// This is the number one as a little-endian 256-bit value. Signatures over it are valid.
pub const SIGHASH_ONE: Hash256 = Hash256([
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0,
]);

/// Cache for sighash intermediate values to avoid quadratic hashing
///
/// This is only valid for one transaction, but may be used for multiple signatures.
#[derive(Default)]
pub struct SigHashCache {
    hash_prevouts: Option<Hash256>,
    hash_sequence: Option<Hash256>,
    hash_outputs: Option<Hash256>,
}

impl SigHashCache {
    /// Creates a new cache
    pub fn new() -> SigHashCache {
        SigHashCache {
            hash_prevouts: None,
            hash_sequence: None,
            hash_outputs: None,
        }
    }
}

/// Generates the transaction digest for a signature check under the given script version
pub fn sighash(
    tx: &Tx,
    n_input: usize,
    script_code: &[u8],
    amount: Amount,
    sighash_type: u32,
    version: SigVersion,
    cache: &mut SigHashCache,
) -> Result<Hash256> {
    match version {
        SigVersion::Base => legacy_sighash(tx, n_input, script_code, sighash_type),
        SigVersion::WitnessV0 => {
            bip143_sighash(tx, n_input, script_code, amount, sighash_type, cache)
        }
    }
}

/// Generates a transaction digest for signing using the pre-segwit algorithm
///
/// Out of range inputs, and SIGHASH_SINGLE without a matching output, produce [`SIGHASH_ONE`]
/// rather than an error. Every OP_CODESEPARATOR is removed from the script code.
pub fn legacy_sighash(
    tx: &Tx,
    n_input: usize,
    script_code: &[u8],
    sighash_type: u32,
) -> Result<Hash256> {
    if n_input >= tx.inputs.len() {
        debug!("sighash input {} out of range {}", n_input, tx.inputs.len());
        return Ok(SIGHASH_ONE);
    }
    let base_type = sighash_type & 0x1f;
    let single = base_type == SIGHASH_SINGLE as u32;
    let none = base_type == SIGHASH_NONE as u32;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY as u32 != 0;
    if single && n_input >= tx.outputs.len() {
        debug!("sighash single input {} without output", n_input);
        return Ok(SIGHASH_ONE);
    }

    let mut s = Vec::with_capacity(tx.size());
    s.write_u32::<LittleEndian>(tx.version)?;

    // Inputs
    let inputs = if anyone_can_pay {
        n_input..n_input + 1
    } else {
        0..tx.inputs.len()
    };
    var_int::write(inputs.len() as u64, &mut s)?;
    for i in inputs {
        let tx_in = &tx.inputs[i];
        tx_in.prev_output.write(&mut s)?;
        if i == n_input {
            write_script_code(script_code, &mut s)?;
        } else {
            var_int::write(0, &mut s)?;
        }
        if i != n_input && (single || none) {
            s.write_u32::<LittleEndian>(0)?;
        } else {
            s.write_u32::<LittleEndian>(tx_in.sequence)?;
        }
    }

    // Outputs
    let n_outputs = if none {
        0
    } else if single {
        n_input + 1
    } else {
        tx.outputs.len()
    };
    var_int::write(n_outputs as u64, &mut s)?;
    let null_output = TxOut {
        amount: Amount::NULL,
        ..Default::default()
    };
    for i in 0..n_outputs {
        if single && i != n_input {
            null_output.write(&mut s)?;
        } else {
            tx.outputs[i].write(&mut s)?;
        }
    }

    s.write_u32::<LittleEndian>(tx.lock_time)?;
    s.write_u32::<LittleEndian>(sighash_type)?;
    Ok(sha256d(&s))
}

/// Writes the script code with its length, leaving out every OP_CODESEPARATOR
///
/// The length excludes separators found before a truncated push, and bytes after the point
/// where the truncated push stopped decoding are dropped.
fn write_script_code(script: &[u8], s: &mut dyn Write) -> io::Result<()> {
    let mut separators = 0;
    let mut pc = 0;
    while let Ok((opcode, next)) = next_op(script, pc) {
        if opcode == OP_CODESEPARATOR {
            separators += 1;
        }
        pc = next;
    }
    var_int::write((script.len() - separators) as u64, s)?;

    let mut begin = 0;
    let mut pc = 0;
    let end = loop {
        match next_op(script, pc) {
            Ok((opcode, next)) => {
                if opcode == OP_CODESEPARATOR {
                    s.write_all(&script[begin..next - 1])?;
                    begin = next;
                }
                pc = next;
            }
            Err(stop) => break stop,
        }
    };
    if begin != script.len() {
        s.write_all(&script[begin..end])?;
    }
    Ok(())
}

/// Generates a transaction digest for signing using BIP-143
///
/// This is to be used for version 0 witness scripts.
/// It avoids quadratic hashing and commits to the amount spent.
pub fn bip143_sighash(
    tx: &Tx,
    n_input: usize,
    script_code: &[u8],
    amount: Amount,
    sighash_type: u32,
    cache: &mut SigHashCache,
) -> Result<Hash256> {
    if n_input >= tx.inputs.len() {
        return Err(Error::BadArgument("input out of tx_in range".to_string()));
    }

    let mut s = Vec::with_capacity(tx.size());
    let base_type = sighash_type & 0x1f;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY as u32 != 0;
    let single = base_type == SIGHASH_SINGLE as u32;
    let none = base_type == SIGHASH_NONE as u32;

    // 1. Serialize version
    s.write_u32::<LittleEndian>(tx.version)?;

    // 2. Serialize hash of prevouts
    if !anyone_can_pay {
        let hash_prevouts = match cache.hash_prevouts {
            Some(hash) => hash,
            None => {
                let mut prev_outputs = Vec::with_capacity(OutPoint::SIZE * tx.inputs.len());
                for input in tx.inputs.iter() {
                    input.prev_output.write(&mut prev_outputs)?;
                }
                let hash = sha256d(&prev_outputs);
                cache.hash_prevouts = Some(hash);
                hash
            }
        };
        s.write_all(&hash_prevouts.0)?;
    } else {
        s.write_all(&[0; 32])?;
    }

    // 3. Serialize hash of sequences
    if !anyone_can_pay && !single && !none {
        let hash_sequence = match cache.hash_sequence {
            Some(hash) => hash,
            None => {
                let mut sequences = Vec::with_capacity(4 * tx.inputs.len());
                for tx_in in tx.inputs.iter() {
                    sequences.write_u32::<LittleEndian>(tx_in.sequence)?;
                }
                let hash = sha256d(&sequences);
                cache.hash_sequence = Some(hash);
                hash
            }
        };
        s.write_all(&hash_sequence.0)?;
    } else {
        s.write_all(&[0; 32])?;
    }

    // 4. Serialize prev output
    tx.inputs[n_input].prev_output.write(&mut s)?;

    // 5. Serialize input script
    var_int::write(script_code.len() as u64, &mut s)?;
    s.write_all(script_code)?;

    // 6. Serialize amount
    s.write_i64::<LittleEndian>(amount.0)?;

    // 7. Serialize sequence
    s.write_u32::<LittleEndian>(tx.inputs[n_input].sequence)?;

    // 8. Serialize hash of outputs
    if !single && !none {
        let hash_outputs = match cache.hash_outputs {
            Some(hash) => hash,
            None => {
                let size = tx.outputs.iter().map(|tx_out| tx_out.size()).sum();
                let mut outputs = Vec::with_capacity(size);
                for tx_out in tx.outputs.iter() {
                    tx_out.write(&mut outputs)?;
                }
                let hash = sha256d(&outputs);
                cache.hash_outputs = Some(hash);
                hash
            }
        };
        s.write_all(&hash_outputs.0)?;
    } else if single && n_input < tx.outputs.len() {
        let mut outputs = Vec::with_capacity(tx.outputs[n_input].size());
        tx.outputs[n_input].write(&mut outputs)?;
        s.write_all(&sha256d(&outputs).0)?;
    } else {
        s.write_all(&[0; 32])?;
    }

    // 9. Serialize lock_time
    s.write_u32::<LittleEndian>(tx.lock_time)?;

    // 10. Serialize hash type
    s.write_u32::<LittleEndian>(sighash_type)?;

    Ok(sha256d(&s))
}
