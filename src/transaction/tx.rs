use super::out_point::OutPoint;
use super::tx_in::TxIn;
use super::tx_out::TxOut;
use crate::amount::MAX_SATOSHIS;
use crate::hash256::{sha256d, Hash256};
use crate::result::{Error, Result};
use crate::script::{verify_script, RuleFlags, TransactionChecker};
use crate::serdes::Serializable;
use crate::var_int;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io;
use std::io::{Read, Write};

/// Flag byte following the zero marker in the segwit serialization
const WITNESS_FLAG: u8 = 0x01;

/// Bitcoin transaction
#[derive(Default, PartialEq, Eq, Hash, Clone)]
pub struct Tx {
    /// Transaction version
    pub version: u32,
    /// Transaction inputs
    pub inputs: Vec<TxIn>,
    /// Transaction outputs
    pub outputs: Vec<TxOut>,
    /// The block number or timestamp at which this transaction is unlocked
    pub lock_time: u32,
}

impl Tx {
    /// Calculates the hash of the transaction without witness data, also known as the txid
    pub fn hash(&self) -> Hash256 {
        let mut b = Vec::with_capacity(self.base_size());
        // Writing to a vector cannot fail
        let _ = self.write_base(&mut b);
        sha256d(&b)
    }

    /// Calculates the hash of the full serialization, also known as the wtxid
    pub fn witness_hash(&self) -> Hash256 {
        let mut b = Vec::with_capacity(self.size());
        let _ = self.write(&mut b);
        sha256d(&b)
    }

    /// Returns whether any input carries witness data
    pub fn has_witness(&self) -> bool {
        self.inputs.iter().any(|tx_in| !tx_in.witness.is_empty())
    }

    /// Returns the serialized size in bytes, witness data included
    pub fn size(&self) -> usize {
        if !self.has_witness() {
            return self.base_size();
        }
        let witness: usize = self.inputs.iter().map(|tx_in| tx_in.witness_size()).sum();
        self.base_size() + 2 + witness
    }

    /// Returns the serialized size in bytes without witness data
    pub fn base_size(&self) -> usize {
        let mut size = 8;
        size += var_int::size(self.inputs.len() as u64);
        for tx_in in self.inputs.iter() {
            size += tx_in.size();
        }
        size += var_int::size(self.outputs.len() as u64);
        for tx_out in self.outputs.iter() {
            size += tx_out.size();
        }
        size
    }

    /// Validates a non-coinbase transaction against the outputs it spends
    pub fn validate(&self, utxos: &HashMap<OutPoint, TxOut>) -> Result<()> {
        // Make sure neither in or out lists are empty
        if self.inputs.is_empty() {
            return Err(Error::BadData("inputs empty".to_string()));
        }
        if self.outputs.is_empty() {
            return Err(Error::BadData("outputs empty".to_string()));
        }

        // Each output value, as well as the total, must be in legal money range
        let mut total_out = 0;
        for tx_out in self.outputs.iter() {
            if !tx_out.amount.is_valid() {
                return Err(Error::BadData("tx_out amount out of range".to_string()));
            }
            total_out += tx_out.amount.0;
        }
        if total_out > MAX_SATOSHIS {
            return Err(Error::BadData("Total out exceeds max satoshis".to_string()));
        }

        // Make sure none of the inputs are coinbase or spent twice
        let mut spent = HashSet::with_capacity(self.inputs.len());
        for tx_in in self.inputs.iter() {
            if tx_in.prev_output.is_coinbase() {
                return Err(Error::BadData("Unexpected coinbase".to_string()));
            }
            if !spent.insert(&tx_in.prev_output) {
                return Err(Error::BadData("Duplicate input".to_string()));
            }
        }

        // Check that all inputs are in the utxo set and are in legal money range
        let mut total_in = 0;
        for tx_in in self.inputs.iter() {
            match utxos.get(&tx_in.prev_output) {
                Some(tx_out) => {
                    if !tx_out.amount.is_valid() {
                        return Err(Error::BadData("utxo amount out of range".to_string()));
                    }
                    total_in += tx_out.amount.0;
                }
                None => return Err(Error::BadData("utxo not found".to_string())),
            }
        }
        if total_in > MAX_SATOSHIS {
            return Err(Error::BadData("Total in exceeds max satoshis".to_string()));
        }

        // Check inputs spent > outputs received
        if total_in < total_out {
            return Err(Error::BadData("Output total exceeds input".to_string()));
        }

        Ok(())
    }

    /// Returns whether the transaction is the block reward
    pub fn coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].prev_output.is_coinbase()
    }

    /// Verifies that input `index` may spend `prevout`
    pub fn verify_input(&self, index: usize, prevout: &TxOut, flags: RuleFlags) -> Result<()> {
        let mut checker = TransactionChecker::new(self, index, prevout.amount)?;
        let tx_in = &self.inputs[index];
        let result = verify_script(
            &tx_in.sig_script.0,
            &prevout.pk_script.0,
            &tx_in.witness,
            flags,
            &mut checker,
        );
        if let Err(e) = &result {
            debug!("Input {} failed verification: {}", index, e);
        }
        result
    }

    /// Verifies every input in parallel, `prevouts` holding the spent output of each in order
    pub fn verify_inputs(&self, prevouts: &[TxOut], flags: RuleFlags) -> Result<()> {
        if prevouts.len() != self.inputs.len() {
            let msg = format!("{} prevouts for {} inputs", prevouts.len(), self.inputs.len());
            return Err(Error::BadArgument(msg));
        }
        prevouts
            .par_iter()
            .enumerate()
            .try_for_each(|(index, prevout)| self.verify_input(index, prevout, flags))
    }

    fn write_base(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.version)?;
        var_int::write(self.inputs.len() as u64, writer)?;
        for tx_in in self.inputs.iter() {
            tx_in.write(writer)?;
        }
        var_int::write(self.outputs.len() as u64, writer)?;
        for tx_out in self.outputs.iter() {
            tx_out.write(writer)?;
        }
        writer.write_u32::<LittleEndian>(self.lock_time)
    }
}

impl Serializable<Tx> for Tx {
    fn read(reader: &mut dyn Read) -> Result<Tx> {
        let version = reader.read_u32::<LittleEndian>()?;
        let mut n_inputs = var_int::read(reader)?;
        let mut segwit = false;
        if n_inputs == 0 {
            // Zero marker, then the flag
            let flag = reader.read_u8()?;
            if flag != WITNESS_FLAG {
                return Err(Error::BadData(format!("Unknown segwit flag {}", flag)));
            }
            segwit = true;
            n_inputs = var_int::read(reader)?;
        }
        let mut inputs = Vec::new();
        for _i in 0..n_inputs {
            inputs.push(TxIn::read(reader)?);
        }
        let n_outputs = var_int::read(reader)?;
        let mut outputs = Vec::new();
        for _i in 0..n_outputs {
            outputs.push(TxOut::read(reader)?);
        }
        if segwit {
            for tx_in in inputs.iter_mut() {
                tx_in.read_witness(reader)?;
            }
        }
        let lock_time = reader.read_u32::<LittleEndian>()?;
        let tx = Tx {
            version,
            inputs,
            outputs,
            lock_time,
        };
        if segwit && !tx.has_witness() {
            return Err(Error::BadData("Superfluous witness record".to_string()));
        }
        Ok(tx)
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        if !self.has_witness() {
            return self.write_base(writer);
        }
        writer.write_u32::<LittleEndian>(self.version)?;
        writer.write_u8(0)?;
        writer.write_u8(WITNESS_FLAG)?;
        var_int::write(self.inputs.len() as u64, writer)?;
        for tx_in in self.inputs.iter() {
            tx_in.write(writer)?;
        }
        var_int::write(self.outputs.len() as u64, writer)?;
        for tx_out in self.outputs.iter() {
            tx_out.write(writer)?;
        }
        for tx_in in self.inputs.iter() {
            tx_in.write_witness(writer)?;
        }
        writer.write_u32::<LittleEndian>(self.lock_time)
    }
}

impl fmt::Debug for Tx {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let inputs_str = format!("[<{} inputs>]", self.inputs.len());
        let outputs_str = format!("[<{} outputs>]", self.outputs.len());

        f.debug_struct("Tx")
            .field("version", &self.version)
            .field(
                "inputs",
                if self.inputs.len() <= 3 {
                    &self.inputs
                } else {
                    &inputs_str
                },
            )
            .field(
                "outputs",
                if self.outputs.len() <= 3 {
                    &self.outputs
                } else {
                    &outputs_str
                },
            )
            .field("lock_time", &self.lock_time)
            .finish()
    }
}
