use super::out_point::OutPoint;
use crate::result::Result;
use crate::script::Script;
use crate::serdes::Serializable;
use crate::var_int;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;
use std::io::{Read, Write};

/// Transaction input
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct TxIn {
    /// The previous output transaction reference
    pub prev_output: OutPoint,
    /// Signature script for confirming authorization
    pub sig_script: Script,
    /// Transaction version as defined by the sender for replacement or negotiation
    pub sequence: u32,
    /// Witness stack, serialized separately after the outputs
    pub witness: Vec<Vec<u8>>,
}

impl TxIn {
    /// Returns the size of the transaction input in bytes, excluding the witness
    pub fn size(&self) -> usize {
        OutPoint::SIZE + var_int::size(self.sig_script.0.len() as u64) + self.sig_script.0.len() + 4
    }

    /// Returns the size of the serialized witness in bytes
    pub fn witness_size(&self) -> usize {
        let items: usize = self
            .witness
            .iter()
            .map(|item| var_int::size(item.len() as u64) + item.len())
            .sum();
        var_int::size(self.witness.len() as u64) + items
    }

    /// Reads the witness stack for this input
    pub fn read_witness(&mut self, reader: &mut dyn Read) -> Result<()> {
        let n_items = var_int::read(reader)?;
        let mut witness = Vec::new();
        for _i in 0..n_items {
            witness.push(var_int::read_bytes(reader)?);
        }
        self.witness = witness;
        Ok(())
    }

    /// Writes the witness stack for this input
    pub fn write_witness(&self, writer: &mut dyn Write) -> io::Result<()> {
        var_int::write(self.witness.len() as u64, writer)?;
        for item in self.witness.iter() {
            var_int::write(item.len() as u64, writer)?;
            writer.write_all(item)?;
        }
        Ok(())
    }
}

impl Serializable<TxIn> for TxIn {
    fn read(reader: &mut dyn Read) -> Result<TxIn> {
        let prev_output = OutPoint::read(reader)?;
        let sig_script = Script(var_int::read_bytes(reader)?);
        let sequence = reader.read_u32::<LittleEndian>()?;
        Ok(TxIn {
            prev_output,
            sig_script,
            sequence,
            witness: Vec::new(),
        })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        self.prev_output.write(writer)?;
        var_int::write(self.sig_script.0.len() as u64, writer)?;
        writer.write_all(&self.sig_script.0)?;
        writer.write_u32::<LittleEndian>(self.sequence)
    }
}
