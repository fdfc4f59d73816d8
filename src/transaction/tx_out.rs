use crate::amount::Amount;
use crate::result::Result;
use crate::script::Script;
use crate::serdes::Serializable;
use crate::var_int;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;
use std::io::{Read, Write};

/// Transaction output
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct TxOut {
    /// Number of satoshis to spend
    pub amount: Amount,
    /// Public key script to claim the output
    pub pk_script: Script,
}

impl TxOut {
    /// Returns the size of the transaction output in bytes
    pub fn size(&self) -> usize {
        8 + var_int::size(self.pk_script.0.len() as u64) + self.pk_script.0.len()
    }
}

impl Serializable<TxOut> for TxOut {
    fn read(reader: &mut dyn Read) -> Result<TxOut> {
        let amount = Amount(reader.read_i64::<LittleEndian>()?);
        let pk_script = Script(var_int::read_bytes(reader)?);
        Ok(TxOut { amount, pk_script })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_i64::<LittleEndian>(self.amount.0)?;
        var_int::write(self.pk_script.0.len() as u64, writer)?;
        writer.write_all(&self.pk_script.0)
    }
}
