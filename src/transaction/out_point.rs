use crate::hash256::Hash256;
use crate::result::Result;
use crate::serdes::Serializable;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;
use std::io::{Read, Write};

/// The coinbase transaction input will have this hash
pub const COINBASE_OUTPOINT_HASH: Hash256 = Hash256([0; 32]);
/// The coinbase transaction input will have this index
pub const COINBASE_OUTPOINT_INDEX: u32 = 0xffffffff;

/// Reference to a transaction output
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct OutPoint {
    /// Hash of the referenced transaction
    pub hash: Hash256,
    /// Index of the output in the transaction, zero-indexed
    pub index: u32,
}

impl OutPoint {
    /// Size of the out point in bytes
    pub const SIZE: usize = 36;

    /// Returns whether this is the null out point spent by coinbase transactions
    pub fn is_coinbase(&self) -> bool {
        self.hash == COINBASE_OUTPOINT_HASH && self.index == COINBASE_OUTPOINT_INDEX
    }
}

impl Serializable<OutPoint> for OutPoint {
    fn read(reader: &mut dyn Read) -> Result<OutPoint> {
        let hash = Hash256::read(reader)?;
        let index = reader.read_u32::<LittleEndian>()?;
        Ok(OutPoint { hash, index })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        self.hash.write(writer)?;
        writer.write_u32::<LittleEndian>(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn write_read() {
        let out_point = OutPoint {
            hash: Hash256([7; 32]),
            index: 0x01020304,
        };
        let mut v = Vec::new();
        out_point.write(&mut v).unwrap();
        assert_eq!(v.len(), OutPoint::SIZE);
        assert_eq!(&v[32..], &[4, 3, 2, 1]);
        assert_eq!(OutPoint::read(&mut Cursor::new(&v)).unwrap(), out_point);
        assert!(OutPoint::read(&mut Cursor::new(&v[..35])).is_err());
    }

    #[test]
    fn coinbase() {
        let out_point = OutPoint {
            hash: COINBASE_OUTPOINT_HASH,
            index: COINBASE_OUTPOINT_INDEX,
        };
        assert!(out_point.is_coinbase());
        assert!(!OutPoint::default().is_coinbase());
    }
}
