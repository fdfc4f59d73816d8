//! Variable length integers, also known as compact sizes

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;
use std::io::{Read, Write};
use super::result::{Error, Result};

/// Returns the number of bytes needed to serialize n
pub fn size(n: u64) -> usize {
    if n <= 252 {
        1
    } else if n <= 0xffff {
        3
    } else if n <= 0xffffffff {
        5
    } else {
        9
    }
}

/// Writes a var int
pub fn write(n: u64, writer: &mut dyn Write) -> io::Result<()> {
    if n <= 252 {
        writer.write_u8(n as u8)?;
    } else if n <= 0xffff {
        writer.write_u8(0xfd)?;
        writer.write_u16::<LittleEndian>(n as u16)?;
    } else if n <= 0xffffffff {
        writer.write_u8(0xfe)?;
        writer.write_u32::<LittleEndian>(n as u32)?;
    } else {
        writer.write_u8(0xff)?;
        writer.write_u64::<LittleEndian>(n)?;
    }
    Ok(())
}

/// Reads a var int, rejecting encodings that are not the shortest possible
pub fn read(reader: &mut dyn Read) -> Result<u64> {
    let n0 = reader.read_u8()?;
    let (n, min) = match n0 {
        0xff => (reader.read_u64::<LittleEndian>()?, 0x100000000),
        0xfe => (reader.read_u32::<LittleEndian>()? as u64, 0x10000),
        0xfd => (reader.read_u16::<LittleEndian>()? as u64, 0xfd),
        _ => return Ok(n0 as u64),
    };
    if n < min {
        return Err(Error::BadData(format!("Non-canonical var int {}", n)));
    }
    Ok(n)
}

/// Largest byte string read behind a var int length, the maximum serialized block size
pub const MAX_BYTES_LEN: u64 = 4_000_000;

/// Reads a var int length followed by that many bytes
pub fn read_bytes(reader: &mut dyn Read) -> Result<Vec<u8>> {
    let len = read(reader)?;
    if len > MAX_BYTES_LEN {
        return Err(Error::BadData(format!("Length {} too large", len)));
    }
    let mut bytes = vec![0; len as usize];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}
