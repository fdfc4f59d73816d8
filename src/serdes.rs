use std::io;
use std::io::{Read, Write};
use super::result::Result;

/// An object that may be serialized and deserialized
pub trait Serializable<T> {
    /// Reads the object from serialized form
    fn read(reader: &mut dyn Read) -> Result<T>
    where
        Self: Sized;

    /// Writes the object to serialized form
    fn write(&self, writer: &mut dyn Write) -> io::Result<()>;
}
