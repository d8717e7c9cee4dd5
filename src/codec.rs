//! Binary codec for record values.
//!
//! Everything on disk is little-endian: integers at their natural width,
//! doubles as 8-byte IEEE-754, byte strings as a `u32` length followed by
//! the raw bytes. A record type composes these primitives in a fixed field
//! order; decoding reads them back in the same order.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// A value that can be stored in a [`Log`](crate::Log).
///
/// `encode` writes the value to an append sink; `decode` reads one value
/// from a source positioned at the record start. Implementations must
/// write and read the same fields in the same order.
pub trait Record: Sized {
    fn encode<W: Write>(&self, sink: &mut W) -> io::Result<()>;
    fn decode<R: Read>(source: &mut R) -> io::Result<Self>;
}

macro_rules! int_record {
    ($($ty:ty => $write:ident, $read:ident);* $(;)?) => {
        $(
            impl Record for $ty {
                fn encode<W: Write>(&self, sink: &mut W) -> io::Result<()> {
                    sink.$write::<LittleEndian>(*self)
                }

                fn decode<R: Read>(source: &mut R) -> io::Result<Self> {
                    source.$read::<LittleEndian>()
                }
            }
        )*
    };
}

int_record! {
    u16 => write_u16, read_u16;
    u32 => write_u32, read_u32;
    u64 => write_u64, read_u64;
    i16 => write_i16, read_i16;
    i32 => write_i32, read_i32;
    i64 => write_i64, read_i64;
}

impl Record for u8 {
    fn encode<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_u8(*self)
    }

    fn decode<R: Read>(source: &mut R) -> io::Result<Self> {
        source.read_u8()
    }
}

impl Record for i8 {
    fn encode<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_i8(*self)
    }

    fn decode<R: Read>(source: &mut R) -> io::Result<Self> {
        source.read_i8()
    }
}

impl Record for f64 {
    fn encode<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_f64::<LittleEndian>(*self)
    }

    fn decode<R: Read>(source: &mut R) -> io::Result<Self> {
        source.read_f64::<LittleEndian>()
    }
}

impl Record for bool {
    fn encode<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_u8(u8::from(*self))
    }

    fn decode<R: Read>(source: &mut R) -> io::Result<Self> {
        Ok(source.read_u8()? != 0)
    }
}

impl Record for Vec<u8> {
    fn encode<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        write_bytes(sink, self)
    }

    fn decode<R: Read>(source: &mut R) -> io::Result<Self> {
        read_bytes(source)
    }
}

impl Record for String {
    fn encode<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        write_str(sink, self)
    }

    fn decode<R: Read>(source: &mut R) -> io::Result<Self> {
        read_string(source)
    }
}

/// Write a length-prefixed byte string: `u32` length, then the bytes.
pub fn write_bytes<W: Write>(sink: &mut W, bytes: &[u8]) -> io::Result<()> {
    let len = u32::try_from(bytes.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "byte string exceeds u32 length"))?;
    sink.write_u32::<LittleEndian>(len)?;
    sink.write_all(bytes)
}

/// Read a length-prefixed byte string written by [`write_bytes`].
pub fn read_bytes<R: Read>(source: &mut R) -> io::Result<Vec<u8>> {
    let len = source.read_u32::<LittleEndian>()?;
    let mut bytes = vec![0u8; len as usize];
    source.read_exact(&mut bytes)?;
    Ok(bytes)
}

/// Write a UTF-8 string as a length-prefixed byte string.
pub fn write_str<W: Write>(sink: &mut W, s: &str) -> io::Result<()> {
    write_bytes(sink, s.as_bytes())
}

/// Read a length-prefixed string written by [`write_str`].
pub fn read_string<R: Read>(source: &mut R) -> io::Result<String> {
    let bytes = read_bytes(source)?;
    String::from_utf8(bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn roundtrip<T: Record + PartialEq + std::fmt::Debug>(value: T) {
        let mut buf = Vec::new();
        value.encode(&mut buf).unwrap();
        let decoded = T::decode(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn primitive_roundtrips() {
        roundtrip(0u8);
        roundtrip(255u8);
        roundtrip(54321u16);
        roundtrip(0xDEAD_BEEFu32);
        roundtrip(u64::MAX);
        roundtrip(-7i8);
        roundtrip(-30000i16);
        roundtrip(i32::MIN);
        roundtrip(i64::MIN);
        roundtrip(3.141592653589793f64);
        roundtrip(true);
        roundtrip(false);
        roundtrip(String::from("hello, log"));
        roundtrip(String::new());
        roundtrip(vec![0u8, 1, 2, 3, 255]);
    }

    #[test]
    fn string_layout_is_length_prefixed() {
        let mut buf = Vec::new();
        String::from("abc").encode(&mut buf).unwrap();
        assert_eq!(buf, [3, 0, 0, 0, b'a', b'b', b'c']);
    }

    #[test]
    fn integers_are_little_endian() {
        let mut buf = Vec::new();
        0x0102_0304u32.encode(&mut buf).unwrap();
        assert_eq!(buf, [0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn composite_fields_decode_in_order() {
        struct Sample {
            id: u32,
            score: f64,
            tag: String,
        }

        impl Record for Sample {
            fn encode<W: Write>(&self, sink: &mut W) -> io::Result<()> {
                self.id.encode(sink)?;
                self.score.encode(sink)?;
                self.tag.encode(sink)
            }

            fn decode<R: Read>(source: &mut R) -> io::Result<Self> {
                Ok(Sample {
                    id: u32::decode(source)?,
                    score: f64::decode(source)?,
                    tag: String::decode(source)?,
                })
            }
        }

        let mut buf = Vec::new();
        let sample = Sample { id: 9, score: 2.5, tag: "t".into() };
        sample.encode(&mut buf).unwrap();

        let back = Sample::decode(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(back.id, 9);
        assert_eq!(back.score, 2.5);
        assert_eq!(back.tag, "t");
    }

    #[test]
    fn short_input_fails() {
        let mut buf = Vec::new();
        String::from("abcdef").encode(&mut buf).unwrap();
        buf.truncate(6);
        assert!(String::decode(&mut Cursor::new(&buf)).is_err());
    }
}
