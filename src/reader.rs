//! Bounds-checked primitive reads over the source buffer.
//!
//! Every multi-byte value in an IFD is stored in the byte order declared by
//! the enclosing container, so each read is parameterized by [`ByteOrder`].
//! Reads never panic on malformed input; a read past the end of the buffer
//! yields [`ErrorKind::OutOfBounds`].

use crate::error::ErrorKind;
use crate::tags::Type;
use crate::value::Scalar;

/// Byte order of the enclosing TIFF container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

macro_rules! read_fn {
    ($name:ident, $type:ty) => {
        #[inline]
        pub(crate) fn $name(self, buffer: &[u8], offset: usize) -> Result<$type, ErrorKind> {
            let bytes = read_slice(buffer, offset, std::mem::size_of::<$type>())?;
            let bytes = bytes.try_into().expect("slice length checked above");
            Ok(match self {
                ByteOrder::LittleEndian => <$type>::from_le_bytes(bytes),
                ByteOrder::BigEndian => <$type>::from_be_bytes(bytes),
            })
        }
    };
}

impl ByteOrder {
    read_fn!(read_u16, u16);
    read_fn!(read_u32, u32);
    read_fn!(read_i16, i16);
    read_fn!(read_i32, i32);
}

/// Extract `len` bytes starting at `offset`, verifying both ends.
pub(crate) fn read_slice(buffer: &[u8], offset: usize, len: usize) -> Result<&[u8], ErrorKind> {
    match offset.checked_add(len) {
        Some(end) if end <= buffer.len() => Ok(&buffer[offset..end]),
        _ => Err(ErrorKind::OutOfBounds {
            at: offset,
            len,
            buffer_len: buffer.len(),
        }),
    }
}

/// Decode a fixed-length ASCII run as text.
///
/// Values are conventionally NUL-terminated; anything from the first NUL
/// onwards is dropped.
pub(crate) fn read_ascii(buffer: &[u8], offset: usize, count: usize) -> Result<String, ErrorKind> {
    let mut bytes = read_slice(buffer, offset, count)?.to_vec();
    if let Some(terminator) = bytes.iter().position(|&b| b == 0) {
        bytes.truncate(terminator);
    }
    Ok(String::from_utf8(bytes)?)
}

/// Decode `count` fixed-width values of a numeric primitive type.
///
/// `ASCII` and `UNDEFINED` entries never reach this function; they are
/// handled by the entry decoder directly.
pub(crate) fn read_scalars(
    buffer: &[u8],
    offset: usize,
    type_: Type,
    count: usize,
    byte_order: ByteOrder,
) -> Result<Vec<Scalar>, ErrorKind> {
    let width = type_.byte_len();
    // One up-front check so a huge count fails before any allocation. A
    // multiplication overflow cannot fit in any buffer either.
    let payload_len = width.checked_mul(count).unwrap_or(usize::MAX);
    read_slice(buffer, offset, payload_len)?;

    let mut values = Vec::with_capacity(count);
    for i in 0..count {
        let at = offset + i * width;
        values.push(match type_ {
            Type::BYTE => Scalar::Byte(buffer[at]),
            Type::SHORT => Scalar::Short(byte_order.read_u16(buffer, at)?),
            Type::LONG => Scalar::Long(byte_order.read_u32(buffer, at)?),
            Type::RATIONAL => Scalar::Rational(
                byte_order.read_u32(buffer, at)?,
                byte_order.read_u32(buffer, at + 4)?,
            ),
            Type::SBYTE => Scalar::SByte(buffer[at] as i8),
            Type::SSHORT => Scalar::SShort(byte_order.read_i16(buffer, at)?),
            Type::SLONG => Scalar::SLong(byte_order.read_i32(buffer, at)?),
            Type::SRATIONAL => Scalar::SRational(
                byte_order.read_i32(buffer, at)?,
                byte_order.read_i32(buffer, at + 4)?,
            ),
            Type::ASCII | Type::UNDEFINED => unreachable!("handled by the entry decoder"),
        });
    }
    Ok(values)
}
