//! Decoding of TIFF-style Image File Directories (IFDs)
//!
//! An IFD is the structural unit shared by TIFF-derived metadata formats:
//! the main image directory of an EXIF block, the EXIF private sub-IFD, the
//! GPS info sub-IFD and the interoperability sub-IFD all use the same
//! layout. This crate decodes one such directory from a byte buffer into a
//! map of tag keys to typed values, following the format's inline/indirect
//! payload rule and reporting the trailing next-directory offset.
//!
//! Locating the first directory (byte-order detection, container headers)
//! and assembling several directories into a metadata tree are the caller's
//! business.
//!
//! ```
//! use exif_ifd::{read_ifd, ByteOrder, ReadOptions, TagTable};
//!
//! // count=1, one SHORT entry (orientation = 6), next offset 0
//! let buffer = [
//!     0x01, 0x00, // entry count
//!     0x12, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00,
//!     0x00, 0x00, 0x00, 0x00, // next IFD offset
//! ];
//!
//! let out = read_ifd(
//!     &buffer,
//!     0,
//!     ByteOrder::LittleEndian,
//!     &TagTable::EXIF,
//!     &ReadOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(out.ifd.get_named("orientation").unwrap().as_u32(), Some(6));
//! assert_eq!(out.next, Some(0));
//! ```
//!
//! # Related Links
//! * <https://web.archive.org/web/20210108073850/https://www.adobe.io/open/standards/TIFF.html> - The TIFF specification
//! * <https://www.w3.org/2003/12/exif/> - The EXIF vocabulary used for tag names

mod date;
mod error;
mod ifd;
mod reader;
mod tags;
mod value;

pub use self::date::{is_date_tag, parse_date, ExifDateTime};
pub use self::error::{ErrorKind, IfdError, IfdResult};
pub use self::ifd::{read_ifd, ErrorMode, Ifd, IfdRead, ReadOptions};
pub use self::reader::ByteOrder;
pub use self::tags::{
    TagKey, TagTable, Type, EXIF_IFD_POINTER, GPS_INFO_IFD_POINTER, INTEROPERABILITY_IFD_POINTER,
    PRINT_IMAGE_MATCHING_IFD_POINTER,
};
pub use self::value::{Scalar, Value};

/// The vocabulary the tag names are drawn from, emitted as the `@vocab`
/// context marker by [`Ifd::to_json`].
pub const EXIF_VOCABULARY: &str = "http://www.w3.org/2003/12/exif/ns#";
