//! Decoding of one Image File Directory.
//!
//! An IFD is a 2-byte entry count, `count` entries of 12 bytes each
//! (`tag:2, type:2, count:4, value-or-offset:4`), and a trailing 4-byte
//! offset to the next directory in the chain (`0` by convention when there
//! is none). An entry's payload is stored inline in its last 4 bytes when
//! it fits, otherwise those bytes hold an absolute offset into the source
//! buffer.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::date::{is_date_tag, parse_date};
use crate::error::{ErrorKind, IfdError, IfdResult};
use crate::reader::{read_ascii, read_scalars, read_slice, ByteOrder};
use crate::tags::{
    TagKey, TagTable, Type, EXIF_IFD_POINTER, GPS_INFO_IFD_POINTER, INTEROPERABILITY_IFD_POINTER,
    PRINT_IMAGE_MATCHING_IFD_POINTER,
};
use crate::value::Value;

/// Size of one directory entry in bytes.
const ENTRY_SIZE: usize = 12;

/// How the decoder reacts to a failing entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// The first failure aborts the whole decode.
    #[default]
    FailFast,
    /// Failures are collected in [`IfdRead::errors`]; decoding continues
    /// with the next entry, leaving a hole for the failed tag.
    Collect,
}

/// Options for one decode call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Timezone the date-classified tags are anchored to. EXIF timestamps
    /// carry no timezone of their own.
    pub timezone: Option<chrono::FixedOffset>,
    /// Fail-fast or fault-tolerant decoding.
    pub mode: ErrorMode,
}

/// The outcome of one decode call.
#[derive(Debug, Default)]
pub struct IfdRead {
    /// The decoded directory, possibly partial in [`ErrorMode::Collect`].
    pub ifd: Ifd,
    /// The trailing next-directory offset, passed through unchanged
    /// (`Some(0)` conventionally means "no next directory" but interpreting
    /// it is the caller's business). `None` only if the trailing read
    /// itself failed in [`ErrorMode::Collect`].
    pub next: Option<u32>,
    /// Per-entry failures tolerated in [`ErrorMode::Collect`]; always empty
    /// in [`ErrorMode::FailFast`].
    pub errors: Vec<IfdError>,
}

/// One decoded Image File Directory: a map of tag keys to decoded values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ifd {
    tags: BTreeMap<TagKey, Value>,
}

impl Ifd {
    /// An empty directory.
    pub fn new() -> Self {
        Ifd::default()
    }

    /// Retrieve the value stored for a key.
    pub fn get(&self, key: &TagKey) -> Option<&Value> {
        self.tags.get(key)
    }

    /// Retrieve the value stored for a resolved tag name.
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        // Keys borrow from static tables, so a by-name lookup has to scan.
        self.tags
            .iter()
            .find(|(key, _)| matches!(key, TagKey::Named(n) if *n == name))
            .map(|(_, value)| value)
    }

    /// Iterate over all decoded tags in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&TagKey, &Value)> + '_ {
        self.tags.iter()
    }

    /// Number of decoded tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Offset of the EXIF sub-IFD, if the pointer tag was decoded.
    pub fn exif_pointer(&self) -> Option<u32> {
        self.pointer(EXIF_IFD_POINTER)
    }

    /// Offset of the GPS info sub-IFD, if the pointer tag was decoded.
    pub fn gps_info_pointer(&self) -> Option<u32> {
        self.pointer(GPS_INFO_IFD_POINTER)
    }

    /// Offset of the interoperability sub-IFD, if the pointer tag was
    /// decoded.
    pub fn interoperability_pointer(&self) -> Option<u32> {
        self.pointer(INTEROPERABILITY_IFD_POINTER)
    }

    /// Offset of the Print Image Matching block, if the pointer tag was
    /// decoded.
    pub fn print_image_matching_pointer(&self) -> Option<u32> {
        self.pointer(PRINT_IMAGE_MATCHING_IFD_POINTER)
    }

    fn pointer(&self, name: &'static str) -> Option<u32> {
        self.get(&TagKey::Named(name)).and_then(Value::as_u32)
    }

    /// Serialize as a JSON-LD-style object: the tag map under an
    /// `"@type": "IFD"` discriminator, with the top-level `"@context"`
    /// identifying the values as EXIF-vocabulary metadata.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        let mut json = serde_json::to_value(self)?;
        if let serde_json::Value::Object(object) = &mut json {
            object.insert(
                "@context".to_owned(),
                serde_json::json!({ "@vocab": crate::EXIF_VOCABULARY }),
            );
        }
        Ok(json)
    }

    fn insert(&mut self, key: TagKey, value: Value) {
        // Duplicate tag ids are not specified by the format; last one wins.
        self.tags.insert(key, value);
    }
}

impl serde::Serialize for Ifd {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.tags.len() + 1))?;
        map.serialize_entry("@type", "IFD")?;
        for (key, value) in &self.tags {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Decode one IFD at `offset` in `buffer`.
///
/// `offset` must point at the 16-bit entry count. Tag ids resolve through
/// `tags`; ids the table does not know pass through as numeric keys.
///
/// In [`ErrorMode::FailFast`] the first failing read aborts the call with
/// an error carrying the failing entry's byte offset. In
/// [`ErrorMode::Collect`] the same failures land in [`IfdRead::errors`] and
/// the decode carries on, so the returned directory simply lacks the
/// entries that failed.
pub fn read_ifd(
    buffer: &[u8],
    offset: usize,
    byte_order: ByteOrder,
    tags: &TagTable,
    options: &ReadOptions,
) -> IfdResult<IfdRead> {
    let mut out = IfdRead::default();

    match read_directory(buffer, offset, byte_order, tags, options, &mut out) {
        Ok(()) => Ok(out),
        // A directory-level failure (entry count or trailing offset) in
        // tolerant mode ends the decode with whatever was read so far.
        Err(err) if options.mode == ErrorMode::Collect => {
            out.errors.push(err);
            Ok(out)
        }
        Err(err) => Err(err),
    }
}

fn read_directory(
    buffer: &[u8],
    offset: usize,
    byte_order: ByteOrder,
    tags: &TagTable,
    options: &ReadOptions,
    out: &mut IfdRead,
) -> IfdResult<()> {
    let count = byte_order
        .read_u16(buffer, offset)
        .map_err(|kind| IfdError::new(offset, kind))?;
    trace!(offset, count, "reading IFD");

    let mut pos = offset + 2;
    for _ in 0..count {
        match read_entry(buffer, pos, byte_order, tags, options) {
            Ok((key, value)) => out.ifd.insert(key, value),
            Err(kind) => {
                let err = IfdError::new(pos, kind);
                if options.mode == ErrorMode::Collect {
                    debug!(entry_offset = pos, error = %err, "skipping undecodable entry");
                    out.errors.push(err);
                } else {
                    return Err(err);
                }
            }
        }
        pos += ENTRY_SIZE;
    }

    out.next = Some(
        byte_order
            .read_u32(buffer, pos)
            .map_err(|kind| IfdError::new(pos, kind))?,
    );
    Ok(())
}

/// Decode one 12-byte entry starting at `pos`.
fn read_entry(
    buffer: &[u8],
    pos: usize,
    byte_order: ByteOrder,
    tags: &TagTable,
    options: &ReadOptions,
) -> Result<(TagKey, Value), ErrorKind> {
    let tag = byte_order.read_u16(buffer, pos)?;
    let key = tags.resolve(tag);
    let mut value = read_entry_value(buffer, pos + 2, byte_order)?;

    if is_date_tag(&key) {
        let raw = value.as_str().ok_or(ErrorKind::DateNotAscii)?;
        value = Value::DateTime(parse_date(raw, options.timezone)?);
    }

    Ok((key, value))
}

/// Decode an entry's value, given the position just past its tag id.
fn read_entry_value(
    buffer: &[u8],
    pos: usize,
    byte_order: ByteOrder,
) -> Result<Value, ErrorKind> {
    let type_code = byte_order.read_u16(buffer, pos)?;
    let Some(type_) = Type::from_u16(type_code) else {
        // Unknown type codes are "no value", not an error.
        return Ok(Value::Null);
    };

    let count = byte_order.read_u32(buffer, pos + 2)? as usize;

    // The central space optimization of the format: payloads of at most 4
    // bytes live inline in the entry itself, larger ones behind an absolute
    // 32-bit offset.
    let payload_len = (type_.byte_len() as u64) * (count as u64);
    let payload = if payload_len <= 4 {
        pos + 6
    } else {
        byte_order.read_u32(buffer, pos + 6)? as usize
    };

    Ok(match type_ {
        Type::ASCII => Value::Ascii(read_ascii(buffer, payload, count)?),
        Type::UNDEFINED => Value::Undefined(read_slice(buffer, payload, count)?.to_vec()),
        _ => {
            let mut values = read_scalars(buffer, payload, type_, count, byte_order)?;
            if values.len() == 1 {
                // Single-element entries collapse to the bare scalar.
                Value::Scalar(values.remove(0))
            } else {
                Value::List(values)
            }
        }
    })
}
