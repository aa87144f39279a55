//! Integration tests decoding hand-assembled directories.

use chrono::FixedOffset;
use exif_ifd::{
    read_ifd, ByteOrder, ErrorKind, ErrorMode, ExifDateTime, ReadOptions, Scalar, TagKey,
    TagTable, Value,
};

/// Payload of one entry under construction.
enum Payload {
    /// At most 4 bytes, stored in the entry itself.
    Inline([u8; 4]),
    /// Appended after the directory; the entry stores its absolute offset.
    OutOfLine(Vec<u8>),
}

/// Assembles a directory plus its out-of-line data area into one buffer.
struct IfdBuilder {
    byte_order: ByteOrder,
    directory_offset: usize,
    entries: Vec<(u16, u16, u32, Payload)>,
    next: u32,
}

impl IfdBuilder {
    fn new(byte_order: ByteOrder) -> Self {
        IfdBuilder {
            byte_order,
            directory_offset: 0,
            entries: Vec::new(),
            next: 0,
        }
    }

    fn at_offset(mut self, offset: usize) -> Self {
        self.directory_offset = offset;
        self
    }

    fn next_ifd(mut self, next: u32) -> Self {
        self.next = next;
        self
    }

    fn entry(mut self, tag: u16, type_: u16, count: u32, payload: Payload) -> Self {
        self.entries.push((tag, type_, count, payload));
        self
    }

    fn u16_bytes(&self, v: u16) -> [u8; 2] {
        match self.byte_order {
            ByteOrder::LittleEndian => v.to_le_bytes(),
            ByteOrder::BigEndian => v.to_be_bytes(),
        }
    }

    fn u32_bytes(&self, v: u32) -> [u8; 4] {
        match self.byte_order {
            ByteOrder::LittleEndian => v.to_le_bytes(),
            ByteOrder::BigEndian => v.to_be_bytes(),
        }
    }

    fn build(self) -> Vec<u8> {
        let directory_len = 2 + self.entries.len() * 12 + 4;
        let mut buf = vec![0u8; self.directory_offset];
        let mut data = Vec::new();
        let mut data_pos = self.directory_offset + directory_len;

        buf.extend_from_slice(&self.u16_bytes(self.entries.len() as u16));
        for (tag, type_, count, payload) in &self.entries {
            buf.extend_from_slice(&self.u16_bytes(*tag));
            buf.extend_from_slice(&self.u16_bytes(*type_));
            buf.extend_from_slice(&self.u32_bytes(*count));
            match payload {
                Payload::Inline(bytes) => buf.extend_from_slice(bytes),
                Payload::OutOfLine(bytes) => {
                    buf.extend_from_slice(&self.u32_bytes(data_pos as u32));
                    data_pos += bytes.len();
                    data.extend_from_slice(bytes);
                }
            }
        }
        buf.extend_from_slice(&self.u32_bytes(self.next));
        buf.extend_from_slice(&data);
        buf
    }
}

fn decode(buf: &[u8], offset: usize) -> exif_ifd::IfdRead {
    read_ifd(
        buf,
        offset,
        ByteOrder::LittleEndian,
        &TagTable::EXIF,
        &ReadOptions::default(),
    )
    .expect("well-formed directory should decode")
}

#[test]
fn inline_payloads_need_no_data_area() {
    // Every payload fits in 4 bytes; the buffer ends right after the
    // trailing offset, so any indirect read would run out of bounds.
    let buf = IfdBuilder::new(ByteOrder::LittleEndian)
        .entry(0x0112, 3, 1, Payload::Inline([6, 0, 0, 0]))
        .entry(0x0212, 3, 2, Payload::Inline([2, 0, 1, 0]))
        .entry(0x0103, 4, 1, Payload::Inline([1, 0, 0, 0]))
        .build();

    let out = decode(&buf, 0);
    assert_eq!(out.ifd.len(), 3);
    assert_eq!(
        out.ifd.get_named("orientation"),
        Some(&Value::Scalar(Scalar::Short(6)))
    );
    assert_eq!(
        out.ifd.get_named("yCbCrSubSampling"),
        Some(&Value::List(vec![Scalar::Short(2), Scalar::Short(1)]))
    );
    assert_eq!(
        out.ifd.get_named("compression"),
        Some(&Value::Scalar(Scalar::Long(1)))
    );
}

#[test]
fn oversize_payloads_follow_the_offset() {
    let mut longs = Vec::new();
    longs.extend_from_slice(&100u32.to_le_bytes());
    longs.extend_from_slice(&200u32.to_le_bytes());
    longs.extend_from_slice(&300u32.to_le_bytes());

    let mut rational = Vec::new();
    rational.extend_from_slice(&72u32.to_le_bytes());
    rational.extend_from_slice(&1u32.to_le_bytes());

    let buf = IfdBuilder::new(ByteOrder::LittleEndian)
        .entry(0x0111, 4, 3, Payload::OutOfLine(longs))
        .entry(0x011A, 5, 1, Payload::OutOfLine(rational))
        .build();

    let out = decode(&buf, 0);
    assert_eq!(
        out.ifd.get_named("stripOffsets"),
        Some(&Value::List(vec![
            Scalar::Long(100),
            Scalar::Long(200),
            Scalar::Long(300),
        ]))
    );
    // An 8-byte payload is indirect even at count 1, and still collapses.
    assert_eq!(
        out.ifd.get_named("xResolution"),
        Some(&Value::Scalar(Scalar::Rational(72, 1)))
    );
}

#[test]
fn ascii_value_is_nul_trimmed() {
    let buf = IfdBuilder::new(ByteOrder::LittleEndian)
        .entry(0x010F, 2, 5, Payload::OutOfLine(b"EXIF\0".to_vec()))
        .entry(0x0110, 2, 4, Payload::Inline(*b"X1\0\0"))
        .build();

    let out = decode(&buf, 0);
    assert_eq!(out.ifd.get_named("make"), Some(&Value::Ascii("EXIF".into())));
    assert_eq!(out.ifd.get_named("model"), Some(&Value::Ascii("X1".into())));
}

#[test]
fn undefined_value_is_the_raw_slice() {
    let buf = IfdBuilder::new(ByteOrder::LittleEndian)
        .entry(0x9000, 7, 4, Payload::Inline(*b"0230"))
        .entry(0x9286, 7, 6, Payload::OutOfLine(vec![0, 1, 2, 3, 4, 255]))
        .build();

    let out = decode(&buf, 0);
    assert_eq!(
        out.ifd.get_named("exifVersion"),
        Some(&Value::Undefined(b"0230".to_vec()))
    );
    assert_eq!(
        out.ifd.get_named("userComment"),
        Some(&Value::Undefined(vec![0, 1, 2, 3, 4, 255]))
    );
    assert_eq!(
        out.ifd.get_named("exifVersion").and_then(Value::as_bytes),
        Some(b"0230".as_slice())
    );
}

#[test]
fn date_tag_with_timezone_hint() {
    let buf = IfdBuilder::new(ByteOrder::LittleEndian)
        .entry(
            0x9003,
            2,
            20,
            Payload::OutOfLine(b"2020:01:02 03:04:05\0".to_vec()),
        )
        .build();

    let options = ReadOptions {
        timezone: Some(FixedOffset::east_opt(2 * 3600).unwrap()),
        ..Default::default()
    };
    let out = read_ifd(&buf, 0, ByteOrder::LittleEndian, &TagTable::EXIF, &options).unwrap();

    let expected = "2020-01-02T03:04:05+02:00".parse().unwrap();
    assert_eq!(
        out.ifd.get_named("dateTimeOriginal"),
        Some(&Value::DateTime(ExifDateTime::Zoned(expected)))
    );
}

#[test]
fn date_tag_without_hint_stays_local() {
    let buf = IfdBuilder::new(ByteOrder::LittleEndian)
        .entry(
            0x0132,
            2,
            20,
            Payload::OutOfLine(b"2020:01:02 03:04:05\0".to_vec()),
        )
        .build();

    let out = decode(&buf, 0);
    let expected = "2020-01-02T03:04:05".parse().unwrap();
    assert_eq!(
        out.ifd.get_named("dateTime"),
        Some(&Value::DateTime(ExifDateTime::Local(expected)))
    );
}

#[test]
fn malformed_date_fails_fast() {
    let buf = IfdBuilder::new(ByteOrder::LittleEndian)
        .entry(0x0132, 2, 8, Payload::OutOfLine(b"not-one\0".to_vec()))
        .build();

    let err = read_ifd(
        &buf,
        0,
        ByteOrder::LittleEndian,
        &TagTable::EXIF,
        &ReadOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidDate { .. }));
    assert_eq!(err.offset(), 2);
}

#[test]
fn date_tag_holding_a_number_is_an_error() {
    let buf = IfdBuilder::new(ByteOrder::LittleEndian)
        .entry(0x0132, 3, 1, Payload::Inline([1, 0, 0, 0]))
        .build();

    let err = read_ifd(
        &buf,
        0,
        ByteOrder::LittleEndian,
        &TagTable::EXIF,
        &ReadOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DateNotAscii));
}

/// Three entries, the middle one pointing far past the buffer end.
fn buffer_with_corrupt_entry() -> Vec<u8> {
    let mut corrupt = IfdBuilder::new(ByteOrder::LittleEndian)
        .entry(0x0112, 3, 1, Payload::Inline([1, 0, 0, 0]))
        .entry(0x0111, 4, 3, Payload::Inline([0, 0, 0, 0]))
        .entry(0x0128, 3, 1, Payload::Inline([2, 0, 0, 0]))
        .build();
    // Rewrite the second entry to an indirect payload far out of bounds.
    let value_field = 2 + 12 + 8;
    corrupt[value_field..value_field + 4].copy_from_slice(&0x000F_0000u32.to_le_bytes());
    corrupt
}

#[test]
fn collect_mode_isolates_the_corrupt_entry() {
    let buf = buffer_with_corrupt_entry();
    let options = ReadOptions {
        mode: ErrorMode::Collect,
        ..Default::default()
    };
    let out = read_ifd(&buf, 0, ByteOrder::LittleEndian, &TagTable::EXIF, &options).unwrap();

    // The two valid tags survive, the corrupt one leaves a hole.
    assert_eq!(out.ifd.len(), 2);
    assert!(out.ifd.get_named("orientation").is_some());
    assert!(out.ifd.get_named("resolutionUnit").is_some());
    assert!(out.ifd.get_named("stripOffsets").is_none());

    assert_eq!(out.errors.len(), 1);
    // Tagged with the corrupt entry's byte offset (second entry).
    assert_eq!(out.errors[0].offset(), 2 + 12);
    assert!(matches!(
        out.errors[0].kind(),
        ErrorKind::OutOfBounds { .. }
    ));
    assert_eq!(out.next, Some(0));
}

#[test]
fn fail_fast_mode_aborts_on_the_corrupt_entry() {
    let buf = buffer_with_corrupt_entry();
    let err = read_ifd(
        &buf,
        0,
        ByteOrder::LittleEndian,
        &TagTable::EXIF,
        &ReadOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.offset(), 2 + 12);
}

#[test]
fn next_offset_passes_through() {
    let buf = IfdBuilder::new(ByteOrder::LittleEndian)
        .entry(0x0112, 3, 1, Payload::Inline([1, 0, 0, 0]))
        .next_ifd(0x1234)
        .build();
    assert_eq!(decode(&buf, 0).next, Some(0x1234));

    let buf = IfdBuilder::new(ByteOrder::LittleEndian)
        .entry(0x0112, 3, 1, Payload::Inline([1, 0, 0, 0]))
        .next_ifd(0)
        .build();
    // Zero is reported as-is; "no next directory" is the caller's call.
    assert_eq!(decode(&buf, 0).next, Some(0));
}

#[test]
fn directory_at_nonzero_offset() {
    let buf = IfdBuilder::new(ByteOrder::LittleEndian)
        .at_offset(64)
        .entry(0x0112, 3, 1, Payload::Inline([3, 0, 0, 0]))
        .build();

    let out = decode(&buf, 64);
    assert_eq!(
        out.ifd.get_named("orientation"),
        Some(&Value::Scalar(Scalar::Short(3)))
    );
}

#[test]
fn big_endian_directory() {
    let buf = IfdBuilder::new(ByteOrder::BigEndian)
        .entry(0x011A, 5, 1, {
            let mut rational = Vec::new();
            rational.extend_from_slice(&300u32.to_be_bytes());
            rational.extend_from_slice(&1u32.to_be_bytes());
            Payload::OutOfLine(rational)
        })
        .entry(0x0112, 3, 1, Payload::Inline([0, 8, 0, 0]))
        .next_ifd(0xAB)
        .build();

    let out = read_ifd(
        &buf,
        0,
        ByteOrder::BigEndian,
        &TagTable::EXIF,
        &ReadOptions::default(),
    )
    .unwrap();

    assert_eq!(
        out.ifd.get_named("xResolution"),
        Some(&Value::Scalar(Scalar::Rational(300, 1)))
    );
    assert_eq!(
        out.ifd.get_named("orientation"),
        Some(&Value::Scalar(Scalar::Short(8)))
    );
    assert_eq!(out.next, Some(0xAB));
}

#[test]
fn pointer_accessors_expose_sub_ifd_offsets() {
    let buf = IfdBuilder::new(ByteOrder::LittleEndian)
        .entry(0x8769, 4, 1, Payload::Inline(0x100u32.to_le_bytes()))
        .entry(0x8825, 4, 1, Payload::Inline(0x200u32.to_le_bytes()))
        .entry(0xA005, 4, 1, Payload::Inline(0x300u32.to_le_bytes()))
        .entry(0xC4A5, 4, 1, Payload::Inline(0x400u32.to_le_bytes()))
        .build();

    let out = decode(&buf, 0);
    assert_eq!(out.ifd.exif_pointer(), Some(0x100));
    assert_eq!(out.ifd.gps_info_pointer(), Some(0x200));
    assert_eq!(out.ifd.interoperability_pointer(), Some(0x300));
    assert_eq!(out.ifd.print_image_matching_pointer(), Some(0x400));

    // Absent pointers simply read as None.
    let empty = decode(
        &IfdBuilder::new(ByteOrder::LittleEndian)
            .entry(0x0112, 3, 1, Payload::Inline([1, 0, 0, 0]))
            .build(),
        0,
    );
    assert_eq!(empty.ifd.exif_pointer(), None);
}

#[test]
fn gps_directory_uses_its_own_table() {
    let buf = IfdBuilder::new(ByteOrder::LittleEndian)
        .entry(0x001D, 2, 11, Payload::OutOfLine(b"2008:10:23\0".to_vec()))
        .build();

    let out = read_ifd(
        &buf,
        0,
        ByteOrder::LittleEndian,
        &TagTable::GPS,
        &ReadOptions::default(),
    )
    .unwrap();

    let expected = "2008-10-23T00:00:00".parse().unwrap();
    assert_eq!(
        out.ifd.get_named("gpsDateStamp"),
        Some(&Value::DateTime(ExifDateTime::Local(expected)))
    );
}

#[test]
fn empty_table_keeps_every_key_numeric() {
    let buf = IfdBuilder::new(ByteOrder::LittleEndian)
        .entry(0x0110, 2, 3, Payload::Inline(*b"X1\0\0"))
        .build();

    let out = read_ifd(
        &buf,
        0,
        ByteOrder::LittleEndian,
        &TagTable::EMPTY,
        &ReadOptions::default(),
    )
    .unwrap();
    assert_eq!(
        out.ifd.get(&TagKey::Numeric(0x0110)),
        Some(&Value::Ascii("X1".into()))
    );
}

#[test]
fn json_output_carries_context_and_type_markers() {
    let buf = IfdBuilder::new(ByteOrder::LittleEndian)
        .entry(0x0110, 2, 3, Payload::Inline(*b"X1\0\0"))
        .entry(0x0112, 3, 1, Payload::Inline([6, 0, 0, 0]))
        .entry(0xBEEF, 3, 1, Payload::Inline([9, 0, 0, 0]))
        .build();

    let json = decode(&buf, 0).ifd.to_json().unwrap();
    assert_eq!(
        json["@context"]["@vocab"],
        serde_json::json!(exif_ifd::EXIF_VOCABULARY)
    );
    assert_eq!(json["@type"], serde_json::json!("IFD"));
    assert_eq!(json["model"], serde_json::json!("X1"));
    assert_eq!(json["orientation"], serde_json::json!(6));
    // Numeric keys stringify.
    assert_eq!(json["48879"], serde_json::json!(9));
}
