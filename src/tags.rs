//! Tag identifiers, entry types and the name tables used to resolve them.
//!
//! Tag names follow the W3C EXIF vocabulary
//! (<http://www.w3.org/2003/12/exif/ns#>), which is also the `@vocab` marker
//! emitted by [`Ifd::to_json`](crate::Ifd::to_json).

use std::fmt;

use serde::{Serialize, Serializer};

/// The type of an IFD entry (a 2 byte field).
///
/// Only the ten primitive types of the original TIFF specification are
/// recognized; any other type code decodes to [`Value::Null`](crate::Value).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u16)]
pub enum Type {
    /// 8-bit unsigned integer
    BYTE = 1,
    /// 8-bit byte that contains a 7-bit ASCII code; the last byte must be zero
    ASCII = 2,
    /// 16-bit unsigned integer
    SHORT = 3,
    /// 32-bit unsigned integer
    LONG = 4,
    /// Fraction stored as two 32-bit unsigned integers
    RATIONAL = 5,
    /// 8-bit signed integer
    SBYTE = 6,
    /// 8-bit byte that may contain anything, depending on the field
    UNDEFINED = 7,
    /// 16-bit signed integer
    SSHORT = 8,
    /// 32-bit signed integer
    SLONG = 9,
    /// Fraction stored as two 32-bit signed integers
    SRATIONAL = 10,
}

impl Type {
    /// Map a raw type code to a known primitive type.
    pub const fn from_u16(val: u16) -> Option<Self> {
        match val {
            1 => Some(Type::BYTE),
            2 => Some(Type::ASCII),
            3 => Some(Type::SHORT),
            4 => Some(Type::LONG),
            5 => Some(Type::RATIONAL),
            6 => Some(Type::SBYTE),
            7 => Some(Type::UNDEFINED),
            8 => Some(Type::SSHORT),
            9 => Some(Type::SLONG),
            10 => Some(Type::SRATIONAL),
            _ => None,
        }
    }

    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Fixed width in bytes of one element of this type.
    pub const fn byte_len(self) -> usize {
        match self {
            Type::BYTE | Type::ASCII | Type::SBYTE | Type::UNDEFINED => 1,
            Type::SHORT | Type::SSHORT => 2,
            Type::LONG | Type::SLONG => 4,
            Type::RATIONAL | Type::SRATIONAL => 8,
        }
    }
}

/// Key of a decoded tag in the directory map.
///
/// A tag id present in the decode's [`TagTable`] resolves to its name;
/// anything else passes through as the raw numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagKey {
    /// Tag resolved to a name from the tag table.
    Named(&'static str),
    /// Private or unknown tag, kept as its raw id.
    Numeric(u16),
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKey::Named(name) => f.write_str(name),
            TagKey::Numeric(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for TagKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// EXIF sub-IFD pointer tag (0x8769), as named in the main IFD table.
pub const EXIF_IFD_POINTER: &str = "exif_IFD_Pointer";
/// GPS info sub-IFD pointer tag (0x8825).
pub const GPS_INFO_IFD_POINTER: &str = "gpsInfo_IFD_Pointer";
/// Interoperability sub-IFD pointer tag (0xA005), stored in the EXIF sub-IFD.
pub const INTEROPERABILITY_IFD_POINTER: &str = "interoperability_IFD_Pointer";
/// Print Image Matching data pointer tag (0xC4A5).
pub const PRINT_IMAGE_MATCHING_IFD_POINTER: &str = "printImageMatching_IFD_Pointer";

/// A tag-id-to-name table for one directory category.
///
/// Tables are static and sorted by tag id. The built-in tables cover the
/// baseline TIFF, EXIF, GPS and interoperability names; [`TagTable::EMPTY`]
/// leaves every tag numeric.
#[derive(Debug, Clone, Copy)]
pub struct TagTable {
    entries: &'static [(u16, &'static str)],
}

impl TagTable {
    /// A table with no entries; every tag id passes through numerically.
    pub const EMPTY: TagTable = TagTable::new(&[]);

    /// Names for the main image IFD and the EXIF sub-IFD.
    pub const EXIF: TagTable = TagTable::new(EXIF_TAGS);

    /// Names for the GPS info sub-IFD.
    pub const GPS: TagTable = TagTable::new(GPS_TAGS);

    /// Names for the interoperability sub-IFD.
    pub const INTEROPERABILITY: TagTable = TagTable::new(INTEROPERABILITY_TAGS);

    /// Build a table from a slice sorted by tag id.
    pub const fn new(entries: &'static [(u16, &'static str)]) -> Self {
        TagTable { entries }
    }

    /// Look up the name for a tag id.
    pub fn get(&self, tag: u16) -> Option<&'static str> {
        self.entries
            .binary_search_by_key(&tag, |&(id, _)| id)
            .ok()
            .map(|i| self.entries[i].1)
    }

    /// Resolve a tag id to its display key, falling back to the raw id.
    pub fn resolve(&self, tag: u16) -> TagKey {
        match self.get(tag) {
            Some(name) => TagKey::Named(name),
            None => TagKey::Numeric(tag),
        }
    }
}

// Sorted by tag id. Names are the W3C EXIF vocabulary terms; the table mixes
// baseline TIFF tags and EXIF private tags because both appear in the same
// directories in practice.
const EXIF_TAGS: &[(u16, &str)] = &[
    (0x0100, "imageWidth"),
    (0x0101, "imageLength"),
    (0x0102, "bitsPerSample"),
    (0x0103, "compression"),
    (0x0106, "photometricInterpretation"),
    (0x010E, "imageDescription"),
    (0x010F, "make"),
    (0x0110, "model"),
    (0x0111, "stripOffsets"),
    (0x0112, "orientation"),
    (0x0115, "samplesPerPixel"),
    (0x0116, "rowsPerStrip"),
    (0x0117, "stripByteCounts"),
    (0x011A, "xResolution"),
    (0x011B, "yResolution"),
    (0x011C, "planarConfiguration"),
    (0x0128, "resolutionUnit"),
    (0x0131, "software"),
    (0x0132, "dateTime"),
    (0x013B, "artist"),
    (0x013E, "whitePoint"),
    (0x013F, "primaryChromaticities"),
    (0x0211, "yCbCrCoefficients"),
    (0x0212, "yCbCrSubSampling"),
    (0x0213, "yCbCrPositioning"),
    (0x0214, "referenceBlackWhite"),
    (0x8298, "copyright"),
    (0x829A, "exposureTime"),
    (0x829D, "fNumber"),
    (0x8769, EXIF_IFD_POINTER),
    (0x8822, "exposureProgram"),
    (0x8825, GPS_INFO_IFD_POINTER),
    (0x8827, "isoSpeedRatings"),
    (0x9000, "exifVersion"),
    (0x9003, "dateTimeOriginal"),
    (0x9004, "dateTimeDigitized"),
    (0x9101, "componentsConfiguration"),
    (0x9102, "compressedBitsPerPixel"),
    (0x9201, "shutterSpeedValue"),
    (0x9202, "apertureValue"),
    (0x9203, "brightnessValue"),
    (0x9204, "exposureBiasValue"),
    (0x9205, "maxApertureValue"),
    (0x9206, "subjectDistance"),
    (0x9207, "meteringMode"),
    (0x9208, "lightSource"),
    (0x9209, "flash"),
    (0x920A, "focalLength"),
    (0x927C, "makerNote"),
    (0x9286, "userComment"),
    (0x9290, "subSecTime"),
    (0x9291, "subSecTimeOriginal"),
    (0x9292, "subSecTimeDigitized"),
    (0xA000, "flashpixVersion"),
    (0xA001, "colorSpace"),
    (0xA002, "pixelXDimension"),
    (0xA003, "pixelYDimension"),
    (0xA004, "relatedSoundFile"),
    (0xA005, INTEROPERABILITY_IFD_POINTER),
    (0xA20B, "flashEnergy"),
    (0xA20E, "focalPlaneXResolution"),
    (0xA20F, "focalPlaneYResolution"),
    (0xA210, "focalPlaneResolutionUnit"),
    (0xA214, "subjectLocation"),
    (0xA215, "exposureIndex"),
    (0xA217, "sensingMethod"),
    (0xA300, "fileSource"),
    (0xA301, "sceneType"),
    (0xA302, "cfaPattern"),
    (0xA401, "customRendered"),
    (0xA402, "exposureMode"),
    (0xA403, "whiteBalance"),
    (0xA404, "digitalZoomRatio"),
    (0xA405, "focalLengthIn35mmFilm"),
    (0xA406, "sceneCaptureType"),
    (0xA407, "gainControl"),
    (0xA408, "contrast"),
    (0xA409, "saturation"),
    (0xA40A, "sharpness"),
    (0xA40C, "subjectDistanceRange"),
    (0xA420, "imageUniqueID"),
    (0xC4A5, PRINT_IMAGE_MATCHING_IFD_POINTER),
];

const GPS_TAGS: &[(u16, &str)] = &[
    (0x0000, "gpsVersionID"),
    (0x0001, "gpsLatitudeRef"),
    (0x0002, "gpsLatitude"),
    (0x0003, "gpsLongitudeRef"),
    (0x0004, "gpsLongitude"),
    (0x0005, "gpsAltitudeRef"),
    (0x0006, "gpsAltitude"),
    (0x0007, "gpsTimeStamp"),
    (0x0008, "gpsSatellites"),
    (0x0009, "gpsStatus"),
    (0x000A, "gpsMeasureMode"),
    (0x000B, "gpsDOP"),
    (0x000C, "gpsSpeedRef"),
    (0x000D, "gpsSpeed"),
    (0x000E, "gpsTrackRef"),
    (0x000F, "gpsTrack"),
    (0x0010, "gpsImgDirectionRef"),
    (0x0011, "gpsImgDirection"),
    (0x0012, "gpsMapDatum"),
    (0x0013, "gpsDestLatitudeRef"),
    (0x0014, "gpsDestLatitude"),
    (0x0015, "gpsDestLongitudeRef"),
    (0x0016, "gpsDestLongitude"),
    (0x0017, "gpsDestBearingRef"),
    (0x0018, "gpsDestBearing"),
    (0x0019, "gpsDestDistanceRef"),
    (0x001A, "gpsDestDistance"),
    (0x001B, "gpsProcessingMethod"),
    (0x001C, "gpsAreaInformation"),
    (0x001D, "gpsDateStamp"),
    (0x001E, "gpsDifferential"),
];

const INTEROPERABILITY_TAGS: &[(u16, &str)] = &[
    (0x0001, "interoperabilityIndex"),
    (0x0002, "interoperabilityVersion"),
    (0x1000, "relatedImageFileFormat"),
    (0x1001, "relatedImageWidth"),
    (0x1002, "relatedImageLength"),
];
