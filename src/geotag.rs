//! GPS metadata extraction from image files.
//!
//! Reads the embedded EXIF block via `kamadak-exif` and collects the four
//! fields a placemark needs: latitude rationals, latitude reference,
//! longitude rationals, longitude reference. The reader sniffs the container
//! by content (JPEG, TIFF, PNG, WebP, HEIF), so a mislabeled extension still
//! extracts.
//!
//! Every failure here — unreadable file, unsupported container, no EXIF
//! block, a missing GPS field — is one absence class to the caller: the file
//! has no usable geotag and its placemark is skipped. The [`ExtractError`]
//! variants exist only to produce a precise diagnostic message. Partial
//! geotags (say, latitude without a longitude reference) are treated the same
//! as no geotag at all.
//!
//! The file handle is scoped to the call: opened read-only, dropped as soon
//! as the metadata block has been parsed.

use exif::{In, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("cannot open file: {0}")]
    Unreadable(#[from] std::io::Error),
    #[error("no readable metadata: {0}")]
    NoMetadata(#[from] exif::Error),
    #[error("metadata lacks the {0} field")]
    MissingField(&'static str),
}

/// One exact fraction from a GPS field. The denominator usually marks
/// decimal places rather than acting as a true divisor — see `coords`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpsRational {
    pub num: u32,
    pub den: u32,
}

/// The raw GPS field set of one image, untouched by any decoding.
///
/// Each axis carries its degree/minute/second rationals (normally three, but
/// malformed files may carry fewer — the decoder checks) and its
/// one-character hemisphere reference.
#[derive(Debug, Clone)]
pub struct RawGeoFields {
    pub latitude: Vec<GpsRational>,
    pub latitude_ref: char,
    pub longitude: Vec<GpsRational>,
    pub longitude_ref: char,
}

/// Extract the raw GPS field set from an image file.
///
/// All four fields must be present; anything less is an [`ExtractError`].
pub fn extract(path: &Path) -> Result<RawGeoFields, ExtractError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader)?;

    Ok(RawGeoFields {
        latitude: rational_field(&exif, Tag::GPSLatitude, "GPSLatitude")?,
        latitude_ref: reference_field(&exif, Tag::GPSLatitudeRef, "GPSLatitudeRef")?,
        longitude: rational_field(&exif, Tag::GPSLongitude, "GPSLongitude")?,
        longitude_ref: reference_field(&exif, Tag::GPSLongitudeRef, "GPSLongitudeRef")?,
    })
}

fn rational_field(
    exif: &exif::Exif,
    tag: Tag,
    name: &'static str,
) -> Result<Vec<GpsRational>, ExtractError> {
    let field = exif
        .get_field(tag, In::PRIMARY)
        .ok_or(ExtractError::MissingField(name))?;
    match &field.value {
        Value::Rational(parts) => Ok(parts
            .iter()
            .map(|r| GpsRational {
                num: r.num,
                den: r.denom,
            })
            .collect()),
        _ => Err(ExtractError::MissingField(name)),
    }
}

fn reference_field(
    exif: &exif::Exif,
    tag: Tag,
    name: &'static str,
) -> Result<char, ExtractError> {
    let field = exif
        .get_field(tag, In::PRIMARY)
        .ok_or(ExtractError::MissingField(name))?;
    match &field.value {
        Value::Ascii(strings) => strings
            .first()
            .and_then(|s| s.first())
            .map(|&b| b as char)
            .ok_or(ExtractError::MissingField(name)),
        _ => Err(ExtractError::MissingField(name)),
    }
}
