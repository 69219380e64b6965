//! Shared test utilities: synthetic geotagged images.
//!
//! Extraction tests need real container bytes, not mocks — the EXIF reader
//! dispatches on magic bytes and parses an actual TIFF structure. Rather than
//! shipping binary fixtures, these helpers assemble a minimal JPEG in memory:
//! SOI marker, one APP1 segment holding an `Exif` TIFF block with a GPS IFD,
//! EOI marker. ~130 bytes, fully deterministic, and every field offset is
//! spelled out below.
//!
//! TIFF layout (little-endian, all offsets from the TIFF header):
//!
//! ```text
//!   0  "II" 42, IFD0 offset = 8
//!   8  IFD0: 1 entry — GPSInfo pointer (0x8825) → 26
//!  26  GPS IFD: 4 entries — LatRef(1), Lat(2), LonRef(3), Lon(4)
//!  80  latitude rationals  (3 × num/den u32 pairs)
//! 104  longitude rationals (3 × num/den u32 pairs)
//! ```

// TIFF field types.
const ASCII: u16 = 2;
const LONG: u16 = 4;
const RATIONAL: u16 = 5;

const GPS_IFD_POINTER: u16 = 0x8825;
const GPS_IFD_OFFSET: u32 = 26;
const LAT_DATA_OFFSET: u32 = 80;
const LON_DATA_OFFSET: u32 = 104;

/// GPS fields to embed: per axis, three `(numerator, denominator)` rationals
/// and a one-byte hemisphere reference.
pub struct GpsSpec {
    pub lat: [(u32, u32); 3],
    pub lat_ref: u8,
    pub lon: [(u32, u32); 3],
    pub lon_ref: u8,
}

/// Whole-degree DMS rationals: `degrees(40, 26, 46)` → `40/1, 26/1, 46/1`.
pub fn degrees(d: u32, m: u32, s: u32) -> [(u32, u32); 3] {
    [(d, 1), (m, 1), (s, 1)]
}

/// A minimal JPEG whose EXIF block carries the given GPS fields.
pub fn jpeg_with_gps(spec: &GpsSpec) -> Vec<u8> {
    let mut tiff = tiff_header();

    // IFD0: one entry pointing at the GPS IFD.
    tiff.extend_from_slice(&1u16.to_le_bytes());
    ifd_entry(
        &mut tiff,
        GPS_IFD_POINTER,
        LONG,
        1,
        GPS_IFD_OFFSET.to_le_bytes(),
    );
    tiff.extend_from_slice(&0u32.to_le_bytes()); // no next IFD

    // GPS IFD, entries sorted by tag as TIFF requires.
    tiff.extend_from_slice(&4u16.to_le_bytes());
    ifd_entry(&mut tiff, 0x0001, ASCII, 2, [spec.lat_ref, 0, 0, 0]);
    ifd_entry(&mut tiff, 0x0002, RATIONAL, 3, LAT_DATA_OFFSET.to_le_bytes());
    ifd_entry(&mut tiff, 0x0003, ASCII, 2, [spec.lon_ref, 0, 0, 0]);
    ifd_entry(&mut tiff, 0x0004, RATIONAL, 3, LON_DATA_OFFSET.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());

    for &(num, den) in spec.lat.iter().chain(spec.lon.iter()) {
        tiff.extend_from_slice(&num.to_le_bytes());
        tiff.extend_from_slice(&den.to_le_bytes());
    }

    wrap_jpeg(&tiff)
}

/// A valid JPEG with an EXIF block but no GPS fields at all.
pub fn jpeg_without_gps() -> Vec<u8> {
    let mut tiff = tiff_header();
    tiff.extend_from_slice(&0u16.to_le_bytes()); // empty IFD0
    tiff.extend_from_slice(&0u32.to_le_bytes());
    wrap_jpeg(&tiff)
}

/// GPS fields present but the degree rationals carry zero denominators:
/// extraction succeeds, decoding fails.
pub fn jpeg_with_corrupt_gps() -> Vec<u8> {
    jpeg_with_gps(&GpsSpec {
        lat: [(40, 0), (26, 0), (46, 0)],
        lat_ref: b'N',
        lon: [(79, 0), (58, 0), (56, 0)],
        lon_ref: b'W',
    })
}

fn tiff_header() -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());
    tiff
}

fn ifd_entry(buf: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: [u8; 4]) {
    buf.extend_from_slice(&tag.to_le_bytes());
    buf.extend_from_slice(&kind.to_le_bytes());
    buf.extend_from_slice(&count.to_le_bytes());
    buf.extend_from_slice(&value);
}

/// SOI + APP1("Exif\0\0" + TIFF) + EOI. Segment lengths are big-endian.
fn wrap_jpeg(tiff: &[u8]) -> Vec<u8> {
    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(tiff);

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    jpeg.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    jpeg.extend_from_slice(&payload);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}
