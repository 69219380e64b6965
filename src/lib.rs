//! # Photomap
//!
//! Packages a directory tree of geotagged photos into a single KMZ-style
//! archive: a zip containing a copy of every image plus a `main.kml` document
//! whose folder/placemark tree mirrors the source directory structure, one
//! placemark per image with a decodable GPS geotag.
//!
//! # Architecture: One Traversal, Two Products
//!
//! ```text
//! filesystem ──► raw GPS fields ──► decoded coordinate ──► document node
//!      │                                                        │
//!      └────────────── image bytes ──► archive ◄── serialized KML
//! ```
//!
//! A single depth-first walk of the source tree does both jobs per image:
//! stream the bytes into the archive under `images/<relative-path>`, and
//! attempt geotag extraction + decoding to produce a placemark referencing
//! that same path. Deriving the archive entry name and the document reference
//! from one value in one step is what keeps the two outputs consistent — a
//! placemark can never point at an entry that was not written.
//!
//! Per-file geotag failures (no EXIF, missing GPS fields, malformed
//! rationals) are never fatal: the file is still copied, the placemark is
//! omitted, and a diagnostic lands in the run report. Only an unlistable
//! source root or an archive write failure aborts the run, and the archive is
//! staged in a temp file and persisted atomically so a failed run leaves
//! nothing half-written under the target name.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`geotag`] | EXIF GPS field extraction — raw rationals and hemisphere references |
//! | [`coords`] | Decoding rational DMS fields into signed decimal degrees |
//! | [`tree`] | The traversal: document tree construction plus the [`tree::ImageSink`] copy seam |
//! | [`kml`] | KML serialization of the document tree |
//! | [`archive`] | Zip packaging, `main.kml` entry, atomic finalization |
//! | [`output`] | CLI output formatting — tree-based display of the run report |
//!
//! # Design Decisions
//!
//! ## Faithful rational decoding
//!
//! GPS rationals are decoded by decimal-place reconstruction
//! (`floor(log10(denominator))` trailing digits of the numerator become the
//! fraction), not by division — `235/10` means `23.5` in the metadata
//! convention this tool follows. See [`coords`] for the rule and its edge
//! cases, including the preserved quirk that unrecognized hemisphere
//! references decode as positive.
//!
//! ## Single-threaded, synchronous
//!
//! One sequential writer appends to the archive; each metadata read is a
//! scoped file open. There is no cancellation, no retry, and no cycle
//! detection in the walk — a symlink cycle will not terminate.

pub mod archive;
pub mod coords;
pub mod geotag;
pub mod kml;
pub mod output;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_helpers;
