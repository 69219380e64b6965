//! Archive packaging: the zip-backed end of the traversal.
//!
//! [`package`] runs the whole pipeline for one source directory: it stages a
//! zip archive in a temp file next to the target, drives the tree builder
//! with a sink that streams each image's bytes into `images/<relative-path>`,
//! serializes the resulting tree to the single [`DOCUMENT_ENTRY`] entry, and
//! only then persists the temp file onto the target path via an atomic
//! rename. A run that dies half-way leaves no truncated archive under the
//! target's name — the temp file is cleaned up on drop.
//!
//! Entry names and placemark hrefs both come from [`tree::archive_path`], so
//! every reference in the document resolves to an entry that exists.

use crate::kml;
use crate::tree::{self, ImageSink, ScanReport};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

/// Name of the markup document entry inside the archive.
pub const DOCUMENT_ENTRY: &str = "main.kml";

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("archive error: {0}")]
    Zip(#[from] ZipError),
    #[error("could not finalize archive: {0}")]
    Persist(#[from] tempfile::PersistError),
}

struct ZipSink {
    writer: ZipWriter<NamedTempFile>,
}

impl ImageSink for ZipSink {
    fn add_image(&mut self, source: &Path, relative: &Path) -> io::Result<()> {
        self.writer
            .start_file(tree::archive_path(relative), SimpleFileOptions::default())
            .map_err(io::Error::other)?;
        let mut file = File::open(source)?;
        io::copy(&mut file, &mut self.writer)?;
        Ok(())
    }
}

/// Package `source` into a zip archive at `target`.
///
/// Returns the traversal report so the caller can print what was packaged.
/// Fatal only on an unlistable source root or an archive write/finalize
/// failure; per-file geotag problems are diagnostics in the report.
pub fn package(source: &Path, target: &Path) -> Result<ScanReport, PackageError> {
    // Stage next to the target so the final persist is a same-filesystem
    // rename.
    let staging_dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staging = NamedTempFile::new_in(staging_dir)?;

    let mut sink = ZipSink {
        writer: ZipWriter::new(staging),
    };
    let report = tree::build_tree(source, &mut sink)?;

    let document = kml::render(&report.root)?;
    sink.writer
        .start_file(DOCUMENT_ENTRY, SimpleFileOptions::default())?;
    sink.writer.write_all(document.as_bytes())?;

    sink.writer.finish()?.persist(target)?;
    Ok(report)
}
