//! Document tree construction: one traversal, two products.
//!
//! Walks the source directory depth-first and builds a [`Folder`] tree that
//! mirrors it exactly — every subdirectory becomes a folder node (empty ones
//! included, so the output document preserves the full directory shape), and
//! every image with a decodable geotag becomes a [`Placemark`].
//!
//! The same walk also drives the archive copy through the [`ImageSink`] seam:
//! each image matching the extension allow-list is handed to the sink *before*
//! its geotag is attempted, so copying is unconditional on decode success and
//! the placemark `href` and the sink's entry name come from the same relative
//! path in the same step. A single traversal means the document and the
//! archive cannot drift apart the way two independent walks can.
//!
//! ## Per-entry policy
//!
//! - image file (extension in [`IMAGE_EXTENSIONS`], case-insensitive): copy,
//!   then extract + decode; failure records a skip diagnostic, no placeholder
//!   node.
//! - subdirectory: recurse unconditionally.
//! - anything else: skip diagnostic, ignored.
//!
//! Folder children list folder nodes before placemark nodes; within each kind
//! the directory enumeration order is preserved as-is (not alphabetized).
//!
//! ## Failure policy
//!
//! Per-file problems never escape this module — they land in
//! [`ScanReport::skipped`] with the relative path and reason, and the run
//! continues. Only two things are fatal and propagate as `io::Error`: the
//! root directory cannot be listed, or the sink fails to write. An unreadable
//! *nested* directory is downgraded to a diagnostic plus an empty folder, and
//! an entry the OS fails to yield mid-listing gets a diagnostic naming the
//! directory it went missing from.
//!
//! There is no symlink cycle guard: a self-referencing directory structure
//! will recurse until the walk fails. Known limitation.

use crate::coords::{self, Coordinate};
use crate::geotag;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extensions that mark a file as an image to copy and geotag.
/// Fixed at build time; matching is case-insensitive.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "gif", "png", "tga"];

/// Archive namespace that image entries live under.
pub const IMAGE_DIR: &str = "images";

/// A node of the output document: a folder mirroring a directory, or a
/// placemark for one geotagged image.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DocumentNode {
    Folder(Folder),
    Placemark(Placemark),
}

#[derive(Debug, Serialize)]
pub struct Folder {
    pub name: String,
    pub children: Vec<DocumentNode>,
}

/// One geotagged image: base filename, archive-relative image reference,
/// decoded coordinate.
#[derive(Debug, Serialize)]
pub struct Placemark {
    pub name: String,
    pub href: String,
    pub coordinate: Coordinate,
}

/// A file that produced no placemark, with the reason it was passed over.
#[derive(Debug, Serialize)]
pub struct Skipped {
    pub path: String,
    pub reason: String,
}

/// Everything one traversal produced: the document tree plus run counters
/// and diagnostics for the CLI output layer.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub root: Folder,
    /// Files matching the extension allow-list (all handed to the sink).
    pub images: usize,
    pub placemarks: usize,
    pub skipped: Vec<Skipped>,
}

/// Destination for image bytes, called once per allow-listed file as the
/// walk encounters it. `relative` is the path from the source root and is
/// the same value the placemark reference is derived from.
pub trait ImageSink {
    fn add_image(&mut self, source: &Path, relative: &Path) -> io::Result<()>;
}

/// Sink that drops everything — used by `check`, which only wants the report.
pub struct NoopSink;

impl ImageSink for NoopSink {
    fn add_image(&mut self, _source: &Path, _relative: &Path) -> io::Result<()> {
        Ok(())
    }
}

/// Archive entry name for an image: `images/<relative-path>`, forward
/// slashes on every platform. Shared by the tree builder (placemark hrefs)
/// and the packager (zip entry names) so the two always agree.
pub fn archive_path(relative: &Path) -> String {
    let mut parts = vec![IMAGE_DIR.to_string()];
    parts.extend(
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

/// Walk `root` and build the document tree, feeding every matched image to
/// `sink` along the way. Fails only on an unlistable root or a sink error.
pub fn build_tree(root: &Path, sink: &mut dyn ImageSink) -> io::Result<ScanReport> {
    let (entries, failures) = list_entries(root)?;
    let mut state = WalkState::default();
    state.skip_listing_failures(Path::new("."), failures);
    let folder = scan_entries(node_name(root), entries, root, sink, &mut state)?;
    Ok(ScanReport {
        root: folder,
        images: state.images,
        placemarks: state.placemarks,
        skipped: state.skipped,
    })
}

#[derive(Default)]
struct WalkState {
    images: usize,
    placemarks: usize,
    skipped: Vec<Skipped>,
}

impl WalkState {
    fn skip(&mut self, relative: &Path, reason: String) {
        self.skipped.push(Skipped {
            path: relative.to_string_lossy().into_owned(),
            reason,
        });
    }

    /// One diagnostic per entry the OS failed to yield while iterating a
    /// directory. The entry's name is unknowable at that point, so the
    /// diagnostic carries the directory it went missing from.
    fn skip_listing_failures(&mut self, dir: &Path, failures: Vec<io::Error>) {
        for err in failures {
            self.skip(dir, format!("unreadable directory entry: {err}"));
        }
    }
}

fn scan_entries(
    name: String,
    entries: Vec<PathBuf>,
    root: &Path,
    sink: &mut dyn ImageSink,
    state: &mut WalkState,
) -> io::Result<Folder> {
    let mut folders = Vec::new();
    let mut placemarks = Vec::new();

    for entry in entries {
        let relative = entry.strip_prefix(root).unwrap_or(&entry).to_path_buf();

        if entry.is_dir() {
            let folder = match list_entries(&entry) {
                Ok((children, failures)) => {
                    state.skip_listing_failures(&relative, failures);
                    scan_entries(node_name(&entry), children, root, sink, state)?
                }
                Err(err) => {
                    state.skip(&relative, format!("unreadable directory: {err}"));
                    Folder {
                        name: node_name(&entry),
                        children: Vec::new(),
                    }
                }
            };
            folders.push(DocumentNode::Folder(folder));
        } else if is_image(&entry) {
            state.images += 1;
            // Copy first: archiving is unconditional on geotag success.
            sink.add_image(&entry, &relative)?;
            match placemark_for(&entry, &relative) {
                Ok(placemark) => {
                    state.placemarks += 1;
                    placemarks.push(DocumentNode::Placemark(placemark));
                }
                Err(reason) => state.skip(&relative, reason),
            }
        } else {
            state.skip(&relative, "not an image or directory".to_string());
        }
    }

    // Folder nodes come first; enumeration order holds within each kind.
    let mut children = folders;
    children.append(&mut placemarks);
    Ok(Folder { name, children })
}

fn placemark_for(path: &Path, relative: &Path) -> Result<Placemark, String> {
    let fields = geotag::extract(path).map_err(|e| e.to_string())?;
    let coordinate = coords::decode(&fields).map_err(|e| e.to_string())?;
    Ok(Placemark {
        name: node_name(path),
        href: archive_path(relative),
        coordinate,
    })
}

/// Immediate entries of a directory in enumeration order, plus any errors
/// the iteration yielded mid-stream (the caller turns those into skip
/// diagnostics — an entry the OS failed to yield must not vanish silently).
/// The listing itself failing is the caller's problem: fatal at the root, a
/// diagnostic below it.
fn list_entries(path: &Path) -> io::Result<(Vec<PathBuf>, Vec<io::Error>)> {
    let mut paths = Vec::new();
    let mut failures = Vec::new();
    for entry in fs::read_dir(path)? {
        match entry {
            Ok(entry) => paths.push(entry.path()),
            Err(err) => failures.push(err),
        }
    }
    Ok((paths, failures))
}

fn is_image(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

fn node_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
