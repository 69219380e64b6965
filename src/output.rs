//! CLI output formatting for the traversal report.
//!
//! Output mirrors the document that will be (or was) packaged: the folder
//! tree at 4-space indents with each placemark's decoded coordinate, then a
//! `Skipped` section listing every file that produced no placemark and why,
//! then a one-line summary.
//!
//! ```text
//! trip/
//!     day2/
//!         c.gif (-40.446111, 79.982222)
//!     a.jpg (40.446111, -79.982222)
//!
//! Skipped
//!     day2/b.png: no readable metadata: ...
//!
//! 3 images, 2 placemarks, 1 skipped
//! ```
//!
//! Each section has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::tree::{DocumentNode, Folder, ScanReport};

/// Indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Render the full report: tree, skip section, summary.
pub fn format_report(report: &ScanReport) -> Vec<String> {
    let mut lines = Vec::new();
    format_folder(&report.root, 0, &mut lines);

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for skip in &report.skipped {
            lines.push(format!("{}{}: {}", indent(1), skip.path, skip.reason));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{} images, {} placemarks, {} skipped",
        report.images,
        report.placemarks,
        report.skipped.len()
    ));
    lines
}

fn format_folder(folder: &Folder, depth: usize, lines: &mut Vec<String>) {
    lines.push(format!("{}{}/", indent(depth), folder.name));
    for child in &folder.children {
        match child {
            DocumentNode::Folder(sub) => format_folder(sub, depth + 1, lines),
            DocumentNode::Placemark(mark) => lines.push(format!(
                "{}{} ({:.6}, {:.6})",
                indent(depth + 1),
                mark.name,
                mark.coordinate.lat,
                mark.coordinate.lon
            )),
        }
    }
}

pub fn print_report(report: &ScanReport) {
    for line in format_report(report) {
        println!("{line}");
    }
}
