use clap::{Parser, Subcommand};
use photomap::{archive, output, tree};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photomap")]
#[command(about = "Package geotagged photos into a KMZ map archive")]
#[command(long_about = "\
Package geotagged photos into a KMZ map archive

Walks a photo directory, reads each image's embedded GPS geotag, and writes a
single zip archive holding every image plus a main.kml document whose folder
tree mirrors the directory structure — one placemark per geotagged photo,
ready for any KML viewer.

Source structure:

  trip/
  ├── a.jpg                    # geotagged → placemark at its coordinates
  ├── notes.txt                # not an image → diagnostic, ignored
  └── day2/                    # directory → nested folder in the document
      ├── b.png                # no GPS data → copied, no placemark
      └── c.gif                # geotagged → placemark inside the day2 folder

Archive layout:

  trip.kmz
  ├── main.kml                 # document tree with placemarks
  └── images/                  # byte-for-byte copies, structure preserved
      ├── a.jpg
      └── day2/
          ├── b.png
          └── c.gif

Every image matching the allow-list (.jpg .gif .png .tga, case-insensitive)
is copied whether or not its geotag decodes; files that produce no placemark
are reported with the reason. Run 'photomap check' to preview the document
tree without writing an archive.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Walk a photo directory and package it into an archive
    Build {
        /// Source photo directory
        source: PathBuf,
        /// Target archive path (e.g. trip.kmz)
        archive: PathBuf,
    },
    /// Report the document tree and skipped files without writing an archive
    Check {
        /// Source photo directory
        source: PathBuf,
        /// Print the report as JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build { source, archive: target } => {
            println!("==> Packaging {}", source.display());
            let report = archive::package(&source, &target)?;
            output::print_report(&report);
            println!("==> Archive complete: {}", target.display());
        }
        Command::Check { source, json } => {
            let report = tree::build_tree(&source, &mut tree::NoopSink)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_report(&report);
            }
        }
    }

    Ok(())
}
