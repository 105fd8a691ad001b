//! Archiving of the document stream
//!
//! Compresses the `.jpl` document stream into a single-entry `.vad` zip
//! archive and reports the original and compressed byte counts. The
//! source document stream is consumed by this step whether or not the
//! archive could be written; a partial archive never survives a failure.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{ArchiveError, ArchiveResult};

/// Fixed name of the document stream inside the archive
pub const DATA_NAME_IN_ARCHIVE: &str = "data.jpl";

/// Extension of the archive artifact
pub const ARCHIVE_EXTENSION: &str = "vad";

/// Result of a successful archiving step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    pub path: PathBuf,
    pub original_size: u64,
    pub compressed_size: u64,
}

/// Compress the document stream at `jpl_path` into a sibling `.vad`
/// archive
pub fn compress(jpl_path: &Path) -> ArchiveResult<ArchiveReport> {
    let vad_path = jpl_path.with_extension(ARCHIVE_EXTENSION);
    let written = write_archive(&vad_path, jpl_path);

    // The document stream is this step's input and is removed no matter
    // how the step ends.
    if jpl_path.exists() {
        let _ = fs::remove_file(jpl_path);
    }

    match written {
        Ok(()) => {
            let (original_size, compressed_size) = compression_info(&vad_path)?;
            Ok(ArchiveReport {
                path: vad_path,
                original_size,
                compressed_size,
            })
        }
        Err(err) => {
            if vad_path.exists() {
                let _ = fs::remove_file(&vad_path);
            }
            Err(err)
        }
    }
}

fn write_archive(vad_path: &Path, jpl_path: &Path) -> ArchiveResult<()> {
    let mut source = File::open(jpl_path).map_err(|err| ArchiveError::io(jpl_path, err))?;
    let archive_file = File::create(vad_path).map_err(|err| ArchiveError::io(vad_path, err))?;

    let mut writer = ZipWriter::new(archive_file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    writer
        .start_file(DATA_NAME_IN_ARCHIVE, options)
        .map_err(|err| ArchiveError::zip(vad_path, err))?;
    io::copy(&mut source, &mut writer).map_err(|err| ArchiveError::io(jpl_path, err))?;
    writer
        .finish()
        .map_err(|err| ArchiveError::zip(vad_path, err))?;
    Ok(())
}

/// Read the entry sizes back out of the finished archive's directory
fn compression_info(vad_path: &Path) -> ArchiveResult<(u64, u64)> {
    let file = File::open(vad_path).map_err(|err| ArchiveError::io(vad_path, err))?;
    let mut archive = ZipArchive::new(file).map_err(|err| ArchiveError::zip(vad_path, err))?;
    let entry = archive
        .by_name(DATA_NAME_IN_ARCHIVE)
        .map_err(|err| ArchiveError::zip(vad_path, err))?;
    Ok((entry.size(), entry.compressed_size()))
}
