//! On-disk snapshot container: magic bytes, a length-prefixed JSON header,
//! then the grid body deflate-compressed.
//!
//! Modeled directly on the teacher's `EvoRecorder`/`EvoHeader`
//! (`MAGIC_BYTES` + u32 LE header length + JSON header + raw body), with
//! the per-frame tensor body replaced by a single whole-grid write and the
//! body compressed with `flate2` (the reference's `.npz` container is
//! itself compressed; nothing else in the crate already needs a
//! compression dependency, so `flate2` is the natural choice).

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StencilError};
use crate::grid::GridBuffer;

const MAGIC_BYTES: &[u8; 4] = b"GOL1";
const FORMAT_VERSION: u32 = 1;

/// Metadata carried alongside the grid. `nx`/`ny` are always present (the
/// body cannot be decoded without them); the rest is only populated on the
/// step-0 and final snapshots per `SPEC_FULL.md` §6.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotMeta {
    pub nx: usize,
    pub ny: usize,
    pub pattern: Option<String>,
    pub seed: Option<u64>,
    pub checksum: Option<u64>,
    pub alive_cells: Option<u64>,
    pub elapsed_time: Option<f64>,
}

impl SnapshotMeta {
    pub fn bare(nx: usize, ny: usize) -> Self {
        SnapshotMeta {
            nx,
            ny,
            pattern: None,
            seed: None,
            checksum: None,
            alive_cells: None,
            elapsed_time: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotHeader {
    version: u32,
    timestamp: String,
    meta: SnapshotMeta,
}

/// Writes `grid` plus `meta` to `path` as a single snapshot container.
pub fn write_snapshot(path: &Path, grid: &GridBuffer, meta: SnapshotMeta) -> Result<()> {
    let header = SnapshotHeader {
        version: FORMAT_VERSION,
        timestamp: chrono::Utc::now().to_rfc3339(),
        meta,
    };
    let header_json = serde_json::to_vec(&header)
        .map_err(|e| StencilError::io(format!("failed to encode snapshot header: {e}")))?;

    let file = File::create(path)
        .map_err(|e| StencilError::io(format!("failed to create {}: {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(MAGIC_BYTES)
        .and_then(|_| writer.write_all(&(header_json.len() as u32).to_le_bytes()))
        .and_then(|_| writer.write_all(&header_json))
        .map_err(|e| StencilError::io(format!("failed to write snapshot header: {e}")))?;

    let mut encoder = ZlibEncoder::new(writer, Compression::default());
    encoder
        .write_all(grid.as_slice())
        .map_err(|e| StencilError::io(format!("failed to write snapshot body: {e}")))?;
    encoder
        .finish()
        .map_err(|e| StencilError::io(format!("failed to flush snapshot body: {e}")))?;
    Ok(())
}

/// Reads back a snapshot written by [`write_snapshot`].
pub fn read_snapshot(path: &Path) -> Result<(SnapshotMeta, GridBuffer)> {
    let file = File::open(path)
        .map_err(|e| StencilError::io(format!("failed to open {}: {e}", path.display())))?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 4];
    reader
        .read_exact(&mut magic)
        .map_err(|e| StencilError::io(format!("failed to read magic bytes: {e}")))?;
    if &magic != MAGIC_BYTES {
        return Err(StencilError::io(format!(
            "{} is not a recognized snapshot (bad magic bytes)",
            path.display()
        )));
    }

    let mut len_bytes = [0u8; 4];
    reader
        .read_exact(&mut len_bytes)
        .map_err(|e| StencilError::io(format!("failed to read header length: {e}")))?;
    let header_len = u32::from_le_bytes(len_bytes) as usize;

    let mut header_bytes = vec![0u8; header_len];
    reader
        .read_exact(&mut header_bytes)
        .map_err(|e| StencilError::io(format!("failed to read header: {e}")))?;
    let header: SnapshotHeader = serde_json::from_slice(&header_bytes)
        .map_err(|e| StencilError::io(format!("failed to decode header: {e}")))?;

    let mut decoder = ZlibDecoder::new(reader);
    let mut cells = Vec::with_capacity(header.meta.nx * header.meta.ny);
    decoder
        .read_to_end(&mut cells)
        .map_err(|e| StencilError::io(format!("failed to read snapshot body: {e}")))?;

    let grid = GridBuffer::from_cells(header.meta.ny, header.meta.nx, cells)?;
    Ok((header.meta, grid))
}

/// The path a snapshot for `step` is written to, matching the reference's
/// `step_{step:06d}.npz` naming (with this format's own extension).
pub fn snapshot_path(output_dir: &Path, step: u64) -> std::path::PathBuf {
    output_dir.join(format!("step_{step:06}.snap"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal stand-in for a temp-dir helper; avoids adding `tempfile` as a
    // dependency purely for one test module.
    mod tempfile_free_test {
        use std::path::PathBuf;
        pub fn dir(tag: &str) -> PathBuf {
            let mut p = std::env::temp_dir();
            p.push(format!("torus-stencil-test-{tag}-{}", std::process::id()));
            std::fs::create_dir_all(&p).unwrap();
            p
        }
    }

    #[test]
    fn writes_and_reads_back_identical_grid_and_metadata() {
        let dir = tempfile_free_test::dir("snapshot-roundtrip");
        let path = dir.join("step_000000.snap");

        let mut grid = GridBuffer::new(4, 5);
        grid.set(1, 1, 1);
        grid.set(3, 4, 1);

        let mut meta = SnapshotMeta::bare(5, 4);
        meta.pattern = Some("glider".to_string());
        meta.seed = Some(42);
        meta.alive_cells = Some(grid.alive_count());

        write_snapshot(&path, &grid, meta.clone()).unwrap();
        let (read_meta, read_grid) = read_snapshot(&path).unwrap();

        assert_eq!(read_grid, grid);
        assert_eq!(read_meta, meta);
    }

    #[test]
    fn rejects_files_with_wrong_magic_bytes() {
        let dir = tempfile_free_test::dir("snapshot-bad-magic");
        let path = dir.join("not_a_snapshot.snap");
        std::fs::write(&path, b"not a snapshot at all").unwrap();
        assert!(read_snapshot(&path).is_err());
    }

    #[test]
    fn snapshot_path_matches_six_digit_step_convention() {
        let p = snapshot_path(Path::new("out"), 42);
        assert_eq!(p, Path::new("out/step_000042.snap"));
    }
}
