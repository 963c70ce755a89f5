//! # Binary STL
//!
//! Little-endian binary STL output and the matching reader.
//!
//! ## Layout
//!
//! - 80-byte header, free text padded with spaces
//! - `u32` facet count
//! - one 50-byte record per facet: normal, three vertices (all `f32`
//!   triples), then a zero `u16` attribute
//!
//! The count is written as a placeholder and patched once the records are
//! out, so it always matches what was written.

use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use config::constants::{STL_FACET_SIZE, STL_HEADER_SIZE};
use glam::Vec3;
use rayon::prelude::*;

use crate::error::{MeshError, MeshResult};
use crate::mesh::{Facet, Mesh};

const HEADER_TEXT: &[u8] = b"binary STL from terrain-mesh";

/// Bytes before the first facet record.
const PREAMBLE_SIZE: usize = STL_HEADER_SIZE + 4;

/// Writes `mesh` to `sink` and returns the number of facets written.
///
/// Writing starts at the sink's current position. Sink errors are returned
/// as [`MeshError::Io`] without retrying.
pub fn write_stl<W: Write + Seek>(mesh: &Mesh, mut sink: W) -> MeshResult<u32> {
    let count = u32::try_from(mesh.face_count()).map_err(|_| MeshError::TooManyFacets {
        count: mesh.face_count(),
        max: u32::MAX as usize,
    })?;

    let start = sink.stream_position()?;
    let mut header = [b' '; STL_HEADER_SIZE];
    header[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT);
    sink.write_all(&header)?;
    sink.write_all(&0u32.to_le_bytes())?;

    let mut records = vec![0u8; mesh.face_count() * STL_FACET_SIZE];
    records
        .par_chunks_mut(STL_FACET_SIZE)
        .zip(mesh.faces().par_iter())
        .for_each(|(record, face)| encode_facet(&mesh.facet(face), record));
    sink.write_all(&records)?;

    let end = sink.stream_position()?;
    sink.seek(SeekFrom::Start(start + STL_HEADER_SIZE as u64))?;
    sink.write_all(&count.to_le_bytes())?;
    sink.seek(SeekFrom::Start(end))?;
    sink.flush()?;

    tracing::info!(facets = count, "wrote binary STL");
    Ok(count)
}

/// Encodes `mesh` into an in-memory binary STL.
///
/// # Example
///
/// ```rust
/// use terrain_mesh::{encode_stl, Mesh};
///
/// let bytes = encode_stl(&Mesh::new())?;
/// assert_eq!(bytes.len(), 84);
/// assert_eq!(&bytes[80..], &[0, 0, 0, 0]);
/// # Ok::<(), terrain_mesh::MeshError>(())
/// ```
pub fn encode_stl(mesh: &Mesh) -> MeshResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::with_capacity(
        PREAMBLE_SIZE + mesh.face_count() * STL_FACET_SIZE,
    ));
    write_stl(mesh, &mut cursor)?;
    Ok(cursor.into_inner())
}

/// Writes `mesh` to a file, replacing it if it exists.
pub fn save_stl<P: AsRef<Path>>(mesh: &Mesh, path: P) -> MeshResult<u32> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let written = write_stl(mesh, &mut writer)?;
    writer.flush()?;
    Ok(written)
}

/// Reads every facet of a binary STL.
///
/// Fails if the header is short or fewer records follow than it announces.
pub fn read_stl<R: Read>(mut reader: R) -> MeshResult<Vec<Facet>> {
    let mut preamble = [0u8; PREAMBLE_SIZE];
    let got = read_full(&mut reader, &mut preamble)?;
    if got < PREAMBLE_SIZE {
        return Err(MeshError::InvalidHeader {
            expected: PREAMBLE_SIZE,
            got,
        });
    }

    let count = u32::from_le_bytes([
        preamble[STL_HEADER_SIZE],
        preamble[STL_HEADER_SIZE + 1],
        preamble[STL_HEADER_SIZE + 2],
        preamble[STL_HEADER_SIZE + 3],
    ]);

    let mut facets = Vec::with_capacity(count.min(1 << 20) as usize);
    let mut record = [0u8; STL_FACET_SIZE];
    for read in 0..count {
        if read_full(&mut reader, &mut record)? < STL_FACET_SIZE {
            return Err(MeshError::TruncatedFacets {
                expected: count,
                got: read,
            });
        }
        facets.push(decode_facet(&record));
    }
    Ok(facets)
}

fn encode_facet(facet: &Facet, record: &mut [u8]) {
    let [a, b, c] = facet.vertices;
    let vectors = [facet.normal, a, b, c];
    let values = vectors.iter().flat_map(|v| v.to_array());
    for (slot, value) in record.chunks_exact_mut(4).zip(values) {
        slot.copy_from_slice(&value.to_le_bytes());
    }
    record[STL_FACET_SIZE - 2..].copy_from_slice(&0u16.to_le_bytes());
}

fn decode_facet(record: &[u8]) -> Facet {
    let read_vec3 = |offset: usize| {
        let f = |i: usize| {
            let at = offset + i * 4;
            f32::from_le_bytes([record[at], record[at + 1], record[at + 2], record[at + 3]])
        };
        Vec3::new(f(0), f(1), f(2))
    };
    Facet {
        normal: read_vec3(0),
        vertices: [read_vec3(12), read_vec3(24), read_vec3(36)],
    }
}

/// Fills `buf` as far as the reader allows; returns the bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
