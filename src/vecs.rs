//! Readers and writers for the `.fvecs` / `.ivecs` vector file formats.
//!
//! # Format
//!
//! A file is a sequence of records with no header:
//!
//! ```text
//! ┌──────────────┬─────────────────────────────┐
//! │ dim (i32 LE) │ dim components (4B each LE) │  record 0
//! ├──────────────┼─────────────────────────────┤
//! │ dim (i32 LE) │ ...                         │  record 1
//! └──────────────┴─────────────────────────────┘
//! ```
//!
//! `.fvecs` components are `f32`, `.ivecs` components are `i32` (ground-truth
//! neighbor lists use this). Every record in a file must share one dimension.

use crate::{Result, RetrieveError};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;
use tracing::debug;

/// Upper bound on components reserved before a record's bytes are read.
const MAX_PREALLOC: usize = 4096;

/// Read every record of an `.fvecs` file.
pub fn read_fvecs(path: impl AsRef<Path>) -> Result<Vec<Vec<f32>>> {
    let path = path.as_ref();
    let vectors = read_fvecs_from(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), records = vectors.len(), "read fvecs");
    Ok(vectors)
}

/// Read every record of an `.ivecs` file.
pub fn read_ivecs(path: impl AsRef<Path>) -> Result<Vec<Vec<i32>>> {
    let path = path.as_ref();
    let vectors = read_ivecs_from(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), records = vectors.len(), "read ivecs");
    Ok(vectors)
}

pub fn read_fvecs_from<R: Read>(reader: R) -> Result<Vec<Vec<f32>>> {
    read_records(reader, f32::from_le_bytes)
}

pub fn read_ivecs_from<R: Read>(reader: R) -> Result<Vec<Vec<i32>>> {
    read_records(reader, i32::from_le_bytes)
}

/// Write vectors as `.fvecs`.
pub fn write_fvecs(path: impl AsRef<Path>, vectors: &[Vec<f32>]) -> Result<()> {
    write_records(path.as_ref(), vectors, |x: &f32| x.to_le_bytes())
}

/// Write vectors as `.ivecs`.
pub fn write_ivecs(path: impl AsRef<Path>, vectors: &[Vec<i32>]) -> Result<()> {
    write_records(path.as_ref(), vectors, |x: &i32| x.to_le_bytes())
}

fn read_records<R, T>(mut reader: R, decode: fn([u8; 4]) -> T) -> Result<Vec<Vec<T>>>
where
    R: Read,
{
    let mut records = Vec::new();
    let mut expected_dim: Option<usize> = None;
    let mut buf = [0u8; 4];

    loop {
        // Clean EOF is only allowed on a record boundary.
        match read_word(&mut reader, &mut buf)? {
            Word::Eof => break,
            Word::Partial => {
                return Err(RetrieveError::MalformedFile(format!(
                    "truncated dimension header at record {}",
                    records.len()
                )))
            }
            Word::Full => {}
        }

        let raw_dim = i32::from_le_bytes(buf);
        if raw_dim <= 0 {
            return Err(RetrieveError::MalformedFile(format!(
                "record {} has non-positive dimension {raw_dim}",
                records.len()
            )));
        }
        let dim = raw_dim as usize;

        match expected_dim {
            None => expected_dim = Some(dim),
            Some(expected) if expected != dim => {
                return Err(RetrieveError::MalformedFile(format!(
                    "record {} has dimension {dim}, expected {expected}",
                    records.len()
                )))
            }
            Some(_) => {}
        }

        // dim comes from the file; grow past the cap only as bytes arrive
        let mut record = Vec::with_capacity(dim.min(MAX_PREALLOC));
        for _ in 0..dim {
            if !matches!(read_word(&mut reader, &mut buf)?, Word::Full) {
                return Err(RetrieveError::MalformedFile(format!(
                    "record {} is truncated",
                    records.len()
                )));
            }
            record.push(decode(buf));
        }
        records.push(record);
    }

    Ok(records)
}

enum Word {
    Full,
    Partial,
    Eof,
}

/// `read_exact` that tells a clean EOF apart from a short read.
fn read_word<R: Read>(reader: &mut R, buf: &mut [u8; 4]) -> Result<Word> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Ok(if filled == 0 { Word::Eof } else { Word::Partial });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(Word::Full)
}

fn write_records<T>(path: &Path, vectors: &[Vec<T>], encode: impl Fn(&T) -> [u8; 4]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for vector in vectors {
        let dim = i32::try_from(vector.len())
            .ok()
            .filter(|&d| d > 0)
            .ok_or_else(|| {
                RetrieveError::InvalidParameter(format!(
                    "cannot encode a record of length {}",
                    vector.len()
                ))
            })?;
        writer.write_all(&dim.to_le_bytes())?;
        for x in vector {
            writer.write_all(&encode(x))?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(records: &[(i32, Vec<f32>)]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for (dim, values) in records {
            bytes.extend_from_slice(&dim.to_le_bytes());
            for v in values {
                bytes.extend_from_slice(&v.to_le_bytes());
            }
        }
        bytes
    }

    #[test]
    fn reads_two_records() {
        let bytes = encode(&[(2, vec![1.0, 2.0]), (2, vec![3.0, 4.5])]);
        let vectors = read_fvecs_from(Cursor::new(bytes)).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 2.0], vec![3.0, 4.5]]);
    }

    #[test]
    fn empty_input_reads_no_records() {
        assert!(read_fvecs_from(Cursor::new(Vec::new())).unwrap().is_empty());
    }

    #[test]
    fn ivecs_decode_integers() {
        let mut bytes = Vec::new();
        for w in [3i32, 7, -1, 42] {
            bytes.extend_from_slice(&w.to_le_bytes());
        }
        let vectors = read_ivecs_from(Cursor::new(bytes)).unwrap();
        assert_eq!(vectors, vec![vec![7, -1, 42]]);
    }

    #[test]
    fn mixed_dimensions_are_malformed() {
        let bytes = encode(&[(2, vec![1.0, 2.0]), (3, vec![1.0, 2.0, 3.0])]);
        assert!(matches!(
            read_fvecs_from(Cursor::new(bytes)),
            Err(RetrieveError::MalformedFile(_))
        ));
    }

    #[test]
    fn truncated_record_is_malformed() {
        let mut bytes = encode(&[(3, vec![1.0, 2.0, 3.0])]);
        bytes.truncate(bytes.len() - 2);
        assert!(matches!(
            read_fvecs_from(Cursor::new(bytes)),
            Err(RetrieveError::MalformedFile(_))
        ));
    }

    #[test]
    fn trailing_partial_header_is_malformed() {
        let mut bytes = encode(&[(1, vec![1.0])]);
        bytes.extend_from_slice(&[1, 0]);
        assert!(matches!(
            read_fvecs_from(Cursor::new(bytes)),
            Err(RetrieveError::MalformedFile(_))
        ));
    }

    #[test]
    fn non_positive_dimension_is_malformed() {
        let bytes = encode(&[(0, vec![])]);
        assert!(matches!(
            read_fvecs_from(Cursor::new(bytes)),
            Err(RetrieveError::MalformedFile(_))
        ));
    }

    #[test]
    fn huge_dimension_header_without_data_is_malformed() {
        let bytes = i32::MAX.to_le_bytes().to_vec();
        assert!(matches!(
            read_fvecs_from(Cursor::new(bytes.clone())),
            Err(RetrieveError::MalformedFile(_))
        ));
        assert!(matches!(
            read_ivecs_from(Cursor::new(bytes)),
            Err(RetrieveError::MalformedFile(_))
        ));
    }
}
