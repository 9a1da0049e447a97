//! MAT v5 record files.
//!
//! Each unit lives in its own file (`B0001.mat`, ...) holding top-level
//! numeric arrays named `cycle`, `capacity` and optionally `impedance`.
//! Arrays are stored column-major as n x 1 matrices; only the first column
//! is read.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use matfile::{MatFile, NumericData};
use tracing::trace;

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};

use super::record::{RecordSource, RecordStore};

/// A parsed MAT file for one unit.
pub struct MatRecord {
    id: String,
    file: MatFile,
}

impl fmt::Debug for MatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatRecord")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl MatRecord {
    /// Parses a record from any reader.
    pub fn parse<R: Read>(id: impl Into<String>, reader: R) -> Result<Self> {
        let id = id.into();
        let file = MatFile::parse(reader)
            .map_err(|e| Error::malformed(&id, format!("not a MAT v5 file: {e:?}")))?;
        Ok(Self { id, file })
    }

    /// Opens and parses the file at `path`.
    ///
    /// A missing file is reported as [`Error::NotFound`]; other I/O failures
    /// as [`Error::Io`].
    pub fn open(id: impl Into<String>, path: &Path) -> Result<Self> {
        let id = id.into();
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::NotFound { unit: id });
            }
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        trace!(unit = %id, path = %path.display(), "parsing MAT record");
        Self::parse(id, BufReader::new(file))
    }
}

impl RecordSource for MatRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn column(&self, name: &str) -> Result<Option<Vec<f64>>> {
        let Some(array) = self.file.find_by_name(name) else {
            return Ok(None);
        };
        let values = real_values(&self.id, name, array.data())?;
        let rows = array.size().first().copied().unwrap_or(0);
        if values.len() < rows {
            return Err(Error::malformed(
                &self.id,
                format!("'{name}' declares {rows} rows but holds {} values", values.len()),
            ));
        }
        Ok(Some(values[..rows].to_vec()))
    }
}

/// Converts any real numeric class to `f64`.
fn real_values(unit: &str, name: &str, data: &NumericData) -> Result<Vec<f64>> {
    macro_rules! widen {
        ($real:expr, $imag:expr) => {{
            if $imag.is_some() {
                return Err(Error::malformed(unit, format!("'{name}' is complex")));
            }
            $real.iter().map(|&v| v as f64).collect()
        }};
    }

    let values: Vec<f64> = match data {
        NumericData::Double { real, imag } => widen!(real, imag),
        NumericData::Single { real, imag } => widen!(real, imag),
        NumericData::Int8 { real, imag } => widen!(real, imag),
        NumericData::UInt8 { real, imag } => widen!(real, imag),
        NumericData::Int16 { real, imag } => widen!(real, imag),
        NumericData::UInt16 { real, imag } => widen!(real, imag),
        NumericData::Int32 { real, imag } => widen!(real, imag),
        NumericData::UInt32 { real, imag } => widen!(real, imag),
        NumericData::Int64 { real, imag } => widen!(real, imag),
        NumericData::UInt64 { real, imag } => widen!(real, imag),
    };
    Ok(values)
}

/// A directory of per-unit MAT files.
///
/// Record `B0003` maps to `<root>/B0003.mat` (the extension is configurable).
#[derive(Debug, Clone)]
pub struct MatDirectory {
    root: PathBuf,
    extension: String,
}

impl MatDirectory {
    /// Store over `root` using the `.mat` extension.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: ExtractionConfig::default().extension,
        }
    }

    /// Store over `root` using the extension from `config`.
    pub fn with_config(root: impl Into<PathBuf>, config: &ExtractionConfig) -> Self {
        Self {
            root: root.into(),
            extension: config.extension.clone(),
        }
    }

    /// Directory holding the records.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file for record `id`.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.{}", self.extension))
    }
}

impl RecordStore for MatDirectory {
    type Record = MatRecord;

    fn open(&self, id: &str) -> Result<MatRecord> {
        MatRecord::open(id, &self.path_for(id))
    }
}

/// Minimal MAT v5 writer for tests.
#[cfg(test)]
pub(crate) mod testutil {
    use std::fs;
    use std::path::Path;

    const MI_INT8: u32 = 1;
    const MI_INT32: u32 = 5;
    const MI_UINT32: u32 = 6;
    const MI_DOUBLE: u32 = 9;
    const MI_MATRIX: u32 = 14;
    const MX_DOUBLE_CLASS: u32 = 6;

    fn tag(out: &mut Vec<u8>, data_type: u32, len: usize) {
        out.extend_from_slice(&data_type.to_le_bytes());
        out.extend_from_slice(&(len as u32).to_le_bytes());
    }

    fn pad8(out: &mut Vec<u8>) {
        while out.len() % 8 != 0 {
            out.push(0);
        }
    }

    /// Encodes a double matrix with `rows` x `cols` column-major values.
    pub fn double_matrix(name: &str, rows: usize, cols: usize, values: &[f64]) -> Vec<u8> {
        assert_eq!(rows * cols, values.len());
        let mut body = Vec::new();

        tag(&mut body, MI_UINT32, 8);
        body.extend_from_slice(&MX_DOUBLE_CLASS.to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes());

        tag(&mut body, MI_INT32, 8);
        body.extend_from_slice(&(rows as i32).to_le_bytes());
        body.extend_from_slice(&(cols as i32).to_le_bytes());

        tag(&mut body, MI_INT8, name.len());
        body.extend_from_slice(name.as_bytes());
        pad8(&mut body);

        tag(&mut body, MI_DOUBLE, values.len() * 8);
        for v in values {
            body.extend_from_slice(&v.to_le_bytes());
        }

        let mut out = Vec::with_capacity(body.len() + 8);
        tag(&mut out, MI_MATRIX, body.len());
        out.extend_from_slice(&body);
        out
    }

    /// Encodes a full MAT file with one n x 1 double column per entry.
    pub fn mat_bytes<C: AsRef<[f64]>>(columns: &[(&str, C)]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut text = b"MATLAB 5.0 MAT-file, written by u-battery tests".to_vec();
        text.resize(116, b' ');
        out.extend_from_slice(&text);
        out.extend_from_slice(&[0u8; 8]);
        out.extend_from_slice(&0x0100u16.to_le_bytes());
        out.extend_from_slice(b"IM");
        for (name, values) in columns {
            let values = values.as_ref();
            out.extend_from_slice(&double_matrix(name, values.len(), 1, values));
        }
        out
    }

    /// Writes a MAT file with the given columns.
    pub fn write_mat<C: AsRef<[f64]>>(path: &Path, columns: &[(&str, C)]) {
        fs::write(path, mat_bytes(columns)).expect("write MAT file");
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::{double_matrix, mat_bytes, write_mat};
    use super::*;
    use crate::loader::load_unit_record;

    #[test]
    fn parse_columns() {
        let bytes = mat_bytes(&[
            ("cycle", vec![1.0, 2.0, 3.0]),
            ("capacity", vec![1.85, 1.84, 1.80]),
        ]);
        let rec = MatRecord::parse("B0001", bytes.as_slice()).expect("valid MAT");
        assert_eq!(rec.id(), "B0001");
        assert_eq!(
            rec.column("capacity").expect("readable"),
            Some(vec![1.85, 1.84, 1.80])
        );
        assert_eq!(rec.column("impedance").expect("readable"), None);
    }

    #[test]
    fn first_column_only() {
        let mut bytes = mat_bytes::<Vec<f64>>(&[]);
        // 3 x 2, column-major: first column is 1, 2, 3
        bytes.extend_from_slice(&double_matrix("cycle", 3, 2, &[1.0, 2.0, 3.0, 9.0, 9.0, 9.0]));
        let rec = MatRecord::parse("B0001", bytes.as_slice()).expect("valid MAT");
        assert_eq!(rec.column("cycle").expect("readable"), Some(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn garbage_is_malformed() {
        let bytes = vec![0u8; 40];
        let err = MatRecord::parse("B0009", bytes.as_slice()).unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }), "got {err:?}");
    }

    #[test]
    fn directory_open_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = MatDirectory::new(dir.path());
        write_mat(
            &store.path_for("B0001"),
            &[
                ("cycle", vec![1.0, 2.0, 3.0, 4.0]),
                ("capacity", vec![2.0, 1.9, 1.5, 1.4]),
                ("impedance", vec![0.05, 0.06, 0.07, 0.08]),
            ],
        );

        let rec = store.open("B0001").expect("file exists");
        let unit = load_unit_record(&rec).expect("valid record");
        assert_eq!(unit.cycle, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(unit.impedance, vec![0.05, 0.06, 0.07, 0.08]);
    }

    #[test]
    fn directory_missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = MatDirectory::new(dir.path());
        let err = store.open("B0042").unwrap_err();
        assert!(err.is_not_found(), "got {err:?}");
    }

    #[test]
    fn directory_custom_extension() {
        let cfg = ExtractionConfig {
            extension: "bin".to_string(),
            ..ExtractionConfig::default()
        };
        let store = MatDirectory::with_config("/data", &cfg);
        assert_eq!(store.root(), Path::new("/data"));
        assert_eq!(store.path_for("B0001"), Path::new("/data/B0001.bin"));
    }
}
