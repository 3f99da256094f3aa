use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::bufread::GzDecoder;
use itertools::Itertools;
use strum_macros::Display;
use zip::ZipArchive;
use zstd::stream::read::Decoder as ZstdDecoder;

use crate::error::{Error, Result};

/// One input row. `z` is read but never binned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Compression detected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Compression {
    None,
    Gzip,
    Zstd,
    Zip,
}

impl Compression {
    pub fn from_path(path: &Path) -> Self {
        let path_str = path.to_string_lossy().to_lowercase();
        if path_str.ends_with(".gz") || path_str.ends_with(".gzip") {
            Compression::Gzip
        } else if path_str.ends_with(".zst") || path_str.ends_with(".zstd") {
            Compression::Zstd
        } else if path_str.ends_with(".zip") {
            Compression::Zip
        } else {
            Compression::None
        }
    }
}

/// Iterator over the records of a point file
pub struct PointTrackIterator {
    reader: Box<dyn BufRead>,
    line_no: usize,
    skip_header: bool,
}

impl Iterator for PointTrackIterator {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None, // EOF
                Ok(_) => {
                    self.line_no += 1;
                    if self.skip_header {
                        self.skip_header = false;
                        log::debug!("Skipping header line: {:?}", line.trim_end());
                        continue;
                    }
                    match PointTrack::parse_line(&line, self.line_no) {
                        Ok(Some(record)) => return Some(Ok(record)),
                        Ok(None) => continue, // blank
                        Err(e) => return Some(Err(e)),
                    }
                }
                Err(e) => return Some(Err(Error::Io(e))),
            }
        }
    }
}

/// Lazily read file of comma separated `x,y,z` rows
#[derive(Debug)]
pub struct PointTrack {
    file_path: PathBuf,
    header: bool,
}

impl PointTrack {
    pub fn new(file_path: impl Into<PathBuf>) -> Result<Self> {
        let path = file_path.into();
        // Verify file exists
        if let Err(source) = File::open(&path) {
            return Err(Error::Open { path, source });
        }

        Ok(Self {
            file_path: path,
            header: false,
        })
    }

    /// Treat the first line as a header and skip it
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Create a reader that handles compression based on file extension
    fn create_reader(&self) -> Result<Box<dyn BufRead>> {
        let file = File::open(&self.file_path).map_err(|source| Error::Open {
            path: self.file_path.clone(),
            source,
        })?;
        let compression = Compression::from_path(&self.file_path);
        log::debug!(
            "Reading {} ({} compression)",
            self.file_path.display(),
            compression
        );

        match compression {
            Compression::Gzip => {
                let decoder = GzDecoder::new(BufReader::new(file));
                Ok(Box::new(BufReader::new(decoder)))
            }
            Compression::Zstd => {
                let decoder = ZstdDecoder::new(file)?;
                Ok(Box::new(BufReader::new(decoder)))
            }
            Compression::Zip => {
                // first entry only, read into memory
                let mut archive = ZipArchive::new(file)?;
                if archive.len() == 0 {
                    return Err(Error::EmptyArchive);
                }
                let mut zip_file = archive.by_index(0)?;
                let mut contents = Vec::new();
                std::io::copy(&mut zip_file, &mut contents)?;
                Ok(Box::new(BufReader::new(std::io::Cursor::new(contents))))
            }
            Compression::None => Ok(Box::new(BufReader::new(file))),
        }
    }

    /// Parse a single `x,y,z` row. Blank lines yield `None`.
    fn parse_line(line: &str, line_no: usize) -> Result<Option<Record>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let Some((x, y, z)) = fields.iter().copied().collect_tuple() else {
            return Err(Error::FieldCount {
                line: line_no,
                found: fields.len(),
            });
        };

        let number = |column: &'static str, value: &str| {
            value.parse::<f64>().map_err(|_| Error::InvalidNumber {
                line: line_no,
                column,
                value: value.to_string(),
            })
        };

        Ok(Some(Record {
            x: number("x", x)?,
            y: number("y", y)?,
            z: number("z", z)?,
        }))
    }

    /// Returns an iterator over all rows
    pub fn iter(&self) -> Result<PointTrackIterator> {
        let reader = self.create_reader()?;
        Ok(PointTrackIterator {
            reader,
            line_no: 0,
            skip_header: self.header,
        })
    }

    /// Read every row into memory, in file order. The first bad row aborts.
    pub fn records(&self) -> Result<Vec<Record>> {
        self.iter()?.collect()
    }
}
