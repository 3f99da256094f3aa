pub mod error;
pub mod grid;
pub mod track;

pub use error::{Error, Result};
pub use grid::{bin_index, bin_indices, Grid, OutputFormat};
pub use track::{Compression, PointTrack, Record};

/// Default number of cells per grid axis
pub const BOX: usize = 10;

/// Default input file
pub const CSV_FILE: &str = "data.csv";

/// Record counts from one histogram pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub records: usize,
    pub counted: usize,
    pub dropped: usize,
}

/// Grid together with the counts of what went into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    pub grid: Grid,
    pub summary: Summary,
}

/// Build a `size × size` histogram from all records of `track`.
///
/// Runs the whole pipeline: every row is loaded first, the x and y columns
/// are mapped to bin indices, then the pairs are counted. Any unreadable or
/// malformed row aborts before the grid is touched.
pub fn histogram_file(track: &PointTrack, size: usize) -> Result<Histogram> {
    let mut grid = Grid::new(size)?;
    let records = track.records()?;

    let bin_x = bin_indices(records.iter().map(|r| r.x), size);
    let bin_y = bin_indices(records.iter().map(|r| r.y), size);
    let counted = grid.accumulate(&bin_x, &bin_y);

    let summary = Summary {
        records: records.len(),
        counted,
        dropped: records.len() - counted,
    };
    Ok(Histogram { grid, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(suffix).unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_histogram_file() {
        let file = create_test_file(".csv", "1,1,0\n1,1,0\n15,2,0\n");
        let track = PointTrack::new(file.path()).unwrap();

        let hist = histogram_file(&track, BOX).unwrap();
        assert_eq!(hist.grid.get(1, 1), Some(2));
        assert_eq!(hist.grid.total(), 2);
        assert_eq!(
            hist.summary,
            Summary {
                records: 3,
                counted: 2,
                dropped: 1
            }
        );
    }

    #[test]
    fn test_histogram_empty_file() {
        let file = create_test_file(".csv", "");
        let track = PointTrack::new(file.path()).unwrap();

        let hist = histogram_file(&track, BOX).unwrap();
        assert_eq!(hist.grid, Grid::new(BOX).unwrap());
        assert_eq!(hist.summary, Summary::default());
    }

    #[test]
    fn test_histogram_is_deterministic() {
        let file = create_test_file(".csv", "0.5,9.5,1\n3.25,3.75,2\n-1,4,0\n3.5,3.5,7\n");
        let track = PointTrack::new(file.path()).unwrap();

        let first = histogram_file(&track, BOX).unwrap();
        let second = histogram_file(&track, BOX).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.grid.get(3, 3), Some(2));
        assert_eq!(first.summary.dropped, 1);
    }

    #[test]
    fn test_histogram_custom_box() {
        let file = create_test_file(".csv", "15.5,2.5,0\n99.5,99.5,0\n100,0,0\n");
        let track = PointTrack::new(file.path()).unwrap();

        let hist = histogram_file(&track, 100).unwrap();
        assert_eq!(hist.grid.size(), 100);
        assert_eq!(hist.grid.get(15, 2), Some(1));
        assert_eq!(hist.grid.get(99, 99), Some(1));
        assert_eq!(hist.summary.dropped, 1);
    }

    #[test]
    fn test_histogram_malformed_row_is_fatal() {
        let file = create_test_file(".csv", "1,1,0\n2,2\n");
        let track = PointTrack::new(file.path()).unwrap();

        match histogram_file(&track, BOX) {
            Err(Error::FieldCount { line, found }) => {
                assert_eq!(line, 2);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_histogram_rejects_zero_box() {
        let file = create_test_file(".csv", "1,1,0\n");
        let track = PointTrack::new(file.path()).unwrap();
        assert!(matches!(histogram_file(&track, 0), Err(Error::InvalidBox(0))));
    }

    #[test]
    fn test_compressed_matches_plain() {
        use flate2::write::GzEncoder;

        let content = "1,1,0\n2.5,7.5,0\n2.5,7.5,0\n11,1,0\n";
        let plain = create_test_file(".csv", content);

        let mut gz = NamedTempFile::with_suffix(".csv.gz").unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        gz.write_all(&encoder.finish().unwrap()).unwrap();
        gz.flush().unwrap();

        let from_plain = histogram_file(&PointTrack::new(plain.path()).unwrap(), BOX).unwrap();
        let from_gz = histogram_file(&PointTrack::new(gz.path()).unwrap(), BOX).unwrap();
        assert_eq!(from_plain, from_gz);
    }
}
