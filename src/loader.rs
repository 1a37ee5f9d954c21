//! Stream loader: turns `sensor_id,timestamp_us,raw_x,raw_y,raw_z` records
//! into one timestamp-ordered stream per accelerometer.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use log::{debug, info};
use serde::Serialize;

use crate::error::{DeadReckoningError, Result};
use crate::types::{RawSample, SensorId, SensorStream};

const FIELD_COUNT: usize = 5;
const FIELD_NAMES: [&str; FIELD_COUNT] = ["sensor_id", "timestamp_us", "raw_x", "raw_y", "raw_z"];

/// Counters describing what the loader saw.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub total_lines: usize,
    pub discarded_records: usize,
    pub primary_count: usize,
    pub secondary_count: usize,
}

#[derive(Clone, Debug)]
pub struct LoadedStreams {
    pub primary: SensorStream,
    pub secondary: SensorStream,
    pub report: LoadReport,
}

/// Load a recording from disk. Paths ending in `.gz` are decompressed.
pub fn load_path(path: &Path) -> Result<LoadedStreams> {
    let file = File::open(path).map_err(|e| DeadReckoningError::source_unavailable(path, e))?;
    let loaded = if path.extension().map(|e| e == "gz").unwrap_or(false) {
        load_lines(BufReader::new(GzDecoder::new(file)), path)?
    } else {
        load_lines(BufReader::new(file), path)?
    };
    info!(
        "Loaded {}: {} primary, {} secondary, {} discarded",
        path.display(),
        loaded.report.primary_count,
        loaded.report.secondary_count,
        loaded.report.discarded_records
    );
    Ok(loaded)
}

/// Load records from any buffered reader.
pub fn load_reader<R: BufRead>(reader: R) -> Result<LoadedStreams> {
    load_lines(reader, Path::new("<reader>"))
}

fn load_lines<R: BufRead>(reader: R, origin: &Path) -> Result<LoadedStreams> {
    let mut report = LoadReport::default();
    let mut primary = Vec::new();
    let mut secondary = Vec::new();

    let mut reader = reader;
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| DeadReckoningError::source_unavailable(origin, e))?;
        if read == 0 {
            break;
        }
        line_no += 1;
        report.total_lines += 1;

        let line = std::str::from_utf8(&buf).map_err(|e| {
            DeadReckoningError::parse(
                line_no,
                String::from_utf8_lossy(&buf).trim(),
                format!("record is not valid UTF-8: {}", e),
            )
        })?;
        let trimmed = line.trim();

        let (raw_id, sample) = parse_record(line_no, trimmed)?;
        match sample {
            Some(s) if s.sensor_id == SensorId::Primary => primary.push(s),
            Some(s) => secondary.push(s),
            None => {
                // Unknown sensor ids are dropped without complaint.
                debug!("line {}: discarding record from sensor {}", line_no, raw_id);
                report.discarded_records += 1;
            }
        }
    }

    report.primary_count = primary.len();
    report.secondary_count = secondary.len();

    Ok(LoadedStreams {
        primary: SensorStream::from_unsorted(SensorId::Primary, primary),
        secondary: SensorStream::from_unsorted(SensorId::Secondary, secondary),
        report,
    })
}

/// Parse one trimmed, non-empty record.
///
/// Every field is validated before the sensor id is looked at, so a malformed
/// record from an unknown sensor still fails the load. Returns the raw id and
/// the sample, or `None` for an id outside {1, 2}.
pub fn parse_record(line_no: usize, line: &str) -> Result<(i64, Option<RawSample>)> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() != FIELD_COUNT {
        return Err(DeadReckoningError::parse(
            line_no,
            line,
            format!("expected {} fields, found {}", FIELD_COUNT, parts.len()),
        ));
    }

    let mut values = [0i64; FIELD_COUNT];
    for (i, part) in parts.iter().enumerate() {
        values[i] = part.trim().parse::<i64>().map_err(|e| {
            DeadReckoningError::parse(
                line_no,
                line,
                format!("{} {:?} is not an integer: {}", FIELD_NAMES[i], part.trim(), e),
            )
        })?;
    }

    let [raw_id, timestamp, raw_x, raw_y, raw_z] = values;
    let timestamp_us = u64::try_from(timestamp).map_err(|_| {
        DeadReckoningError::parse(line_no, line, format!("timestamp_us {} is negative", timestamp))
    })?;

    let sample = SensorId::from_raw(raw_id)
        .map(|id| RawSample::new(id, timestamp_us, raw_x, raw_y, raw_z));
    Ok((raw_id, sample))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load_str(text: &str) -> Result<LoadedStreams> {
        load_reader(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn test_splits_by_sensor_and_sorts() {
        let loaded = load_str(
            "1,300,1,0,0\n\
             2,250,2,0,0\n\
             1,100,3,0,0\n\
             2,50,4,0,0\n",
        )
        .unwrap();
        let t1: Vec<u64> = loaded.primary.samples().iter().map(|s| s.timestamp_us).collect();
        let t2: Vec<u64> = loaded.secondary.samples().iter().map(|s| s.timestamp_us).collect();
        assert_eq!(t1, vec![100, 300]);
        assert_eq!(t2, vec![50, 250]);
        assert_eq!(loaded.report.primary_count, 2);
        assert_eq!(loaded.report.secondary_count, 2);
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let loaded = load_str("1,10,7,0,0\n1,5,1,0,0\n1,10,8,0,0\n1,10,9,0,0\n").unwrap();
        let xs: Vec<i64> = loaded.primary.samples().iter().map(|s| s.raw_x).collect();
        assert_eq!(xs, vec![1, 7, 8, 9]);
    }

    #[test]
    fn test_unknown_sensor_is_discarded() {
        let loaded = load_str("3,10,0,0,0\n1,10,0,0,0\n0,11,0,0,0\n").unwrap();
        assert_eq!(loaded.primary.len(), 1);
        assert!(loaded.secondary.is_empty());
        assert_eq!(loaded.report.discarded_records, 2);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let loaded = load_str("  1, 1000 ,16384, 0 ,16384  \r\n").unwrap();
        let s = loaded.primary.samples()[0];
        assert_eq!(s.timestamp_us, 1000);
        assert_eq!(s.raw_x, 16384);
        assert_eq!(s.raw_z, 16384);
    }

    #[test]
    fn test_negative_readings_parse() {
        let loaded = load_str("2,5,-16384,-1,-20000\n").unwrap();
        let s = loaded.secondary.samples()[0];
        assert_eq!((s.raw_x, s.raw_y, s.raw_z), (-16384, -1, -20000));
    }

    #[test]
    fn test_wrong_field_count_fails_with_line() {
        let err = load_str("1,10,0,0,0\n1,20,0,0\n").unwrap_err();
        match err {
            DeadReckoningError::Parse { line, content, .. } => {
                assert_eq!(line, 2);
                assert_eq!(content, "1,20,0,0");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_integer_field_fails() {
        let err = load_str("1,10,0.5,0,0\n").unwrap_err();
        assert!(matches!(err, DeadReckoningError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_malformed_unknown_sensor_still_fails() {
        let err = load_str("9,x,0,0,0\n").unwrap_err();
        assert!(matches!(err, DeadReckoningError::Parse { .. }));
    }

    #[test]
    fn test_negative_timestamp_fails() {
        let err = load_str("1,-5,0,0,0\n").unwrap_err();
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn test_empty_input_yields_empty_streams() {
        let loaded = load_str("").unwrap();
        assert!(loaded.primary.is_empty());
        assert!(loaded.secondary.is_empty());
        assert_eq!(loaded.report, LoadReport::default());
    }

    #[test]
    fn test_blank_line_fails_load() {
        let err = load_str("1,10,0,0,0\n\n2,10,0,0,0\n").unwrap_err();
        match err {
            DeadReckoningError::Parse { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("expected 5 fields, found 1"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_trailing_newline_is_not_a_record() {
        let loaded = load_str("1,10,0,0,0\n2,12,0,0,0\n").unwrap();
        assert_eq!(loaded.report.total_lines, 2);
        assert_eq!(loaded.primary.len() + loaded.secondary.len(), 2);
    }

    #[test]
    fn test_invalid_utf8_is_parse_error_with_line() {
        let bytes = b"1,10,0,0,0\n2,1\xff0,0,0,0\n".to_vec();
        let err = load_reader(Cursor::new(bytes)).unwrap_err();
        match err {
            DeadReckoningError::Parse { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("UTF-8"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = load_path(Path::new("/no/such/recording.txt")).unwrap_err();
        assert!(matches!(err, DeadReckoningError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_gzip_file() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let path = std::env::temp_dir().join(format!("auv_dr_loader_{}.txt.gz", std::process::id()));
        {
            let file = File::create(&path).unwrap();
            let mut enc = GzEncoder::new(file, Compression::default());
            enc.write_all(b"1,10,1,2,3\n2,12,4,5,6\n").unwrap();
            enc.finish().unwrap();
        }
        let loaded = load_path(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.primary.len(), 1);
        assert_eq!(loaded.secondary.len(), 1);
        assert_eq!(loaded.secondary.samples()[0].raw_z, 6);
    }
}
