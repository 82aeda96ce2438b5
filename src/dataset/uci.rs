//! UCI Air Quality CSV reader
//!
//! The export uses `;` as field separator and `,` as decimal separator, marks
//! missing readings with `-200` and ends every line with empty columns.

use std::io::BufRead;

use super::DatasetError;
use crate::compare::SampleRecord;

/// Marker for a missing reading
const MISSING: f64 = -200.0;

/// Source column for each dataset column, in dataset order
const SOURCE_COLUMNS: [(&str, &str); 5] = [
    ("CO(GT)", "CO"),
    ("NO2(GT)", "NO2"),
    ("PT08.S5(O3)", "O3_Sensor"),
    ("T", "Temperature"),
    ("RH", "Humidity"),
];

pub(super) struct Parsed {
    pub records: Vec<SampleRecord>,
    pub dropped: usize,
}

fn parse_value(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let value: f64 = raw.replace(',', ".").parse().ok()?;
    if value == MISSING || !value.is_finite() {
        None
    } else {
        Some(value)
    }
}

pub(super) fn parse<R: BufRead>(reader: R) -> Result<Parsed, DatasetError> {
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line.map_err(|source| DatasetError::Io {
            path: "<reader>".to_string(),
            source,
        })?,
        None => return Err(DatasetError::NoHeader),
    };
    let names: Vec<&str> = header
        .trim_start_matches('\u{feff}')
        .split(';')
        .map(str::trim)
        .collect();

    let mut indices = [0usize; 5];
    for (slot, (source, _)) in indices.iter_mut().zip(SOURCE_COLUMNS) {
        *slot = names
            .iter()
            .position(|name| *name == source)
            .ok_or_else(|| DatasetError::MissingColumn {
                column: source.to_string(),
            })?;
    }

    let mut records = Vec::new();
    let mut dropped = 0;
    for line in lines {
        let line = line.map_err(|source| DatasetError::Io {
            path: "<reader>".to_string(),
            source,
        })?;
        if line.trim_matches(|c: char| c == ';' || c.is_whitespace()).is_empty() {
            continue;
        }

        let cells: Vec<&str> = line.split(';').collect();
        let value = |i: usize| cells.get(indices[i]).and_then(|raw| parse_value(raw));
        let record = SampleRecord {
            co: value(0),
            no2: value(1),
            o3: value(2),
            temperature: value(3),
            humidity: value(4),
        };

        if record.fields().iter().all(|(_, v)| v.is_some()) {
            records.push(record);
        } else {
            dropped += 1;
        }
    }

    Ok(Parsed { records, dropped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, DatasetSource};

    const SAMPLE: &str = "\
Date;Time;CO(GT);PT08.S1(CO);NMHC(GT);C6H6(GT);PT08.S2(NMHC);NOx(GT);PT08.S3(NOx);NO2(GT);PT08.S4(NO2);PT08.S5(O3);T;RH;AH;;
10/03/2004;18.00.00;2,6;1360;150;11,9;1046;166;1056;113;1692;1268;13,6;48,9;0,7578;;
10/03/2004;19.00.00;2;1292;112;9,4;955;103;1174;92;1559;972;13,3;47,7;0,7255;;
10/03/2004;20.00.00;-200;1402;88;9,0;939;131;1140;114;1555;1074;11,9;54,0;0,7502;;
10/03/2004;21.00.00;2,2;1376;80;9,2;948;172;1092;122;1584;1203;11,0;60,0;0,7867;;
;;;;;;;;;;;;;;;;
";

    #[test]
    fn test_parse_uci_export() {
        let data = Dataset::from_uci_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(
            data.source(),
            &DatasetSource::UciCsv {
                path: None,
                dropped_rows: 1
            }
        );

        let first = data.records()[0];
        assert_eq!(first.co, Some(2.6));
        assert_eq!(first.no2, Some(113.0));
        assert_eq!(first.o3, Some(1268.0));
        assert_eq!(first.temperature, Some(13.6));
        assert_eq!(first.humidity, Some(48.9));
    }

    #[test]
    fn test_missing_marker_and_garbage() {
        assert_eq!(parse_value("-200"), None);
        assert_eq!(parse_value("-200,0"), None);
        assert_eq!(parse_value(" 0,5 "), Some(0.5));
        assert_eq!(parse_value("n/a"), None);
        assert_eq!(parse_value(""), None);
    }

    #[test]
    fn test_missing_column() {
        let csv = "Date;Time;CO(GT);NO2(GT);PT08.S5(O3);T\n1;2;3;4;5;6\n";
        match Dataset::from_uci_csv(csv.as_bytes()) {
            Err(DatasetError::MissingColumn { column }) => assert_eq!(column, "RH"),
            other => panic!("expected missing column, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            Dataset::from_uci_csv("".as_bytes()),
            Err(DatasetError::NoHeader)
        ));
    }
}
