use crate::common::Record;
use crate::errors::{CollectorError, CollectorResult, ErrorKind};
use std::str::Lines;

/// What a write sends to the store: a single record or a batch of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    One(Record),
    Many(Vec<Record>),
}

impl Payload {
    /// Returns the records carried by this payload, in order.
    pub fn records(&self) -> Vec<&Record> {
        match self {
            Payload::One(record) => vec![record],
            Payload::Many(records) => records.iter().collect(),
        }
    }
}

impl From<Record> for Payload {
    fn from(record: Record) -> Self {
        Payload::One(record)
    }
}

impl From<Vec<Record>> for Payload {
    fn from(records: Vec<Record>) -> Self {
        Payload::Many(records)
    }
}

/// Codec for the store's newline-delimited JSON protocol.
///
/// Every record travels as one JSON object on its own line. Lists are
/// flattened to one line per element.
pub struct JsonLinesCodec;

impl JsonLinesCodec {
    /// Serializes one record to a single JSON line (no trailing newline).
    pub fn serialize_record(record: &Record) -> CollectorResult<String> {
        serde_json::to_string(record).map_err(|err| {
            log::error!("Failed to serialize record {:?}: {}", record, err);
            CollectorError::new(
                &format!("Failed to serialize record: {}", err),
                ErrorKind::EncodingError,
            )
        })
    }

    /// Serializes a list of records, one line per record.
    pub fn serialize_records(records: &[Record]) -> CollectorResult<String> {
        let mut lines = Vec::with_capacity(records.len());
        for record in records {
            lines.push(Self::serialize_record(record)?);
        }
        Ok(lines.join("\n"))
    }

    /// Serializes a write payload.
    pub fn serialize(payload: &Payload) -> CollectorResult<String> {
        match payload {
            Payload::One(record) => Self::serialize_record(record),
            Payload::Many(records) => Self::serialize_records(records),
        }
    }

    /// Parses response text lazily, one record per non-blank line.
    pub fn parse(text: &str) -> JsonLines<'_> {
        JsonLines {
            lines: text.lines(),
            line_number: 0,
        }
    }
}

/// Lazy iterator over the records of a JSON-lines text.
///
/// Nothing is decoded until `next` is called; each call decodes exactly one
/// line. A malformed line yields an `EncodingError` and iteration continues
/// with the following line.
pub struct JsonLines<'a> {
    lines: Lines<'a>,
    line_number: usize,
}

impl Iterator for JsonLines<'_> {
    type Item = CollectorResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }

            let result = serde_json::from_str::<Record>(line).map_err(|err| {
                log::error!("Malformed record at line {}: {}", self.line_number, err);
                CollectorError::new(
                    &format!("Malformed record at line {}: {}", self.line_number, err),
                    ErrorKind::EncodingError,
                )
            });
            return Some(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Value;
    use crate::record;

    #[test]
    fn test_serialize_single_record() {
        let record = record! { "_key": "foo", "value": "foo_value" };
        let text = JsonLinesCodec::serialize_record(&record).unwrap();
        assert_eq!(text, r#"{"_key":"foo","value":"foo_value"}"#);
    }

    #[test]
    fn test_serialize_list_flattens_to_lines() {
        let records = vec![record! { "_key": "a" }, record! { "_key": "b" }];
        let text = JsonLinesCodec::serialize(&Payload::from(records)).unwrap();
        assert_eq!(text, "{\"_key\":\"a\"}\n{\"_key\":\"b\"}");
    }

    #[test]
    fn test_parse_is_one_record_per_line() {
        let text = "{\"_key\":\"a\",\"n\":1}\n{\"_key\":\"b\",\"n\":2}\n";
        let records: Vec<Record> = JsonLinesCodec::parse(text)
            .collect::<CollectorResult<Vec<_>>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("_key"), Some(&Value::from("a")));
        assert_eq!(records[1].get("n"), Some(&Value::I64(2)));
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let text = "\n{\"_key\":\"a\"}\n\n   \n{\"_key\":\"b\"}";
        assert_eq!(JsonLinesCodec::parse(text).count(), 2);
    }

    #[test]
    fn test_parse_empty_text() {
        assert_eq!(JsonLinesCodec::parse("").count(), 0);
    }

    #[test]
    fn test_parse_reports_malformed_line() {
        let text = "{\"_key\":\"a\"}\nnot json\n{\"_key\":\"c\"}";
        let results: Vec<CollectorResult<Record>> = JsonLinesCodec::parse(text).collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::EncodingError);
        assert!(err.message().contains("line 2"));
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_parse_is_lazy() {
        let text = "{\"_key\":\"a\"}\nnot json";
        let mut lines = JsonLinesCodec::parse(text);
        assert!(lines.next().unwrap().is_ok());
    }

    #[test]
    fn test_round_trip() {
        let records = vec![
            record! { "_key": "foo", "value": 1.5, "tags": vec!["x", "y"] },
            record! { "_key": "bar", "value": Value::Null },
        ];
        let text = JsonLinesCodec::serialize_records(&records).unwrap();
        let parsed: Vec<Record> = JsonLinesCodec::parse(&text)
            .collect::<CollectorResult<Vec<_>>>()
            .unwrap();
        assert_eq!(parsed, records);
    }
}
