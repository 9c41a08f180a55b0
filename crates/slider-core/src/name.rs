//! Stable slider identifiers and their line-oriented record form.
//!
//! A slider is addressed externally by two opaque `object:filename` specs
//! (whatever the driver needs to recompute the diff), the change prefix,
//! and the canonical line number. The textual record form is
//! `<old_spec> <new_spec> <prefix> <line_number>`, optionally followed by
//! whitespace-separated shifts.

use std::io::{BufRead, Write};
use std::sync::OnceLock;

use regex::Regex;

use crate::{ChangeKind, ParseError};

fn comment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(#.*)?$").unwrap())
}

/// The stable external identifier of a slider.
///
/// The `old` and `new` specs are opaque here; the driver gives them meaning
/// (typically a content-addressed blob plus a path, `<sha1>:<path>`). The
/// line number is canonical: the placement after the maximal shift.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SliderName {
    pub old: String,
    pub new: String,
    pub prefix: ChangeKind,
    pub line_number: u32,
}

impl SliderName {
    pub fn new(
        old: impl Into<String>,
        new: impl Into<String>,
        prefix: ChangeKind,
        line_number: u32,
    ) -> Self {
        assert!(
            matches!(prefix, ChangeKind::Addition | ChangeKind::Deletion),
            "a slider name identifies a single-sided change"
        );
        Self {
            old: old.into(),
            new: new.into(),
            prefix,
            line_number,
        }
    }

    /// Write this name as one record line, with any shifts appended.
    pub fn write<W: Write>(&self, writer: &mut W, shifts: &[i32]) -> std::io::Result<()> {
        write!(writer, "{self}")?;
        for shift in shifts {
            write!(writer, " {shift}")?;
        }
        writeln!(writer)
    }
}

impl std::fmt::Display for SliderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.old, self.new, self.prefix, self.line_number
        )
    }
}

/// One parsed record line: a name plus any trailing shifts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftRecord {
    pub name: SliderName,
    pub shifts: Vec<i32>,
}

fn parse_record(line: &str) -> Result<ShiftRecord, ParseError> {
    let mut words = line.split_whitespace();
    let (Some(old), Some(new), Some(prefix), Some(line_number)) =
        (words.next(), words.next(), words.next(), words.next())
    else {
        return Err(ParseError::BadRecord(line.to_string()));
    };

    let prefix = match prefix {
        "+" => ChangeKind::Addition,
        "-" => ChangeKind::Deletion,
        _ => return Err(ParseError::BadRecord(line.to_string())),
    };
    let line_number: u32 =
        line_number
            .parse()
            .map_err(|_| ParseError::BadRecordInteger {
                field: "line number",
                value: line_number.to_string(),
                record: line.to_string(),
            })?;

    let mut shifts = Vec::new();
    for word in words {
        let shift: i32 = word.parse().map_err(|_| ParseError::BadRecordInteger {
            field: "shift",
            value: word.to_string(),
            record: line.to_string(),
        })?;
        shifts.push(shift);
    }

    Ok(ShiftRecord {
        name: SliderName::new(old, new, prefix, line_number),
        shifts,
    })
}

/// Read slider records, skipping blank and `#` comment lines.
pub fn read_records<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<ShiftRecord, ParseError>> {
    reader.lines().filter_map(|line| match line {
        Err(err) => Some(Err(err.into())),
        Ok(line) => {
            if comment_regex().is_match(&line) {
                None
            } else {
                Some(parse_record(&line))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn name() -> SliderName {
        SliderName::new(
            "1234abc:src/lib.rs",
            "5678def:src/lib.rs",
            ChangeKind::Addition,
            42,
        )
    }

    #[test]
    fn display_form() {
        assert_eq!(
            name().to_string(),
            "1234abc:src/lib.rs 5678def:src/lib.rs + 42"
        );
    }

    #[test]
    fn write_then_read_round_trip() {
        let mut buf = Vec::new();
        name().write(&mut buf, &[]).unwrap();
        name().write(&mut buf, &[-3, 0, 2]).unwrap();

        let records: Vec<_> = read_records(BufReader::new(buf.as_slice()))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, name());
        assert!(records[0].shifts.is_empty());
        assert_eq!(records[1].shifts, vec![-3, 0, 2]);
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        let input = "\n# a comment\n   \t\n  # indented comment\nx:y z:w - 7\n";
        let records: Vec<_> = read_records(BufReader::new(input.as_bytes()))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.prefix, ChangeKind::Deletion);
        assert_eq!(records[0].name.line_number, 7);
    }

    #[test]
    fn short_records_are_rejected() {
        let err = read_records(BufReader::new(&b"a b +"[..]))
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, ParseError::BadRecord(_)));
    }

    #[test]
    fn non_integer_line_number_is_rejected() {
        let err = read_records(BufReader::new(&b"a b + seven"[..]))
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::BadRecordInteger { field: "line number", .. }
        ));
    }

    #[test]
    fn mixed_prefix_is_rejected() {
        let err = read_records(BufReader::new(&b"a b ? 3"[..]))
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, ParseError::BadRecord(_)));
    }

    #[test]
    fn hashing_matches_equality() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(name());
        assert!(set.contains(&name()));
        let other = SliderName::new("o", "n", ChangeKind::Deletion, 1);
        assert!(!set.contains(&other));
    }

    #[test]
    fn records_survive_a_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sliders.txt");

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "# canonical sliders").unwrap();
        name().write(&mut file, &[1]).unwrap();
        drop(file);

        let reader = BufReader::new(std::fs::File::open(&path).unwrap());
        let records: Vec<_> = read_records(reader).collect::<Result<_, _>>().unwrap();
        assert_eq!(records, vec![ShiftRecord { name: name(), shifts: vec![1] }]);
    }
}
