//! Tool-path text parser.
//!
//! One logical record per line: `T;x0,y0,x1,y1,...`. Built over
//! `BufRead::lines`, which already tolerates lines longer than its internal
//! buffer by growing as needed, so concatenating input chunks until a
//! newline is a property of the chosen I/O primitive rather than something
//! to hand-roll.

use std::io::BufRead;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("line {line}: tool number {text:?} is not an integer")]
    BadToolNumber { line: usize, text: String },

    #[error("line {line}: coordinate {text:?} is not a number")]
    BadNumber { line: usize, text: String },

    #[error("line {line}: odd coordinate count ({count}); points must come in x,y pairs")]
    OddCoordinateCount { line: usize, count: usize },

    #[error("line {line}: fewer than two control points ({count} coordinates)")]
    TooFewPoints { line: usize, count: usize },

    #[error("line {line}: missing ';' separator between tool number and coordinates")]
    MissingSeparator { line: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolPathRecord {
    pub tool: i32,
    pub points: Vec<(f64, f64)>,
}

/// Parses every non-blank line of `reader` into a [`ToolPathRecord`].
///
/// Blank lines (including a trailing empty line at end-of-file) are
/// skipped rather than rejected.
pub fn parse_tool_paths<R: BufRead>(reader: R) -> Result<Vec<ToolPathRecord>, ParseError> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|_| ParseError::MissingSeparator { line: line_no })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        records.push(parse_line(trimmed, line_no)?);
    }
    Ok(records)
}

fn parse_line(line: &str, line_no: usize) -> Result<ToolPathRecord, ParseError> {
    let (tool_text, coords_text) = line
        .split_once(';')
        .ok_or(ParseError::MissingSeparator { line: line_no })?;

    let tool: i32 = tool_text
        .trim()
        .parse()
        .map_err(|_| ParseError::BadToolNumber {
            line: line_no,
            text: tool_text.to_string(),
        })?;

    let mut coords = Vec::new();
    for token in coords_text.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let value: f64 = token.parse().map_err(|_| ParseError::BadNumber {
            line: line_no,
            text: token.to_string(),
        })?;
        coords.push(value);
    }

    if coords.len() % 2 != 0 {
        return Err(ParseError::OddCoordinateCount {
            line: line_no,
            count: coords.len(),
        });
    }
    if coords.len() < 4 {
        return Err(ParseError::TooFewPoints {
            line: line_no,
            count: coords.len(),
        });
    }

    let points = coords.chunks_exact(2).map(|c| (c[0], c[1])).collect();
    Ok(ToolPathRecord { tool, points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_single_line() {
        let input = "1;0,0,72,0\n";
        let records = parse_tool_paths(Cursor::new(input)).unwrap();
        assert_eq!(
            records,
            vec![ToolPathRecord {
                tool: 1,
                points: vec![(0.0, 0.0), (72.0, 0.0)],
            }]
        );
    }

    #[test]
    fn parses_two_disjoint_paths() {
        let input = "1;0,0,72,0\n2;144,72,216,72\n";
        let records = parse_tool_paths(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].tool, 2);
    }

    #[test]
    fn rejects_odd_coordinate_count() {
        let input = "1;0,0,72\n";
        let err = parse_tool_paths(Cursor::new(input)).unwrap_err();
        assert_eq!(
            err,
            ParseError::OddCoordinateCount { line: 1, count: 3 }
        );
    }

    #[test]
    fn rejects_unparsable_number() {
        let input = "1;0,0,abc,0\n";
        let err = parse_tool_paths(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, ParseError::BadNumber { line: 1, .. }));
    }

    #[test]
    fn skips_trailing_blank_line() {
        let input = "1;0,0,72,0\n\n";
        let records = parse_tool_paths(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn whitespace_is_not_significant() {
        let input = "1 ; 0 , 0 , 72 , 0 \n";
        let records = parse_tool_paths(Cursor::new(input)).unwrap();
        assert_eq!(records[0].points, vec![(0.0, 0.0), (72.0, 0.0)]);
    }
}
