use serde::Deserialize;
use serde_json::Value;

use crate::error::MalformedRecord;

/// Separators and closers that may trail a row of the exported tweet array
const TRAILING_NOISE: [char; 3] = [',', ']', '}'];

/// One geotagged tweet, ready to be scored and classified
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Lowercased tweet text
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Deserialize)]
struct Row {
    value: Tweet,
}

#[derive(Deserialize)]
struct Tweet {
    properties: Properties,
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Properties {
    text: String,
}

#[derive(Deserialize)]
struct Geometry {
    coordinates: Vec<f64>,
}

impl Record {
    pub fn new(text: &str, x: f64, y: f64) -> Self {
        Self {
            text: text.to_lowercase(),
            x,
            y,
        }
    }

    /// Build a record from a decoded row, reading `value.properties.text`
    /// and `value.geometry.coordinates`
    pub fn from_value(value: &Value) -> Result<Self, MalformedRecord> {
        let row = Row::deserialize(value).map_err(MalformedRecord::Field)?;
        match row.value.geometry.coordinates[..] {
            [x, y, ..] => Ok(Self::new(&row.value.properties.text, x, y)),
            ref other => Err(MalformedRecord::Coordinates(other.len())),
        }
    }

    /// Sanitize and construct in one step
    pub fn parse(line: &str) -> Result<Self, MalformedRecord> {
        Self::from_value(&sanitize(line)?)
    }
}

/// Turn one raw line of the tweet dump into a JSON value.
///
/// Rows are exported as elements of one big array, so a line usually carries a trailing
/// `,` and the last row is followed by the array and document closers. The noise is
/// stripped and the still-open brackets are closed again.
pub fn sanitize(line: &str) -> Result<Value, MalformedRecord> {
    let repaired = repair(line)?;
    serde_json::from_str(&repaired).map_err(MalformedRecord::Decode)
}

fn repair(line: &str) -> Result<String, MalformedRecord> {
    let body = line.trim().trim_end_matches(TRAILING_NOISE);

    let mut closers = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for c in body.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => closers.push('}'),
            '[' => closers.push(']'),
            '}' | ']' => {
                if closers.pop() != Some(c) {
                    return Err(MalformedRecord::Unrepairable);
                }
            }
            _ => {}
        }
    }

    // A truncated string cannot be closed meaningfully, and a body with nothing open was
    // never a row in the first place
    if in_string || closers.is_empty() {
        return Err(MalformedRecord::Unrepairable);
    }

    let mut repaired = String::with_capacity(body.len() + closers.len());
    repaired.push_str(body);
    repaired.extend(closers.iter().rev());
    Ok(repaired)
}
