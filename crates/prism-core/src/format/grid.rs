//! `.cube` text grid codec.
//!
//! Line-oriented, keywords in any order, sample rows in flat
//! `idx(r, g, b)` order:
//! ```text
//! TITLE "Film look"
//! # free-form comment, kept verbatim
//! LUT_3D_SIZE 2
//! DOMAIN_MIN 0 0 0
//! DOMAIN_MAX 1 1 1
//!
//! 0.000000 0.000000 0.000000
//! 1.000000 0.000000 0.000000
//! ...
//! ```
//! `DOMAIN_MIN`/`DOMAIN_MAX` default to 0 and 1. Any other non-blank line
//! that is not exactly three numbers is rejected.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{LutError, Result};
use crate::lut::lattice::{Lattice, Sample};

/// Parse a grid LUT from a buffered reader.
pub fn parse<R: BufRead>(reader: R) -> Result<Lattice> {
    let mut title = None;
    let mut comments = Vec::new();
    let mut size = None;
    let mut domain_min = Sample::ZERO;
    let mut domain_max = Sample::ONE;
    let mut samples = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields[0] {
            "TITLE" => title = Some(parse_title(line)),
            "LUT_3D_SIZE" => {
                let &[value] = &fields[1..] else {
                    return Err(malformed(line_no, line));
                };
                size = Some(value.parse::<usize>().map_err(|_| malformed(line_no, value))?);
            }
            "DOMAIN_MIN" => domain_min = parse_triple(&fields[1..], line_no)?,
            "DOMAIN_MAX" => domain_max = parse_triple(&fields[1..], line_no)?,
            _ if line.starts_with('#') => comments.push(line.to_string()),
            _ if fields.len() == 3 => samples.push(parse_triple(&fields, line_no)?),
            _ => {
                return Err(LutError::UnrecognizedLine {
                    line: line_no,
                    content: line.to_string(),
                });
            }
        }
    }

    let level = size.ok_or(LutError::MissingSize)?;
    if samples.is_empty() {
        return Err(LutError::EmptyInput("grid file has no sample rows"));
    }

    let mut lattice = Lattice::new(level, domain_min, domain_max, samples)?;
    lattice.title = title;
    lattice.comments = comments;
    tracing::debug!(level, title = ?lattice.title, "parsed grid LUT");
    Ok(lattice)
}

/// Parse a grid LUT held in memory.
pub fn parse_str(text: &str) -> Result<Lattice> {
    parse(text.as_bytes())
}

/// Load a grid LUT from a `.cube` file.
pub fn load_file(path: &Path) -> Result<Lattice> {
    let file = File::open(path)?;
    parse(BufReader::new(file))
}

/// Serialize a lattice in grid format.
pub fn write<W: Write>(lattice: &Lattice, writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    write!(writer, "{lattice}")?;
    writer.flush()?;
    Ok(())
}

/// Save a lattice to a `.cube` file.
pub fn save(lattice: &Lattice, path: &Path) -> Result<()> {
    write(lattice, File::create(path)?)
}

/// Renders the grid text format.
impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, "TITLE \"{title}\"")?;
        }
        for comment in &self.comments {
            writeln!(f, "{comment}")?;
        }
        writeln!(f, "LUT_3D_SIZE {}", self.level())?;
        writeln!(f, "DOMAIN_MIN {}", SampleRow(self.domain_min()))?;
        writeln!(f, "DOMAIN_MAX {}", SampleRow(self.domain_max()))?;
        writeln!(f)?;
        for &s in self.samples() {
            writeln!(f, "{}", SampleRow(s))?;
        }
        Ok(())
    }
}

/// Three space-separated decimals.
struct SampleRow(Sample);

impl fmt::Display for SampleRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} {:.6} {:.6}", self.0.x, self.0.y, self.0.z)
    }
}

/// Text between the first and last double quote, or the bare remainder
/// when the title is unquoted.
fn parse_title(line: &str) -> String {
    let rest = line["TITLE".len()..].trim();
    match (rest.find('"'), rest.rfind('"')) {
        (Some(start), Some(end)) if end > start => rest[start + 1..end].to_string(),
        _ => rest.trim_matches('"').to_string(),
    }
}

fn parse_triple(fields: &[&str], line_no: usize) -> Result<Sample> {
    let &[r, g, b] = fields else {
        return Err(malformed(line_no, &fields.join(" ")));
    };
    let channel = |s: &str| s.parse::<f32>().map_err(|_| malformed(line_no, s));
    Ok(Sample::new(channel(r)?, channel(g)?, channel(b)?))
}

fn malformed(line: usize, field: &str) -> LutError {
    LutError::MalformedField {
        line,
        field: field.to_string(),
    }
}
