#![allow(dead_code)]
//! Loaders for the three line-oriented unit tables.
//!
//! All three tables share one shape: two header lines, then counted blocks
//! of comma-separated integer rows with an optional trailing name field.
//! Structure is strict (a missing header, count or track-header line is an
//! error) while row content is forgiving: absent rows take defaults, absent
//! or garbled fields parse to 0.

use thiserror::Error;

use crate::data::{
    Animation, CutRect, CutTable, Keyframe, ModelConfig, Modification, PartDescriptor, Skeleton,
    Track, UnitScales,
};

/// Errors surfaced while loading unit tables or packs.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The stream ran out before the table's declared structure was read.
    #[error("input ended unexpectedly at line {line}")]
    UnexpectedEnd { line: usize },
    /// The unit pack wrapper was not valid JSON.
    #[error("invalid unit pack: {0}")]
    Pack(#[from] serde_json::Error),
    /// The unit pack has no entry for the requested form.
    #[error("unit pack has no form {0:?}")]
    MissingForm(String),
}

/// Source of table lines. Implementations hand out one line at a time and
/// report how far they have read for error messages.
pub trait LineStream {
    /// Next line, or `None` once the stream is exhausted.
    fn try_read_line(&mut self) -> Option<&str>;

    /// Number of lines handed out so far.
    fn line_number(&self) -> usize;

    /// Next line, or `UnexpectedEnd` once the stream is exhausted.
    fn read_line(&mut self) -> Result<&str, ParseError> {
        let line = self.line_number() + 1;
        self.try_read_line()
            .ok_or(ParseError::UnexpectedEnd { line })
    }

    /// Discard one line.
    fn skip_line(&mut self) -> Result<(), ParseError> {
        self.read_line().map(|_| ())
    }
}

/// Line stream over an in-memory table. Carriage returns are stripped up
/// front so DOS and Unix encodings read the same.
pub struct StrLineStream {
    text: String,
    pos: usize,
    line: usize,
}

impl StrLineStream {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.replace('\r', ""),
            pos: 0,
            line: 0,
        }
    }
}

impl LineStream for StrLineStream {
    fn try_read_line(&mut self) -> Option<&str> {
        if self.pos >= self.text.len() {
            return None;
        }
        self.line += 1;
        let rest = &self.text[self.pos..];
        match rest.find('\n') {
            Some(i) => {
                self.pos += i + 1;
                Some(&rest[..i])
            }
            None => {
                self.pos = self.text.len();
                Some(rest)
            }
        }
    }

    fn line_number(&self) -> usize {
        self.line
    }
}

/// Parse a table field as an integer: the longest leading `[+-]?digits`
/// prefix of the trimmed field, with anything unusable (including overflow)
/// reading as 0.
pub fn read_int(field: Option<&str>) -> i32 {
    let Some(s) = field else { return 0 };
    let s = s.trim();
    let end = s
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+')))
        .last()
        .map_or(0, |(i, _)| i + 1);
    s[..end].parse().unwrap_or(0)
}

/// Read a structural count line. The line must exist; its value is parsed
/// permissively like any other field.
fn read_count(stream: &mut impl LineStream) -> Result<i32, ParseError> {
    let line = stream.read_line()?;
    Ok(read_int(Some(line)))
}

/// Pre-allocation hint from an untrusted count field.
#[inline]
fn cap_hint(n: i32) -> usize {
    n.clamp(0, 1024) as usize
}

impl CutTable {
    /// Load a cut table: two headers, the sheet name, a count, then one
    /// `x,y,w,h[,name]` row per cut. Missing or blank rows read as a 1x1
    /// cut at the origin.
    pub fn load(stream: &mut impl LineStream) -> Result<CutTable, ParseError> {
        stream.skip_line()?;
        stream.skip_line()?;
        let sheet = stream.try_read_line().unwrap_or("").trim().to_owned();
        let n = read_count(stream)?;
        let mut cuts = Vec::with_capacity(cap_hint(n));
        for _ in 0..n.max(0) {
            let line = stream.try_read_line().unwrap_or("").trim();
            let line = if line.is_empty() { "0,0,1,1" } else { line };
            let fields: Vec<&str> = line.split(',').collect();
            let mut cut = CutRect::new(
                read_int(fields.first().copied()),
                read_int(fields.get(1).copied()),
                read_int(fields.get(2).copied()),
                read_int(fields.get(3).copied()),
            );
            if fields.len() == 5 {
                cut.name = fields[4].trim().to_owned();
            }
            cuts.push(cut);
        }
        Ok(CutTable { sheet, cuts })
    }

    pub fn parse(text: &str) -> Result<CutTable, ParseError> {
        Self::load(&mut StrLineStream::new(text))
    }
}

impl Skeleton {
    /// Load a model table: two headers, a part count, the part rows, the
    /// measurement-unit triple, then counted config rows.
    pub fn load(stream: &mut impl LineStream) -> Result<Skeleton, ParseError> {
        stream.skip_line()?;
        stream.skip_line()?;
        let n = read_count(stream)?;
        let mut parts = Vec::with_capacity(cap_hint(n));
        for _ in 0..n.max(0) {
            let line = stream.try_read_line().unwrap_or("").trim();
            let fields: Vec<&str> = line.split(',').collect();
            let mut row = [0i32; 13];
            for (slot, field) in row.iter_mut().zip(fields.iter().copied()) {
                *slot = read_int(Some(field));
            }
            let name = if fields.len() == 14 {
                fields[13].trim().to_owned()
            } else {
                String::new()
            };
            parts.push(PartDescriptor::from_row(row, name));
        }
        let line = stream.try_read_line().unwrap_or("").trim();
        let fields: Vec<&str> = line.split(',').collect();
        let units = UnitScales {
            scale: read_int(fields.first().copied()),
            angle: read_int(fields.get(1).copied()),
            alpha: read_int(fields.get(2).copied()),
        };
        let m = read_count(stream)?;
        let mut configs = Vec::with_capacity(cap_hint(m));
        for _ in 0..m.max(0) {
            let line = stream.try_read_line().unwrap_or("").trim();
            let fields: Vec<&str> = line.split(',').collect();
            let mut values = [0i32; 6];
            for (slot, field) in values.iter_mut().zip(fields.iter().copied()) {
                *slot = read_int(Some(field));
            }
            let name = if fields.len() == 7 {
                fields[6].trim().to_owned()
            } else {
                String::new()
            };
            configs.push(ModelConfig { values, name });
        }
        Ok(Skeleton {
            units,
            parts,
            configs,
        })
    }

    pub fn parse(text: &str) -> Result<Skeleton, ParseError> {
        Self::load(&mut StrLineStream::new(text))
    }
}

impl Animation {
    /// Load a keyframe table: two headers, a track count, then per track a
    /// header line (`part,attribute,loop,_,_[,name]`) followed by counted
    /// keyframe rows (`frame,value,curve,power`).
    pub fn load(stream: &mut impl LineStream) -> Result<Animation, ParseError> {
        Self::load_impl(stream, false)
    }

    /// Like [`Animation::load`] for first-generation tables, which stored
    /// the scale multiplier under the plain scale id.
    pub fn load_legacy(stream: &mut impl LineStream) -> Result<Animation, ParseError> {
        Self::load_impl(stream, true)
    }

    fn load_impl(stream: &mut impl LineStream, legacy: bool) -> Result<Animation, ParseError> {
        stream.skip_line()?;
        stream.skip_line()?;
        let n = read_count(stream)?;
        let mut tracks = Vec::with_capacity(cap_hint(n));
        for _ in 0..n.max(0) {
            let header = stream.read_line()?.trim();
            let fields: Vec<&str> = header.split(',').collect();
            let part = read_int(fields.first().copied());
            let mut wire = read_int(fields.get(1).copied());
            if legacy && wire == Modification::Scale.wire() {
                wire = Modification::ScaleMult.wire();
            }
            let modification = Modification::from_wire(wire);
            let loop_count = read_int(fields.get(2).copied());
            let name = if fields.len() == 6 {
                fields[5].to_owned()
            } else {
                String::new()
            };
            let m = read_count(stream)?;
            let mut frames = Vec::with_capacity(cap_hint(m));
            for _ in 0..m.max(0) {
                let line = stream.try_read_line().unwrap_or("").trim();
                let fields: Vec<&str> = line.split(',').collect();
                let row = [
                    read_int(fields.first().copied()),
                    read_int(fields.get(1).copied()),
                    read_int(fields.get(2).copied()),
                    read_int(fields.get(3).copied()),
                ];
                frames.push(Keyframe::from_row(row, modification));
            }
            tracks.push(Track::new(part, modification, loop_count, name, frames));
        }
        Ok(Animation::new(tracks))
    }

    pub fn parse(text: &str) -> Result<Animation, ParseError> {
        Self::load(&mut StrLineStream::new(text))
    }

    pub fn parse_legacy(text: &str) -> Result<Animation, ParseError> {
        Self::load_legacy(&mut StrLineStream::new(text))
    }
}
