//! Plain-text curve files.
//!
//! Each curve is a `# <name>` header, optional `## xlabel <text>` and
//! `## ylabel <text>` annotations, then one whitespace-separated `x y` pair
//! per line:
//!
//! ```text
//! # ramp
//! ## xlabel time
//! 0 0
//! 1 2
//! 2 4
//! ```
//!
//! Values are written with the shortest representation that parses back to
//! the same `f64`, so a save/load round trip is exact. Blank lines are
//! ignored and unknown `##` annotations are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::curve::{Curve, CurveMeta};
use crate::error::{CurveError, CurveResult};

/// Writes curves in the text format.
///
/// # Errors
///
/// Returns [`CurveError::InvalidParameter`] if a name or axis label contains
/// a line break, since it could not be read back.
pub fn write_curves<W: Write>(mut writer: W, curves: &[Curve]) -> CurveResult<()> {
    for (i, curve) in curves.iter().enumerate() {
        check_single_line("curve name", curve.name())?;
        for label in [&curve.meta().xlabel, &curve.meta().ylabel].into_iter().flatten() {
            check_single_line("axis label", label)?;
        }
        if i > 0 {
            writeln!(writer)?;
        }
        writeln!(writer, "# {}", curve.name())?;
        if let Some(label) = &curve.meta().xlabel {
            writeln!(writer, "## xlabel {label}")?;
        }
        if let Some(label) = &curve.meta().ylabel {
            writeln!(writer, "## ylabel {label}")?;
        }
        for (x, y) in curve.points() {
            writeln!(writer, "{x} {y}")?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Reads every curve from text in the format written by [`write_curves`].
///
/// # Errors
///
/// Returns [`CurveError::Parse`] with the 1-based line number for data or
/// annotations before the first header and for malformed pairs.
pub fn read_curves<R: BufRead>(reader: R) -> CurveResult<Vec<Curve>> {
    let mut curves = Vec::new();
    let mut current: Option<Pending> = None;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let text = line.trim_start();

        if let Some(annotation) = text.strip_prefix("##") {
            let pending = current
                .as_mut()
                .ok_or_else(|| CurveError::parse(number, "annotation before any curve header"))?;
            pending.annotate(annotation.trim());
        } else if let Some(name) = text.strip_prefix('#') {
            if let Some(done) = current.take() {
                curves.push(done.finish()?);
            }
            // Only the separator space goes; the name keeps its own padding
            current = Some(Pending::new(name.strip_prefix(' ').unwrap_or(name)));
        } else {
            let pending = current
                .as_mut()
                .ok_or_else(|| CurveError::parse(number, "data before any curve header"))?;
            let (x, y) = parse_pair(text).map_err(|reason| CurveError::parse(number, reason))?;
            pending.x.push(x);
            pending.y.push(y);
        }
    }
    if let Some(done) = current {
        curves.push(done.finish()?);
    }

    debug!(curves = curves.len(), "read curve text");
    Ok(curves)
}

/// Writes curves to a file, replacing it.
pub fn save(path: impl AsRef<Path>, curves: &[Curve]) -> CurveResult<()> {
    let file = File::create(path.as_ref())?;
    write_curves(BufWriter::new(file), curves)?;
    debug!(path = %path.as_ref().display(), curves = curves.len(), "saved curves");
    Ok(())
}

/// Reads every curve in a file. Each curve records the path as its source.
pub fn load(path: impl AsRef<Path>) -> CurveResult<Vec<Curve>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let source = path.display().to_string();
    Ok(read_curves(BufReader::new(file))?
        .into_iter()
        .map(|c| c.with_source(source.clone()))
        .collect())
}

/// A curve whose samples are still being read.
struct Pending {
    name: String,
    meta: CurveMeta,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Pending {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            meta: CurveMeta::default(),
            x: Vec::new(),
            y: Vec::new(),
        }
    }

    fn annotate(&mut self, annotation: &str) {
        let (key, value) = annotation
            .split_once(char::is_whitespace)
            .unwrap_or((annotation, ""));
        let value = value.trim().to_string();
        match key {
            "xlabel" => self.meta.xlabel = Some(value),
            "ylabel" => self.meta.ylabel = Some(value),
            _ => {}
        }
    }

    fn finish(self) -> CurveResult<Curve> {
        Ok(Curve::new(self.name, self.x, self.y)?.with_meta(self.meta))
    }
}

fn check_single_line(what: &str, text: &str) -> CurveResult<()> {
    if text.contains(['\n', '\r']) {
        return Err(CurveError::invalid_parameter(format!(
            "{what} {text:?} contains a line break"
        )));
    }
    Ok(())
}

fn parse_pair(text: &str) -> Result<(f64, f64), String> {
    let mut fields = text.split_whitespace();
    let (Some(x), Some(y), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(format!("expected two values, got '{text}'"));
    };
    let number = |s: &str| s.parse::<f64>().map_err(|e| format!("invalid number '{s}': {e}"));
    Ok((number(x)?, number(y)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> CurveResult<Vec<Curve>> {
        read_curves(text.as_bytes())
    }

    #[test]
    fn test_write_format() {
        let c = Curve::new("ramp", vec![0.0, 1.5], vec![0.0, -2.0])
            .unwrap()
            .with_labels("t", "volts");
        let mut buf = Vec::new();
        write_curves(&mut buf, &[c]).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "# ramp\n## xlabel t\n## ylabel volts\n0 0\n1.5 -2\n"
        );
    }

    #[test]
    fn test_read_multiple_curves() {
        let curves = read("# a\n0 1\n1 2\n\n# b c\n## ylabel counts\n5 6\n").unwrap();
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].name(), "a");
        assert_eq!(curves[0].x(), &[0.0, 1.0]);
        assert_eq!(curves[1].name(), "b c");
        assert_eq!(curves[1].meta().ylabel.as_deref(), Some("counts"));
        assert_eq!(curves[1].meta().xlabel, None);
    }

    #[test]
    fn test_round_trip_is_exact() {
        let c = Curve::new("odd", vec![0.1, 1.0 / 3.0, 1e-300], vec![f64::MAX, -0.0, 2.5e10]).unwrap();
        let mut buf = Vec::new();
        write_curves(&mut buf, std::slice::from_ref(&c)).unwrap();
        let back = read_curves(buf.as_slice()).unwrap();
        assert_eq!(back, vec![c]);
    }

    #[test]
    fn test_name_padding_survives_round_trip() {
        let c = Curve::new("  padded ", vec![0.0], vec![1.0]).unwrap();
        let mut buf = Vec::new();
        write_curves(&mut buf, std::slice::from_ref(&c)).unwrap();
        let back = read_curves(buf.as_slice()).unwrap();
        assert_eq!(back[0].name(), "  padded ");
        assert_eq!(read("#tight\n").unwrap()[0].name(), "tight");
    }

    #[test]
    fn test_line_breaks_are_rejected_on_write() {
        for name in ["line\nbreak", "carriage\rreturn"] {
            let c = Curve::new(name, vec![0.0], vec![1.0]).unwrap();
            let mut buf = Vec::new();
            assert!(matches!(
                write_curves(&mut buf, &[c]),
                Err(CurveError::InvalidParameter { .. })
            ));
            assert!(buf.is_empty());
        }

        let c = Curve::new("ok", vec![0.0], vec![1.0])
            .unwrap()
            .with_labels("t", "two\nlines");
        assert!(write_curves(Vec::new(), &[c]).is_err());
    }

    #[test]
    fn test_empty_input_and_empty_curve() {
        assert!(read("").unwrap().is_empty());
        let curves = read("# nothing\n").unwrap();
        assert!(curves[0].is_empty());
    }

    #[test]
    fn test_parse_errors_report_line() {
        assert_eq!(
            read("0 1\n").unwrap_err(),
            CurveError::parse(1, "data before any curve header")
        );
        assert!(matches!(read("# a\n0 1\n0 x\n"), Err(CurveError::Parse { line: 3, .. })));
        assert!(matches!(read("# a\n\n1 2 3\n"), Err(CurveError::Parse { line: 3, .. })));
        assert!(matches!(read("## xlabel t\n"), Err(CurveError::Parse { line: 1, .. })));
    }
}
