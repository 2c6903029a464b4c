use super::FullMatrix;
use crate::Number;
use nalgebra::convert;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, LowerExp};
use std::io;

/// Layout of the text produced by [`FullMatrix::print_formatted`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintSettings {
    /// Number of digits after the decimal point.
    pub precision: usize,
    /// Scientific notation if `true`, fixed notation otherwise.
    pub scientific: bool,
    /// Minimum width of each entry. Zero selects `precision + 7` in scientific and
    /// `precision + 2` in fixed notation.
    pub width: usize,
    /// Printed in place of entries whose magnitude does not exceed `threshold`.
    pub zero_string: String,
    /// Entries are multiplied by this factor before printing.
    pub denominator: f64,
    pub threshold: f64,
    /// Printed after every entry.
    pub separator: String,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            precision: 3,
            scientific: true,
            width: 0,
            zero_string: " ".to_string(),
            denominator: 1.0,
            threshold: 0.0,
            separator: " ".to_string(),
        }
    }
}

impl PrintSettings {
    pub fn with_precision(self, precision: usize) -> Self {
        Self { precision, ..self }
    }

    pub fn with_scientific(self, scientific: bool) -> Self {
        Self { scientific, ..self }
    }

    pub fn with_width(self, width: usize) -> Self {
        Self { width, ..self }
    }

    pub fn with_zero_string(self, zero_string: impl Into<String>) -> Self {
        Self {
            zero_string: zero_string.into(),
            ..self
        }
    }

    pub fn with_denominator(self, denominator: f64) -> Self {
        Self { denominator, ..self }
    }

    pub fn with_threshold(self, threshold: f64) -> Self {
        Self { threshold, ..self }
    }

    pub fn with_separator(self, separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            ..self
        }
    }

    fn effective_width(&self) -> usize {
        match (self.width, self.scientific) {
            (0, true) => self.precision + 7,
            (0, false) => self.precision + 2,
            (width, _) => width,
        }
    }
}

impl<T> FullMatrix<T>
where
    T: Number + Display + LowerExp,
{
    /// Formats the matrix as text, one line per row.
    pub fn print_formatted(&self, settings: &PrintSettings) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.write_entries(&mut out, settings);
        out
    }

    /// Writes the output of [`print_formatted`](Self::print_formatted) to `out`.
    pub fn write_formatted<W: io::Write>(&self, out: &mut W, settings: &PrintSettings) -> io::Result<()> {
        out.write_all(self.print_formatted(settings).as_bytes())
    }

    fn write_entries(&self, out: &mut impl fmt::Write, settings: &PrintSettings) -> fmt::Result {
        let width = settings.effective_width();
        let precision = settings.precision;
        let threshold: T::RealField = convert(settings.threshold);
        let denominator: T = convert(settings.denominator);

        for i in 0..self.nrows() {
            for &x in self.row(i) {
                if !x.is_finite() {
                    self.write_entry(out, x, width, precision, settings.scientific)?;
                } else if x.modulus() > threshold {
                    self.write_entry(out, x * denominator, width, precision, settings.scientific)?;
                } else {
                    write!(out, "{:>width$}", settings.zero_string, width = width)?;
                }
                out.write_str(&settings.separator)?;
            }
            out.write_char('\n')?;
        }
        Ok(())
    }

    fn write_entry(&self, out: &mut impl fmt::Write, x: T, width: usize, precision: usize, scientific: bool) -> fmt::Result {
        if scientific {
            write!(out, "{:>width$.precision$e}", x, width = width, precision = precision)
        } else {
            write!(out, "{:>width$.precision$}", x, width = width, precision = precision)
        }
    }
}

impl<T> Display for FullMatrix<T>
where
    T: Number + Display + LowerExp,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_entries(f, &PrintSettings::default())
    }
}
