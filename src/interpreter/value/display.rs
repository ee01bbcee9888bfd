use std::fmt::Display;

use crate::interpreter::value::{
    complex::ComplexNumber,
    core::{Array, Element},
};

/// Significant digits used when no `⎕PP` is in effect.
pub const DEFAULT_PRINT_PRECISION: usize = 10;

/// Formats a number the way the language writes it: high minus for negative
/// values, `E` for exponents, `J` between real and imaginary parts, and at
/// most `precision` significant digits.
///
/// # Example
/// ```
/// use aplite::interpreter::value::{complex::ComplexNumber, display::format_number};
///
/// assert_eq!(format_number(ComplexNumber::from(-2.5), 10), "¯2.5");
/// assert_eq!(format_number(ComplexNumber::from(1.0 / 3.0), 4), "0.3333");
/// assert_eq!(format_number(ComplexNumber::new(3.0, -4.0), 10), "3J¯4");
/// assert_eq!(format_number(ComplexNumber::from(1e20), 10), "1E20");
/// ```
#[must_use]
pub fn format_number(value: ComplexNumber, precision: usize) -> String {
    if value.imaginary == 0.0 {
        format_real(value.real, precision)
    } else {
        format!("{}J{}",
                format_real(value.real, precision),
                format_real(value.imaginary, precision))
    }
}

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_possible_wrap)]
#[allow(clippy::cast_sign_loss)]
fn format_real(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "¯∞" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let precision = precision.clamp(1, 17);
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let text = if exponent < -6 || exponent >= precision as i32 {
        format!("{}E{exponent}", trim_fraction(mantissa))
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    };
    text.replace('-', "¯")
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

fn format_element(element: &Element, precision: usize) -> String {
    match element {
        Element::Number(n) => format_number(*n, precision),
        Element::Char(c) => c.to_string(),
        Element::Boxed(inner) => format!("({})", format_inline(inner, precision)),
    }
}

/// Single-line rendering used for nested items; matrix rows are separated by
/// `; `.
fn format_inline(array: &Array, precision: usize) -> String {
    if array.rank() <= 1 {
        return format_array(array, precision);
    }
    format_array(array, precision).lines()
                                  .filter(|line| !line.is_empty())
                                  .collect::<Vec<_>>()
                                  .join("; ")
}

/// Renders an array for display.
///
/// Scalars print bare, vectors print space-separated (character vectors
/// print as plain text), and higher ranks print one row per line with
/// right-aligned columns and a blank line between planes.
#[must_use]
pub fn format_array(array: &Array, precision: usize) -> String {
    match array.rank() {
        0 => format_element(&array.elements()[0], precision),
        1 if array.is_text() => array.elements().iter().map(|e| format_element(e, precision)).collect(),
        1 => array.elements()
                  .iter()
                  .map(|e| format_element(e, precision))
                  .collect::<Vec<_>>()
                  .join(" "),
        _ => format_grid(array, precision),
    }
}

fn format_grid(array: &Array, precision: usize) -> String {
    let shape = array.shape();
    let columns = shape[shape.len() - 1];
    let rows_per_plane = shape[shape.len() - 2];
    if array.size() == 0 {
        return String::new();
    }

    let cells: Vec<String> = array.elements().iter().map(|e| format_element(e, precision)).collect();
    let text = array.is_text();
    let widths: Vec<usize> = (0..columns).map(|c| {
                                             cells.iter()
                                                  .skip(c)
                                                  .step_by(columns)
                                                  .map(|s| s.chars().count())
                                                  .max()
                                                  .unwrap_or(0)
                                         })
                                         .collect();

    let mut lines = Vec::new();
    for (row_index, row) in cells.chunks(columns).enumerate() {
        if row_index > 0 && row_index % rows_per_plane == 0 {
            lines.push(String::new());
        }
        let line = if text {
            row.concat()
        } else {
            row.iter()
               .zip(&widths)
               .map(|(cell, &width)| format!("{cell:>width$}"))
               .collect::<Vec<_>>()
               .join(" ")
        };
        lines.push(line);
    }
    lines.join("\n")
}

impl Display for Array {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_array(self, DEFAULT_PRINT_PRECISION))
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_element(self, DEFAULT_PRINT_PRECISION))
    }
}
