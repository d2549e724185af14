//! Line protocol encoding.
//!
//! One point renders as
//!
//! ```text
//! measurement[,tag=value...] field=value[,field=value...][ timestamp]
//! ```
//!
//! Encoding never fails. A point whose fields are all NaN or infinite renders
//! as an empty string, which callers must treat as "do not write".

use std::collections::BTreeMap;

use tracing::debug;

use crate::options::WriteOptions;
use crate::point::Point;
use crate::types::WritePrecision;
use crate::value::FieldValue;

/// Encode one point at `precision`, merging `default_tags` under the point's tags.
pub fn encode(
    point: &Point,
    default_tags: &BTreeMap<String, String>,
    precision: WritePrecision,
) -> String {
    let values = point.values();

    let mut fields = String::new();
    for (key, value) in values.fields() {
        if !value.is_finite() {
            continue;
        }
        if !fields.is_empty() {
            fields.push(',');
        }
        escape_key(&mut fields, key);
        fields.push('=');
        write_field_value(&mut fields, value);
    }
    if fields.is_empty() {
        return String::new();
    }

    let mut line = String::with_capacity(point.measurement().len() + fields.len() + 32);
    escape_measurement(&mut line, point.measurement());

    if default_tags.is_empty() {
        write_tags(&mut line, values.tags().iter());
    } else {
        let mut merged: BTreeMap<&String, &String> = default_tags.iter().collect();
        merged.extend(values.tags());
        write_tags(&mut line, merged.into_iter());
    }

    line.push(' ');
    line.push_str(&fields);

    if let Some(timestamp) = values.timestamp() {
        line.push(' ');
        line.push_str(&timestamp.to_precision(precision).to_string());
    }

    line
}

/// Encode many points, one line each, skipping points that encode to nothing.
///
/// Lines are joined with `\n`; there is no trailing newline.
pub fn encode_batch<'a>(
    points: impl IntoIterator<Item = &'a Point>,
    options: &WriteOptions,
) -> String {
    let mut body = String::new();
    for point in points {
        let line = point.to_line_protocol_with(options);
        if line.is_empty() {
            debug!(
                measurement = point.measurement(),
                "skipping point without finite fields"
            );
            continue;
        }
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str(&line);
    }
    body
}

fn write_tags<'a>(out: &mut String, tags: impl Iterator<Item = (&'a String, &'a String)>) {
    for (key, value) in tags {
        if key.is_empty() || value.is_empty() {
            continue;
        }
        out.push(',');
        escape_key(out, key);
        out.push('=');
        escape_key(out, value);
    }
}

fn write_field_value(out: &mut String, value: &FieldValue) {
    match value {
        FieldValue::Long(i) => {
            out.push_str(&i.to_string());
            out.push('i');
        }
        FieldValue::UnsignedLong(u) => {
            out.push_str(&u.to_string());
            out.push('u');
        }
        FieldValue::Float(f) => out.push_str(&format_float(*f)),
        FieldValue::Double(d) => out.push_str(&format_double(*d)),
        FieldValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        FieldValue::String(s) | FieldValue::Raw(s) => {
            out.push('"');
            for c in s.chars() {
                if c == '\\' || c == '"' {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push('"');
        }
    }
}

/// Measurement names escape space and comma, but not `=`.
fn escape_measurement(out: &mut String, name: &str) {
    escape(out, name, false);
}

/// Tag keys, tag values and field keys also escape `=`.
fn escape_key(out: &mut String, key: &str) {
    escape(out, key, true);
}

fn escape(out: &mut String, s: &str, escape_equals: bool) {
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ' ' | ',' => {
                out.push('\\');
                out.push(c);
            }
            '=' if escape_equals => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
}

/// Shortest digits that round-trip through `f32`, laid out like
/// [`format_double`] with a fixed-notation limit of 9 digits.
fn format_float(value: f32) -> String {
    general_format(&format!("{:e}", value), 9)
}

/// 17 significant digits, fixed-notation limit of 17 digits.
fn format_double(value: f64) -> String {
    general_format(&format!("{:.16e}", value), 17)
}

/// Lay out Rust's `{:e}` output in the general numeric format.
///
/// Fixed notation when the decimal exponent is in `-5 < e < max_exponent`,
/// otherwise scientific as `d.dddE+XX`. Trailing zeros are trimmed in both.
fn general_format(scientific: &str, max_exponent: i32) -> String {
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific.to_string();
    };

    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_end_matches('0');

    let mut out = String::with_capacity(24);
    if mantissa.starts_with('-') {
        out.push('-');
    }
    if digits.is_empty() {
        out.push('0');
        return out;
    }

    if exponent > -5 && exponent < max_exponent {
        if exponent >= 0 {
            let int_len = exponent as usize + 1;
            if digits.len() <= int_len {
                out.push_str(digits);
                out.extend(std::iter::repeat_n('0', int_len - digits.len()));
            } else {
                out.push_str(&digits[..int_len]);
                out.push('.');
                out.push_str(&digits[int_len..]);
            }
        } else {
            out.push_str("0.");
            out.extend(std::iter::repeat_n('0', (-exponent - 1) as usize));
            out.push_str(digits);
        }
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('E');
        out.push(if exponent < 0 { '-' } else { '+' });
        out.push_str(&format!("{:02}", exponent.unsigned_abs()));
    }
    out
}
