//! Date format strings
//!
//! Formats are written with single-letter tokens:
//!
//! | Token | Meaning                       |
//! |-------|-------------------------------|
//! | `Y`   | four digit year               |
//! | `y`   | two digit year                |
//! | `m`   | month, zero padded            |
//! | `n`   | month, no padding             |
//! | `M`   | short month name (`Jan`)      |
//! | `F`   | full month name (`January`)   |
//! | `d`   | day of month, zero padded     |
//! | `j`   | day of month, no padding      |
//! | `D`   | short weekday name (`Mon`)    |
//! | `l`   | full weekday name (`Monday`)  |
//! | `H`   | hour 00-23, zero padded       |
//! | `G`   | hour 0-23, no padding         |
//! | `i`   | minutes, zero padded          |
//! | `s`   | seconds, zero padded          |
//!
//! `\` makes the next character literal. Any other character is literal.

use chrono::NaiveDateTime;

/// Separator between the user input and filled-in components
const FILL_SEPARATOR: char = '\u{1f}';

/// A compiled date format
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DateFormat {
    source: String,
    chrono: String,
    fill_format: String,
    fill_value: String,
}

#[derive(Default)]
struct Components {
    year: bool,
    month: bool,
    day: bool,
    hour: bool,
    minute: bool,
    second: bool,
}

impl DateFormat {
    pub(crate) fn new(source: &str) -> Self {
        let mut chrono = String::with_capacity(source.len() * 2);
        let mut seen = Components::default();
        let mut chars = source.chars();

        while let Some(c) = chars.next() {
            let token = match c {
                'Y' => {
                    seen.year = true;
                    "%Y"
                }
                'y' => {
                    seen.year = true;
                    "%y"
                }
                'm' | 'n' | 'M' | 'F' => {
                    seen.month = true;
                    match c {
                        'm' => "%m",
                        'n' => "%-m",
                        'M' => "%b",
                        _ => "%B",
                    }
                }
                'd' | 'j' => {
                    seen.day = true;
                    if c == 'd' {
                        "%d"
                    } else {
                        "%-d"
                    }
                }
                'H' | 'G' => {
                    seen.hour = true;
                    if c == 'H' {
                        "%H"
                    } else {
                        "%-H"
                    }
                }
                'i' => {
                    seen.minute = true;
                    "%M"
                }
                's' => {
                    seen.second = true;
                    "%S"
                }
                'D' => "%a",
                'l' => "%A",
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        push_literal(&mut chrono, escaped);
                    }
                    continue;
                }
                other => {
                    push_literal(&mut chrono, other);
                    continue;
                }
            };
            chrono.push_str(token);
        }

        let mut fill_format = String::new();
        let mut fill_value = String::new();
        let defaults = [
            (seen.year, "%Y", "1970"),
            (seen.month, "%m", "01"),
            (seen.day, "%d", "01"),
            (seen.hour, "%H", "00"),
            (seen.minute, "%M", "00"),
            (seen.second, "%S", "00"),
        ];
        for (present, token, value) in defaults {
            if !present {
                fill_format.push(FILL_SEPARATOR);
                fill_format.push_str(token);
                fill_value.push(FILL_SEPARATOR);
                fill_value.push_str(value);
            }
        }

        Self {
            source: source.to_string(),
            chrono,
            fill_format,
            fill_value,
        }
    }

    /// The format as written by the caller
    pub(crate) fn source(&self) -> &str {
        &self.source
    }

    /// Parses `input`, accepting it only if formatting the result reproduces
    /// `input` exactly.
    pub(crate) fn parse_strict(&self, input: &str) -> Option<NaiveDateTime> {
        let format = format!("{}{}", self.chrono, self.fill_format);
        let filled = format!("{}{}", input, self.fill_value);
        let parsed = NaiveDateTime::parse_from_str(&filled, &format).ok()?;

        if parsed.format(&self.chrono).to_string() == input {
            Some(parsed)
        } else {
            None
        }
    }
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation() {
        assert_eq!(DateFormat::new("Y-m-d H:i:s").chrono, "%Y-%m-%d %H:%M:%S");
        assert_eq!(DateFormat::new("j.n.y G").chrono, "%-d.%-m.%y %-H");
        assert_eq!(DateFormat::new("D, d M Y").chrono, "%a, %d %b %Y");
        assert_eq!(DateFormat::new("\\Y\\m 100%").chrono, "Ym 100%%");
    }

    #[test]
    fn test_full_format() {
        let format = DateFormat::new("Y-m-d H:i:s");
        assert!(format.parse_strict("2019-01-01 10:00:02").is_some());
        assert!(format.parse_strict("2019-02-30 10:00:02").is_none());
        assert!(format.parse_strict("2019-1-01 10:00:02").is_none());
    }

    #[test]
    fn test_partial_formats_fill_defaults() {
        let parsed = DateFormat::new("Y-m").parse_strict("2019-03").unwrap();
        assert_eq!(parsed.to_string(), "2019-03-01 00:00:00");

        let parsed = DateFormat::new("Y").parse_strict("2019").unwrap();
        assert_eq!(parsed.to_string(), "2019-01-01 00:00:00");

        let parsed = DateFormat::new("H:i").parse_strict("10:30").unwrap();
        assert_eq!(parsed.to_string(), "1970-01-01 10:30:00");
    }

    #[test]
    fn test_rejects_garbage() {
        let format = DateFormat::new("Y-m-d");
        assert!(format.parse_strict("test").is_none());
        assert!(format.parse_strict("2019-13-01").is_none());
        assert!(format.parse_strict("2019-01-01 ").is_none());
    }

    #[test]
    fn test_unpadded_tokens() {
        let format = DateFormat::new("j/n/Y");
        assert!(format.parse_strict("5/3/2020").is_some());
        assert!(format.parse_strict("05/03/2020").is_none());
    }
}
