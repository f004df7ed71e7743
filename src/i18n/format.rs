//! Positional argument formatting for translation templates.
//!
//! Templates use printf-style placeholders:
//! `%[index$][flags][width][.precision]conversion`.
//!
//! | Conversion | Accepts             | Output                                 |
//! |------------|---------------------|----------------------------------------|
//! | `s` `S`    | anything            | display form (dates use locale pattern)|
//! | `d`        | integer             | decimal, `,` flag groups digits        |
//! | `f`        | float               | fixed point, locale decimal separator  |
//! | `e` `E`    | float               | scientific, two-digit signed exponent  |
//! | `x` `X` `o`| integer             | hex / octal                            |
//! | `c` `C`    | char, integer       | a single character                     |
//! | `b` `B`    | anything            | `true`/`false`                         |
//! | `n` `%`    | nothing             | newline / literal percent              |
//!
//! The number of arguments must match the placeholders: a placeholder with
//! no argument and an argument no placeholder refers to are both errors.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::Language;

/// A positional argument applied to a template at render time.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatArg {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    DateTime(DateTime<Utc>),
}

impl FormatArg {
    /// Human readable name of the argument type, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FormatArg::Str(_) => "string",
            FormatArg::Int(_) => "integer",
            FormatArg::Float(_) => "float",
            FormatArg::Bool(_) => "boolean",
            FormatArg::Char(_) => "character",
            FormatArg::DateTime(_) => "date-time",
        }
    }

    /// Infer a typed argument from a raw text token, such as a word typed in
    /// a chat command. Integers, floats and booleans are recognised; anything
    /// else stays a string.
    pub fn from_token(token: &str) -> FormatArg {
        if let Ok(value) = token.parse::<i64>() {
            return FormatArg::Int(value);
        }
        if token.contains('.') {
            if let Ok(value) = token.parse::<f64>() {
                return FormatArg::Float(value);
            }
        }
        match token {
            "true" => FormatArg::Bool(true),
            "false" => FormatArg::Bool(false),
            _ => FormatArg::Str(token.to_string()),
        }
    }

    fn display(&self, language: Language) -> String {
        match self {
            FormatArg::Str(value) => value.clone(),
            FormatArg::Int(value) => value.to_string(),
            FormatArg::Float(value) => {
                if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e7 {
                    format!("{:.1}", value)
                } else {
                    value.to_string()
                }
            }
            FormatArg::Bool(value) => value.to_string(),
            FormatArg::Char(value) => value.to_string(),
            FormatArg::DateTime(value) => value.format(language.date_time_pattern()).to_string(),
        }
    }
}

impl From<&str> for FormatArg {
    fn from(value: &str) -> Self {
        FormatArg::Str(value.to_string())
    }
}

impl From<String> for FormatArg {
    fn from(value: String) -> Self {
        FormatArg::Str(value)
    }
}

impl From<i64> for FormatArg {
    fn from(value: i64) -> Self {
        FormatArg::Int(value)
    }
}

impl From<i32> for FormatArg {
    fn from(value: i32) -> Self {
        FormatArg::Int(i64::from(value))
    }
}

impl From<u32> for FormatArg {
    fn from(value: u32) -> Self {
        FormatArg::Int(i64::from(value))
    }
}

impl From<usize> for FormatArg {
    fn from(value: usize) -> Self {
        FormatArg::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for FormatArg {
    fn from(value: f64) -> Self {
        FormatArg::Float(value)
    }
}

impl From<f32> for FormatArg {
    fn from(value: f32) -> Self {
        FormatArg::Float(f64::from(value))
    }
}

impl From<bool> for FormatArg {
    fn from(value: bool) -> Self {
        FormatArg::Bool(value)
    }
}

impl From<char> for FormatArg {
    fn from(value: char) -> Self {
        FormatArg::Char(value)
    }
}

impl From<DateTime<Utc>> for FormatArg {
    fn from(value: DateTime<Utc>) -> Self {
        FormatArg::DateTime(value)
    }
}

/// Build a `Vec<FormatArg>` from heterogeneous values.
///
/// ```ignore
/// let args = format_args_vec!["x", 5, 2.5];
/// ```
#[macro_export]
macro_rules! format_args_vec {
    () => { ::std::vec::Vec::<$crate::i18n::FormatArg>::new() };
    ($($arg:expr),+ $(,)?) => {
        vec![$($crate::i18n::FormatArg::from($arg)),+]
    };
}

/// Why a template could not be rendered with the supplied arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("unknown conversion '%{conversion}' at byte {position}")]
    UnknownConversion { conversion: char, position: usize },

    #[error("unterminated format specifier at byte {position}")]
    Unterminated { position: usize },

    #[error("format specifier at byte {position} has a '-' or '0' flag but no width")]
    MissingWidth { position: usize },

    #[error("width, precision or index at byte {position} is larger than {}", MAX_FIELD)]
    InvalidNumber { position: usize },

    #[error("flag '{flag}' does not apply to '%{conversion}' at byte {position}")]
    IllegalFlag {
        flag: char,
        conversion: char,
        position: usize,
    },

    #[error("'%<' at byte {position} has no previous argument to reuse")]
    NoPreviousArgument { position: usize },

    #[error("no argument supplied for placeholder {index}")]
    MissingArgument { index: usize },

    #[error("'%{conversion}' cannot format a {kind} argument")]
    IllegalConversion { conversion: char, kind: &'static str },

    #[error("{supplied} arguments supplied but the template only uses {used}")]
    UnusedArguments { used: usize, supplied: usize },
}

/// The kind of value a placeholder renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Conversion {
    String,
    Decimal,
    Float,
    Scientific,
    Hex,
    Octal,
    Char,
    Boolean,
    Newline,
    Percent,
}

impl Conversion {
    fn from_char(c: char) -> Option<(Conversion, bool)> {
        let conversion = match c.to_ascii_lowercase() {
            's' => Conversion::String,
            'd' => Conversion::Decimal,
            'f' => Conversion::Float,
            'e' => Conversion::Scientific,
            'x' => Conversion::Hex,
            'o' => Conversion::Octal,
            'c' => Conversion::Char,
            'b' => Conversion::Boolean,
            'n' => Conversion::Newline,
            '%' => Conversion::Percent,
            _ => return None,
        };
        // Only these have an upper-case variant
        let upper = c.is_ascii_uppercase() && matches!(c, 'S' | 'E' | 'X' | 'C' | 'B');
        if c.is_ascii_uppercase() && !upper {
            return None;
        }
        Some((conversion, upper))
    }

    /// Whether the conversion consumes an argument.
    pub fn takes_argument(&self) -> bool {
        !matches!(self, Conversion::Newline | Conversion::Percent)
    }

    fn is_numeric(&self) -> bool {
        matches!(
            self,
            Conversion::Decimal
                | Conversion::Float
                | Conversion::Scientific
                | Conversion::Hex
                | Conversion::Octal
        )
    }
}

/// A resolved placeholder: which argument (1-based) it renders and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Placeholder {
    pub index: usize,
    pub conversion: Conversion,
}

#[derive(Debug, Clone, Copy, Default)]
struct Flags {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    group: bool,
}

#[derive(Debug, Clone)]
struct Specifier {
    /// Zero-based argument index, `None` for `%n` and `%%`
    argument: Option<usize>,
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: Conversion,
    upper: bool,
    source: char,
}

#[derive(Debug)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(Specifier),
}

/// Largest width, precision or argument index a template may use.
pub const MAX_FIELD: usize = 1024;

/// Read a run of digits. `position` is the start of the specifier, for errors.
fn read_number(bytes: &[u8], pos: &mut usize, position: usize) -> Result<Option<usize>, FormatError> {
    let start = *pos;
    while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
        *pos += 1;
    }
    if *pos == start {
        return Ok(None);
    }
    std::str::from_utf8(&bytes[start..*pos])
        .ok()
        .and_then(|digits| digits.parse::<usize>().ok())
        .filter(|&number| number <= MAX_FIELD)
        .map(Some)
        .ok_or(FormatError::InvalidNumber { position })
}

/// Reject flags the conversion has no use for.
fn check_flags(flags: &Flags, conversion: Conversion, source: char, position: usize) -> Result<(), FormatError> {
    let signed = matches!(
        conversion,
        Conversion::Decimal | Conversion::Float | Conversion::Scientific
    );
    let illegal = if flags.zero && !conversion.is_numeric() {
        Some('0')
    } else if flags.group && !matches!(conversion, Conversion::Decimal | Conversion::Float) {
        Some(',')
    } else if flags.plus && !signed {
        Some('+')
    } else if flags.space && !signed {
        Some(' ')
    } else {
        None
    };

    match illegal {
        Some(flag) => Err(FormatError::IllegalFlag {
            flag,
            conversion: source,
            position,
        }),
        None => Ok(()),
    }
}

fn parse(template: &str) -> Result<Vec<Segment<'_>>, FormatError> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;
    let mut next_ordinary = 0;
    let mut previous: Option<usize> = None;

    while pos < bytes.len() {
        if bytes[pos] != b'%' {
            pos += 1;
            continue;
        }

        if literal_start < pos {
            segments.push(Segment::Literal(&template[literal_start..pos]));
        }
        let start = pos;
        pos += 1;

        // Explicit argument index: digits followed by '$'
        let mut explicit = None;
        let mut reuse_previous = false;
        let checkpoint = pos;
        if let Some(index) = read_number(bytes, &mut pos, start)? {
            if bytes.get(pos) == Some(&b'$') {
                pos += 1;
                if index == 0 {
                    return Err(FormatError::MissingArgument { index });
                }
                explicit = Some(index - 1);
            } else {
                pos = checkpoint;
            }
        } else if bytes.get(pos) == Some(&b'<') {
            pos += 1;
            reuse_previous = true;
        }

        let mut flags = Flags::default();
        while let Some(&byte) = bytes.get(pos) {
            match byte {
                b'-' => flags.left = true,
                b'0' => flags.zero = true,
                b'+' => flags.plus = true,
                b' ' => flags.space = true,
                b',' => flags.group = true,
                _ => break,
            }
            pos += 1;
        }

        let width = read_number(bytes, &mut pos, start)?;

        let mut precision = None;
        if bytes.get(pos) == Some(&b'.') {
            pos += 1;
            precision = Some(
                read_number(bytes, &mut pos, start)?
                    .ok_or(FormatError::Unterminated { position: start })?,
            );
        }

        let source = template[pos..]
            .chars()
            .next()
            .ok_or(FormatError::Unterminated { position: start })?;
        let (conversion, upper) =
            Conversion::from_char(source).ok_or(FormatError::UnknownConversion {
                conversion: source,
                position: start,
            })?;
        pos += source.len_utf8();

        if (flags.left || flags.zero) && width.is_none() {
            return Err(FormatError::MissingWidth { position: start });
        }
        check_flags(&flags, conversion, source, start)?;

        let argument = if !conversion.takes_argument() {
            None
        } else if let Some(index) = explicit {
            Some(index)
        } else if reuse_previous {
            Some(previous.ok_or(FormatError::NoPreviousArgument { position: start })?)
        } else {
            next_ordinary += 1;
            Some(next_ordinary - 1)
        };
        if argument.is_some() {
            previous = argument;
        }

        segments.push(Segment::Placeholder(Specifier {
            argument,
            flags,
            width,
            precision,
            conversion,
            upper,
            source,
        }));
        literal_start = pos;
    }

    if literal_start < bytes.len() {
        segments.push(Segment::Literal(&template[literal_start..]));
    }

    Ok(segments)
}

/// List the argument-consuming placeholders of a template.
///
/// The result is de-duplicated and ordered by argument index, so two
/// templates that consume the same arguments the same way compare equal
/// regardless of the order the placeholders appear in.
pub fn placeholders(template: &str) -> Result<Vec<Placeholder>, FormatError> {
    let set: BTreeSet<Placeholder> = parse(template)?
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder(spec) => spec.argument.map(|argument| Placeholder {
                index: argument + 1,
                conversion: spec.conversion,
            }),
            Segment::Literal(_) => None,
        })
        .collect();
    Ok(set.into_iter().collect())
}

/// Render `template` with positional `args` using the locale rules of
/// `language`.
pub fn format(template: &str, args: &[FormatArg], language: Language) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len());
    let mut used = 0;

    for segment in parse(template)? {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(spec) => {
                let rendered = match spec.argument {
                    None if spec.conversion == Conversion::Newline => "\n".to_string(),
                    None => "%".to_string(),
                    Some(index) => {
                        let arg = args
                            .get(index)
                            .ok_or(FormatError::MissingArgument { index: index + 1 })?;
                        used = used.max(index + 1);
                        render(&spec, arg, language)?
                    }
                };
                out.push_str(&pad(&spec, rendered));
            }
        }
    }

    if used < args.len() {
        return Err(FormatError::UnusedArguments {
            used,
            supplied: args.len(),
        });
    }

    Ok(out)
}

fn render(spec: &Specifier, arg: &FormatArg, language: Language) -> Result<String, FormatError> {
    let illegal = || FormatError::IllegalConversion {
        conversion: spec.source,
        kind: arg.kind(),
    };

    let rendered = match (spec.conversion, arg) {
        (Conversion::String, _) => {
            let text = arg.display(language);
            match spec.precision {
                Some(precision) => text.chars().take(precision).collect(),
                None => text,
            }
        }
        (Conversion::Decimal, FormatArg::Int(value)) => {
            let digits = value.unsigned_abs().to_string();
            let digits = if spec.flags.group {
                group_digits(&digits, language.grouping_separator())
            } else {
                digits
            };
            with_sign(&spec.flags, *value < 0, digits)
        }
        (Conversion::Float, FormatArg::Float(value)) => {
            if !value.is_finite() {
                return Ok(non_finite(*value));
            }
            let fixed = format!("{:.*}", spec.precision.unwrap_or(6), value.abs());
            let localized = localize_fixed(&fixed, &spec.flags, language);
            with_sign(&spec.flags, value.is_sign_negative(), localized)
        }
        (Conversion::Scientific, FormatArg::Float(value)) => {
            if !value.is_finite() {
                return Ok(non_finite(*value));
            }
            let raw = format!("{:.*e}", spec.precision.unwrap_or(6), value.abs());
            let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let mantissa = mantissa.replace('.', &language.decimal_separator().to_string());
            let sign = if exponent < 0 { '-' } else { '+' };
            let body = format!("{}e{}{:02}", mantissa, sign, exponent.abs());
            with_sign(&spec.flags, value.is_sign_negative(), body)
        }
        (Conversion::Hex, FormatArg::Int(value)) => format!("{:x}", value),
        (Conversion::Octal, FormatArg::Int(value)) => format!("{:o}", value),
        (Conversion::Char, FormatArg::Char(value)) => value.to_string(),
        (Conversion::Char, FormatArg::Int(value)) => u32::try_from(*value)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(illegal)?
            .to_string(),
        (Conversion::Boolean, FormatArg::Bool(value)) => value.to_string(),
        (Conversion::Boolean, _) => "true".to_string(),
        _ => return Err(illegal()),
    };

    Ok(if spec.upper {
        rendered.to_uppercase()
    } else {
        rendered
    })
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_sign_negative() {
        "-Infinity".to_string()
    } else {
        "Infinity".to_string()
    }
}

fn with_sign(flags: &Flags, negative: bool, body: String) -> String {
    if negative {
        format!("-{}", body)
    } else if flags.plus {
        format!("+{}", body)
    } else if flags.space {
        format!(" {}", body)
    } else {
        body
    }
}

/// Swap the decimal point of a `{:.N}` rendering for the locale separator and
/// optionally group the integer digits.
fn localize_fixed(fixed: &str, flags: &Flags, language: Language) -> String {
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed, None),
    };
    let mut out = if flags.group {
        group_digits(integer, language.grouping_separator())
    } else {
        integer.to_string()
    };
    if let Some(fraction) = fraction {
        out.push(language.decimal_separator());
        out.push_str(fraction);
    }
    out
}

fn group_digits(digits: &str, separator: char) -> String {
    let count = digits.chars().count();
    let mut out = String::with_capacity(digits.len() + count / 3 * separator.len_utf8());
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (count - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(digit);
    }
    out
}

fn pad(spec: &Specifier, rendered: String) -> String {
    let width = match spec.width {
        Some(width) => width,
        None => return rendered,
    };
    let len = rendered.chars().count();
    if len >= width {
        return rendered;
    }
    let fill = width - len;

    if spec.flags.left {
        return format!("{}{}", rendered, " ".repeat(fill));
    }

    let finite = !rendered.ends_with("Infinity") && rendered != "NaN";
    if spec.flags.zero && spec.conversion.is_numeric() && finite {
        let sign_len = match rendered.chars().next() {
            Some('-' | '+' | ' ') => 1,
            _ => 0,
        };
        let (sign, digits) = rendered.split_at(sign_len);
        return format!("{}{}{}", sign, "0".repeat(fill), digits);
    }

    format!("{}{}", " ".repeat(fill), rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format_args_vec;
    use chrono::TimeZone;

    fn en(template: &str, args: &[FormatArg]) -> Result<String, FormatError> {
        format(template, args, Language::EnUk)
    }

    // ==================== Basic Substitution Tests ====================

    #[test]
    fn test_string_and_decimal() {
        let out = en("%s has %d items", &format_args_vec!["x", 5]).unwrap();
        assert_eq!(out, "x has 5 items");
    }

    #[test]
    fn test_no_placeholders_no_args() {
        assert_eq!(en("plain text", &[]).unwrap(), "plain text");
    }

    #[test]
    fn test_multibyte_literals_survive() {
        let out = en("✅ %s → ok", &format_args_vec!["día"]).unwrap();
        assert_eq!(out, "✅ día → ok");
    }

    #[test]
    fn test_percent_and_newline() {
        let out = en("100%% done%n%s", &format_args_vec!["next"]).unwrap();
        assert_eq!(out, "100% done\nnext");
    }

    #[test]
    fn test_explicit_indexes() {
        let out = en("%2$s before %1$s", &format_args_vec!["a", "b"]).unwrap();
        assert_eq!(out, "b before a");
    }

    #[test]
    fn test_reuse_previous_argument() {
        let out = en("%s and %<S", &format_args_vec!["echo"]).unwrap();
        assert_eq!(out, "echo and ECHO");
    }

    #[test]
    fn test_explicit_index_does_not_advance_ordinary() {
        let out = en("%1$s %s %s", &format_args_vec!["a", "b"]).unwrap();
        assert_eq!(out, "a a b");
    }

    // ==================== Numeric Tests ====================

    #[test]
    fn test_grouping_is_locale_aware() {
        let args = format_args_vec![1_234_567];
        assert_eq!(format("%,d", &args, Language::EnUk).unwrap(), "1,234,567");
        assert_eq!(format("%,d", &args, Language::DeDe).unwrap(), "1.234.567");
    }

    #[test]
    fn test_float_precision_and_separator() {
        let args = format_args_vec![1.23456];
        assert_eq!(format("%.2f", &args, Language::EnUs).unwrap(), "1.23");
        assert_eq!(format("%.2f", &args, Language::FrFr).unwrap(), "1,23");
    }

    #[test]
    fn test_float_default_precision() {
        assert_eq!(en("%f", &format_args_vec![1.5]).unwrap(), "1.500000");
    }

    #[test]
    fn test_grouped_float() {
        let out = format("%,.1f", &format_args_vec![12345.678], Language::EsEs).unwrap();
        assert_eq!(out, "12.345,7");
    }

    #[test]
    fn test_scientific() {
        assert_eq!(en("%e", &format_args_vec![12345.678]).unwrap(), "1.234568e+04");
        assert_eq!(en("%.2E", &format_args_vec![0.00123]).unwrap(), "1.23E-03");
    }

    #[test]
    fn test_signs() {
        assert_eq!(en("%+d", &format_args_vec![7]).unwrap(), "+7");
        assert_eq!(en("% d", &format_args_vec![7]).unwrap(), " 7");
        assert_eq!(en("%d", &format_args_vec![-7]).unwrap(), "-7");
    }

    #[test]
    fn test_hex_and_octal() {
        assert_eq!(en("%x %X %o", &format_args_vec![255, 255, 8]).unwrap(), "ff FF 10");
    }

    #[test]
    fn test_non_finite_floats() {
        assert_eq!(en("%f", &format_args_vec![f64::NAN]).unwrap(), "NaN");
        assert_eq!(en("%f", &format_args_vec![f64::NEG_INFINITY]).unwrap(), "-Infinity");
    }

    // ==================== Width Tests ====================

    #[test]
    fn test_width_right_and_left() {
        assert_eq!(en("[%5s]", &format_args_vec!["ab"]).unwrap(), "[   ab]");
        assert_eq!(en("[%-5s]", &format_args_vec!["ab"]).unwrap(), "[ab   ]");
    }

    #[test]
    fn test_zero_padding_keeps_sign_first() {
        assert_eq!(en("%05d", &format_args_vec![-42]).unwrap(), "-0042");
    }

    #[test]
    fn test_string_precision_truncates() {
        assert_eq!(en("%.3s", &format_args_vec!["abcdef"]).unwrap(), "abc");
    }

    // ==================== Other Conversions ====================

    #[test]
    fn test_char_from_char_and_code_point() {
        assert_eq!(en("%c%c", &format_args_vec!['h', 105]).unwrap(), "hi");
    }

    #[test]
    fn test_boolean() {
        assert_eq!(en("%b %B", &format_args_vec![false, "anything"]).unwrap(), "false TRUE");
    }

    #[test]
    fn test_float_as_string_keeps_fraction() {
        assert_eq!(en("%s", &format_args_vec![5.0]).unwrap(), "5.0");
    }

    #[test]
    fn test_date_time_uses_locale_pattern() {
        let date = Utc.with_ymd_and_hms(2021, 3, 4, 17, 5, 0).unwrap();
        let args = format_args_vec![date];
        assert_eq!(format("%s", &args, Language::EnUk).unwrap(), "04/03/2021 17:05");
        assert_eq!(format("%s", &args, Language::EnUs).unwrap(), "03/04/2021 05:05 PM");
        assert_eq!(format("%s", &args, Language::DeDe).unwrap(), "04.03.2021 17:05");
    }

    // ==================== Error Tests ====================

    #[test]
    fn test_missing_argument() {
        let err = en("%s has %d items", &format_args_vec!["x"]).unwrap_err();
        assert_eq!(err, FormatError::MissingArgument { index: 2 });
    }

    #[test]
    fn test_unused_arguments() {
        let err = en("%s", &format_args_vec!["x", "y"]).unwrap_err();
        assert_eq!(err, FormatError::UnusedArguments { used: 1, supplied: 2 });
    }

    #[test]
    fn test_illegal_conversion() {
        let err = en("%d", &format_args_vec!["five"]).unwrap_err();
        assert_eq!(
            err,
            FormatError::IllegalConversion {
                conversion: 'd',
                kind: "string"
            }
        );
    }

    #[test]
    fn test_float_rejects_integer() {
        assert!(matches!(
            en("%f", &format_args_vec![5]),
            Err(FormatError::IllegalConversion { .. })
        ));
    }

    #[test]
    fn test_unknown_conversion() {
        let err = en("50%q", &format_args_vec![1]).unwrap_err();
        assert_eq!(
            err,
            FormatError::UnknownConversion {
                conversion: 'q',
                position: 2
            }
        );
    }

    #[test]
    fn test_unterminated() {
        assert_eq!(
            en("trailing %", &[]).unwrap_err(),
            FormatError::Unterminated { position: 9 }
        );
        assert_eq!(
            en("%.s", &format_args_vec!["x"]).unwrap_err(),
            FormatError::Unterminated { position: 0 }
        );
    }

    #[test]
    fn test_missing_width() {
        assert_eq!(
            en("%-s", &format_args_vec!["x"]).unwrap_err(),
            FormatError::MissingWidth { position: 0 }
        );
    }

    #[test]
    fn test_oversized_width() {
        assert_eq!(
            en("%99999999999999999999d", &format_args_vec![5]).unwrap_err(),
            FormatError::InvalidNumber { position: 0 }
        );
        assert_eq!(
            en("x%2000s", &format_args_vec!["a"]).unwrap_err(),
            FormatError::InvalidNumber { position: 1 }
        );
        assert!(en("%1024s", &format_args_vec!["a"]).is_ok());
    }

    #[test]
    fn test_oversized_precision_and_index() {
        assert!(matches!(
            en("%.5000f", &format_args_vec![1.0]),
            Err(FormatError::InvalidNumber { .. })
        ));
        assert!(matches!(
            en("%99999999999999999999$s", &format_args_vec!["a"]),
            Err(FormatError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_zero_flag_needs_numeric_conversion() {
        assert_eq!(
            en("%05s", &format_args_vec!["ab"]).unwrap_err(),
            FormatError::IllegalFlag {
                flag: '0',
                conversion: 's',
                position: 0
            }
        );
        assert_eq!(en("%05x", &format_args_vec![255]).unwrap(), "000ff");
    }

    #[test]
    fn test_grouping_flag_needs_decimal_or_float() {
        assert_eq!(
            en("%,x", &format_args_vec![255]).unwrap_err(),
            FormatError::IllegalFlag {
                flag: ',',
                conversion: 'x',
                position: 0
            }
        );
        assert!(matches!(
            en("%,e", &format_args_vec![1.0]),
            Err(FormatError::IllegalFlag { flag: ',', .. })
        ));
    }

    #[test]
    fn test_sign_flags_need_signed_conversion() {
        assert!(matches!(
            en("%+s", &format_args_vec!["a"]),
            Err(FormatError::IllegalFlag { flag: '+', .. })
        ));
        assert!(matches!(
            en("% x", &format_args_vec![1]),
            Err(FormatError::IllegalFlag { flag: ' ', .. })
        ));
    }

    #[test]
    fn test_placeholders_report_bad_flags() {
        assert!(placeholders("%,s").is_err());
    }

    #[test]
    fn test_reuse_without_previous() {
        assert_eq!(
            en("%<s", &format_args_vec!["x"]).unwrap_err(),
            FormatError::NoPreviousArgument { position: 0 }
        );
    }

    #[test]
    fn test_upper_case_of_lower_only_conversion_is_unknown() {
        assert!(matches!(
            en("%D", &format_args_vec![1]),
            Err(FormatError::UnknownConversion { conversion: 'D', .. })
        ));
    }

    // ==================== Placeholder Tests ====================

    #[test]
    fn test_placeholders_are_ordered_by_index() {
        let found = placeholders("%2$d then %1$s, 100%%").unwrap();
        assert_eq!(
            found,
            vec![
                Placeholder {
                    index: 1,
                    conversion: Conversion::String
                },
                Placeholder {
                    index: 2,
                    conversion: Conversion::Decimal
                },
            ]
        );
    }

    #[test]
    fn test_placeholders_ignore_case_variant() {
        assert_eq!(placeholders("%S").unwrap(), placeholders("%s").unwrap());
    }

    // ==================== Token Tests ====================

    #[test]
    fn test_from_token() {
        assert_eq!(FormatArg::from_token("42"), FormatArg::Int(42));
        assert_eq!(FormatArg::from_token("2.5"), FormatArg::Float(2.5));
        assert_eq!(FormatArg::from_token("true"), FormatArg::Bool(true));
        assert_eq!(FormatArg::from_token("Matrix"), FormatArg::Str("Matrix".into()));
    }
}
