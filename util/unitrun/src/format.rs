// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Restricted printf-style interpreter for failure messages.
//!
//! Arguments are a closed, tagged list ([`Arg`]) and every conversion is
//! checked against the kind of the argument it consumes. Anything the
//! interpreter does not understand is rejected with a [`FormatError`]
//! rather than skipped, so argument consumption can never drift.
//!
//! Two dialects exist:
//!
//! | Dialect | Conversions | Length |
//! |---------|-------------|--------|
//! | [`Dialect::Standard`] | `%d %i %u %x %X %f %c %s %%` | bounded by [`SCRATCH_LEN`] |
//! | [`Dialect::Binary`] | `%d %u %b %s %%` | unbounded |
//!
//! C length modifiers (`h`, `l`, `ll`, `z`, `j`, `t`, `L`) are accepted and
//! ignored. `%f` takes an optional `.N` precision and defaults to six places.

use std::{borrow::Cow, fmt::Write};

use strum::{Display, EnumDiscriminants};
use thiserror::Error;

use crate::message::MessageBuffer;

/// Size of the scratch area of the bounded path, terminator included.
pub const SCRATCH_LEN: usize = 256;

const DEFAULT_FLOAT_PRECISION: usize = 6;
/// Largest `.N` accepted by `%f`.
pub const MAX_PRECISION: usize = SCRATCH_LEN;
const BYTE_BITS: u32 = 8;

/// One message argument.
#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(ArgKind), derive(Display))]
pub enum Arg<'a> {
    I64(i64),
    U64(u64),
    F64(f64),
    Str(Cow<'a, str>),
    Bytes(&'a [u8]),
}

impl Arg<'_> {
    pub fn kind(&self) -> ArgKind {
        ArgKind::from(self)
    }

    /// The plain conversion that renders this argument.
    pub fn conversion(&self) -> &'static str {
        match self {
            Arg::I64(_) => "%d",
            Arg::U64(_) => "%u",
            Arg::F64(_) => "%f",
            Arg::Str(_) | Arg::Bytes(_) => "%s",
        }
    }
}

macro_rules! impl_from_number {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Arg<'_> {
                #[inline]
                fn from(value: $source) -> Self {
                    Arg::$variant(value as $target)
                }
            }
        )+
    };
}

impl_from_number!(I64 as i64: i8, i16, i32, i64, isize);
impl_from_number!(U64 as u64: u8, u16, u32, u64, usize);
impl_from_number!(F64 as f64: f32, f64);

impl From<bool> for Arg<'_> {
    fn from(value: bool) -> Self {
        Arg::Str(Cow::Borrowed(if value { "true" } else { "false" }))
    }
}

impl From<char> for Arg<'_> {
    fn from(value: char) -> Self {
        Arg::Str(Cow::Owned(value.to_string()))
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Str(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(value: &'a String) -> Self {
        Arg::Str(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for Arg<'_> {
    fn from(value: String) -> Self {
        Arg::Str(Cow::Owned(value))
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(value: &'a [u8]) -> Self {
        Arg::Bytes(value)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Arg<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        Arg::Bytes(value.as_slice())
    }
}

/// Builds an argument array for the verification operations.
///
/// ```
/// let args = unitrun::args![5, "five", 5.0];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        [$($crate::Arg::from($arg)),*]
    };
}

/// Set of conversions understood by the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Dialect {
    /// The printf-like set used by the bounded path.
    Standard,
    /// The set of the unbounded path, which adds `%b`.
    Binary,
}

/// Why a format string could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("unsupported conversion `%{conversion}` at byte {offset}")]
    UnknownConversion { conversion: char, offset: usize },
    #[error("conversion `%{conversion}` cannot render argument {index} ({found})")]
    ArgumentMismatch {
        conversion: char,
        index: usize,
        found: ArgKind,
    },
    #[error("no argument {index} for conversion `%{conversion}`")]
    MissingArgument { conversion: char, index: usize },
    #[error("{count} argument(s) left unused")]
    UnusedArguments { count: usize },
    #[error("precision of the conversion at byte {offset} is too large")]
    InvalidPrecision { offset: usize },
    #[error("lone `%` at byte {offset}")]
    DanglingPercent { offset: usize },
}

/// Renders `format` into `buf` using the conversions of `dialect`.
///
/// On error `buf` holds whatever was rendered up to the failing conversion.
pub fn render_into(
    buf: &mut MessageBuffer,
    dialect: Dialect,
    format: &str,
    args: &[Arg<'_>],
) -> Result<(), FormatError> {
    let mut chars = format.char_indices().peekable();
    let mut next_arg = 0;

    while let Some((offset, ch)) = chars.next() {
        if ch != '%' {
            buf.push(ch);
            continue;
        }

        let mut precision = None;
        if chars.next_if(|&(_, c)| c == '.').is_some() {
            let mut digits = 0usize;
            while let Some((_, c)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
                digits = digits
                    .checked_mul(10)
                    .and_then(|d| d.checked_add(c as usize - '0' as usize))
                    .filter(|&d| d <= MAX_PRECISION)
                    .ok_or(FormatError::InvalidPrecision { offset })?;
            }
            precision = Some(digits);
        }
        while chars
            .next_if(|&(_, c)| matches!(c, 'h' | 'l' | 'z' | 'j' | 't' | 'L'))
            .is_some()
        {}

        let Some((conv_offset, conversion)) = chars.next() else {
            return Err(FormatError::DanglingPercent { offset });
        };
        if conversion == '%' {
            buf.push('%');
            continue;
        }
        if !dialect.supports(conversion) {
            return Err(FormatError::UnknownConversion {
                conversion,
                offset: conv_offset,
            });
        }

        let index = next_arg;
        let arg = args
            .get(index)
            .ok_or(FormatError::MissingArgument { conversion, index })?;
        next_arg += 1;
        convert(buf, conversion, precision, arg).ok_or(FormatError::ArgumentMismatch {
            conversion,
            index,
            found: arg.kind(),
        })?;
    }

    if next_arg < args.len() {
        return Err(FormatError::UnusedArguments {
            count: args.len() - next_arg,
        });
    }
    Ok(())
}

impl Dialect {
    fn supports(self, conversion: char) -> bool {
        match self {
            Dialect::Standard => {
                matches!(conversion, 'd' | 'i' | 'u' | 'x' | 'X' | 'f' | 'F' | 'c' | 's')
            }
            Dialect::Binary => matches!(conversion, 'd' | 'u' | 'b' | 's'),
        }
    }
}

/// Renders one supported conversion; `None` when the argument kind does not fit.
fn convert(
    buf: &mut MessageBuffer,
    conversion: char,
    precision: Option<usize>,
    arg: &Arg<'_>,
) -> Option<()> {
    // Writing into a `MessageBuffer` cannot fail.
    let _ = match (conversion, arg) {
        ('d' | 'i', Arg::I64(v)) => write!(buf, "{v}"),
        ('u', Arg::U64(v)) => write!(buf, "{v}"),
        ('x', Arg::I64(v)) => write!(buf, "{v:x}"),
        ('x', Arg::U64(v)) => write!(buf, "{v:x}"),
        ('X', Arg::I64(v)) => write!(buf, "{v:X}"),
        ('X', Arg::U64(v)) => write!(buf, "{v:X}"),
        ('f' | 'F', Arg::F64(v)) => {
            let places = precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
            write!(buf, "{v:.places$}")
        }
        ('b', Arg::I64(v)) => {
            push_binary(buf, *v as u64);
            Ok(())
        }
        ('b', Arg::U64(v)) => {
            push_binary(buf, *v);
            Ok(())
        }
        ('c', Arg::Str(s)) if s.chars().count() == 1 => {
            buf.push_str(s);
            Ok(())
        }
        ('s', Arg::Str(s)) => {
            buf.push_str(s);
            Ok(())
        }
        ('s', Arg::Bytes(bytes)) => {
            push_byte_list(buf, bytes);
            Ok(())
        }
        _ => return None,
    };
    Some(())
}

fn push_byte_list(buf: &mut MessageBuffer, bytes: &[u8]) {
    buf.push('[');
    for (i, byte) in bytes.iter().enumerate() {
        if i != 0 {
            buf.push_str(", ");
        }
        let _ = write!(buf, "{byte:#04x}");
    }
    buf.push(']');
}

/// Appends `bits` as space-separated 8-bit groups, most significant first.
///
/// Bits are taken least significant first with a separator every eight bits,
/// the last group is padded with zeroes, and the appended run is reversed once
/// at the end. Zero renders as a single `00000000` group.
pub fn push_binary(buf: &mut MessageBuffer, bits: u64) {
    let start = buf.len();
    let mut value = bits;
    let mut copied = 0u32;

    while value != 0 {
        if copied % BYTE_BITS == 0 && copied != 0 {
            buf.push(' ');
        }
        buf.push(if value & 1 == 1 { '1' } else { '0' });
        copied += 1;
        value >>= 1;
    }
    while copied == 0 || copied % BYTE_BITS != 0 {
        buf.push('0');
        copied += 1;
    }
    buf.reverse_tail(start);
}

/// Binary rendering of a single value.
pub fn binary_string(bits: u64) -> String {
    let mut buf = MessageBuffer::new();
    push_binary(&mut buf, bits);
    buf.finish()
}

/// Renders through the unbounded [`MessageBuffer`] with the binary dialect.
pub fn render_with_binary(format: &str, args: &[Arg<'_>]) -> Result<String, FormatError> {
    let mut buf = MessageBuffer::new();
    render_into(&mut buf, Dialect::Binary, format, args)?;
    Ok(buf.finish())
}

/// Renders with the standard dialect, keeping at most `SCRATCH_LEN - 1` bytes.
pub fn render_bounded(format: &str, args: &[Arg<'_>]) -> Result<String, FormatError> {
    let mut buf = MessageBuffer::new();
    render_into(&mut buf, Dialect::Standard, format, args)?;
    let mut message = buf.finish();
    truncate_on_boundary(&mut message, SCRATCH_LEN - 1);
    Ok(message)
}

fn truncate_on_boundary(message: &mut String, max: usize) {
    if message.len() <= max {
        return;
    }
    let mut end = max;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    message.truncate(end);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_groups() {
        assert_eq!(binary_string(5), "00000101");
        assert_eq!(binary_string(0), "00000000");
        assert_eq!(binary_string(300), "00000001 00101100");
        assert_eq!(binary_string(255), "11111111");
        assert_eq!(binary_string(256), "00000001 00000000");
    }

    #[test]
    fn test_binary_negative_uses_twos_complement() {
        let rendered = render_with_binary("%b", &args![-1i64]).unwrap();
        assert_eq!(rendered, ["11111111"; 8].join(" "));
    }

    #[test]
    fn test_binary_dialect_message() {
        let rendered = render_with_binary(
            "%b Does not equal %b. (%d Does not equal %d).",
            &args![112u8, 7u64, 112i64, 7i64],
        )
        .unwrap();
        assert_eq!(
            rendered,
            "01110000 Does not equal 00000111. (112 Does not equal 7)."
        );
    }

    #[test]
    fn test_binary_dialect_renders_every_conversion() {
        let rendered =
            render_with_binary("%b|%b|%s|%u", &args![1i64, 2u64, "x", 3u64]).unwrap();
        assert_eq!(rendered, "00000001|00000010|x|3");
    }

    #[test]
    fn test_binary_dialect_rejects_float() {
        let err = render_with_binary("%f", &args![1.0]).unwrap_err();
        assert_eq!(
            err,
            FormatError::UnknownConversion {
                conversion: 'f',
                offset: 1
            }
        );
    }

    #[test]
    fn test_standard_conversions() {
        let rendered = render_bounded(
            "%d %i %u 0x%X 0x%x %f %.3lf '%c' %s %%",
            &args![-4, 9i64, 7u32, 160u8, 255u64, 2.352, 2.356, 'q', true],
        )
        .unwrap();
        assert_eq!(rendered, "-4 9 7 0xA0 0xff 2.352000 2.356 'q' true %");
    }

    #[test]
    fn test_length_modifiers_are_ignored() {
        let rendered = render_bounded("%lu %lld %zu %lf", &args![1u64, -2i64, 3usize, 0.5])
            .unwrap();
        assert_eq!(rendered, "1 -2 3 0.500000");
    }

    #[test]
    fn test_bytes_render_as_hex_list() {
        let rendered = render_bounded("%s", &args![&[1u8, 0xab]]).unwrap();
        assert_eq!(rendered, "[0x01, 0xab]");
    }

    #[test]
    fn test_standard_rejects_binary() {
        assert!(matches!(
            render_bounded("%b", &args![1]),
            Err(FormatError::UnknownConversion { conversion: 'b', .. })
        ));
    }

    #[test]
    fn test_argument_kind_is_checked() {
        let err = render_bounded("%d", &args![1u64]).unwrap_err();
        assert_eq!(
            err,
            FormatError::ArgumentMismatch {
                conversion: 'd',
                index: 0,
                found: ArgKind::U64
            }
        );
        assert_eq!(
            err.to_string(),
            "conversion `%d` cannot render argument 0 (U64)"
        );
    }

    #[test]
    fn test_arity_is_checked() {
        assert_eq!(
            render_bounded("%d and %d", &args![1]),
            Err(FormatError::MissingArgument {
                conversion: 'd',
                index: 1
            })
        );
        assert_eq!(
            render_bounded("no conversions", &args![1, 2]),
            Err(FormatError::UnusedArguments { count: 2 })
        );
        assert_eq!(
            render_bounded("100%", &[]),
            Err(FormatError::DanglingPercent { offset: 3 })
        );
    }

    #[test]
    fn test_bounded_path_truncates() {
        let long = "a".repeat(600);
        let rendered = render_bounded("%s", &args![long.as_str()]).unwrap();
        assert_eq!(rendered.len(), SCRATCH_LEN - 1);
    }

    #[test]
    fn test_bounded_path_truncates_on_char_boundary() {
        let long = "é".repeat(200);
        let rendered = render_bounded("%s", &args![long.as_str()]).unwrap();
        assert_eq!(rendered.len(), 254);
        assert!(rendered.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_binary_path_never_truncates() {
        let long = "b".repeat(600);
        let rendered = render_with_binary("%s %b", &args![long.as_str(), 3]).unwrap();
        assert_eq!(rendered.len(), 600 + 1 + 8);
    }

    #[test]
    fn test_precision_is_bounded() {
        let rendered = render_bounded("%.256f", &args![1.0]).unwrap();
        assert_eq!(rendered.len(), SCRATCH_LEN - 1);

        assert_eq!(
            render_bounded("x %.257f", &args![1.0]),
            Err(FormatError::InvalidPrecision { offset: 2 })
        );
        assert_eq!(
            render_bounded("%.99999999999999999999f", &args![1.0]),
            Err(FormatError::InvalidPrecision { offset: 0 })
        );
    }

    #[test]
    fn test_char_conversion_takes_one_char() {
        assert_eq!(render_bounded("%c", &args!["é"]).unwrap(), "é");
        for text in ["", "ab"] {
            assert_eq!(
                render_bounded("%c", &args![text]),
                Err(FormatError::ArgumentMismatch {
                    conversion: 'c',
                    index: 0,
                    found: ArgKind::Str
                })
            );
        }
    }
}
