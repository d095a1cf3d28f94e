//! The strict dotted-decimal dialect.
//!
//! Exactly four decimal octets, each in `0..=255`, and no leading zero unless
//! the octet is a lone `0`. Refusing `010` outright (rather than reading it
//! as ten) is what keeps this dialect from disagreeing with the permissive
//! one, which would read the same text as octal eight.

use crate::legacy::is_host_terminator;

/// Per-segment state of the strict scanner.
#[derive(Clone, Copy, Debug, Default)]
struct Segment {
    value: u16,
    started: bool,
    leading_zero: bool,
}

impl Segment {
    /// A segment is complete when it has digits and its only leading zero,
    /// if any, is the whole segment.
    #[inline(always)]
    fn is_complete(&self) -> bool {
        self.started && !(self.leading_zero && self.value > 0)
    }
}

#[inline(always)]
pub(crate) fn is_stop(b: u8, allow_ipv6: bool, not_implicit_file: bool) -> bool {
    if allow_ipv6 {
        // Embedded in an IPv6 literal: scope id, prefix length or the bracket.
        matches!(b, b']' | b'/' | b'%')
    } else {
        is_host_terminator(b, not_implicit_file)
    }
}

/// Validate `text[start..*end]` as a strict dotted-decimal literal.
///
/// The scan stops early, without failing, at `]`, `/` and `%` when
/// `allow_ipv6` is set, and otherwise at `/`, `\` and, with
/// `not_implicit_file`, `:`, `?` and `#`. On success `*end` is set to the
/// position just past the last digit scanned.
///
/// # Example
///
/// ```
/// use host_literal::is_valid_canonical;
///
/// let mut end = 9;
/// assert!(is_valid_canonical(b"10.0.0.1]", 0, &mut end, true, false));
/// assert_eq!(end, 8);
///
/// let mut end = 9;
/// assert!(!is_valid_canonical(b"010.0.0.1", 0, &mut end, false, false));
/// ```
pub fn is_valid_canonical(
    text: &[u8],
    start: usize,
    end: &mut usize,
    allow_ipv6: bool,
    not_implicit_file: bool,
) -> bool {
    let limit = (*end).min(text.len());
    let mut dots = 0;
    let mut seg = Segment::default();
    let mut pos = start;

    while pos < limit {
        let b = text[pos];
        if is_stop(b, allow_ipv6, not_implicit_file) {
            break;
        }
        match b {
            b'0'..=b'9' => {
                if !seg.started && b == b'0' {
                    if pos + 1 < limit && text[pos + 1] == b'0' {
                        return false;
                    }
                    seg.leading_zero = true;
                }
                seg.started = true;
                seg.value = seg.value * 10 + u16::from(b - b'0');
                if seg.value > 255 {
                    return false;
                }
            }
            b'.' => {
                if !seg.is_complete() {
                    return false;
                }
                dots += 1;
                seg = Segment::default();
            }
            _ => return false,
        }
        pos += 1;
    }

    if dots != 3 || !seg.is_complete() {
        return false;
    }
    *end = pos;
    true
}

/// Split an already validated literal into its four octets.
///
/// Segments end at `.` or `:`. Nothing is re-validated here: digits are
/// folded with wrapping arithmetic and truncated to a byte, and missing
/// segments read as zero. Call this only on spans that passed
/// [`is_valid_canonical`].
///
/// # Example
///
/// ```
/// use host_literal::extract_canonical;
///
/// assert_eq!(extract_canonical(b"192.168.0.1:8080", 0, 16), [192, 168, 0, 1]);
/// ```
pub fn extract_canonical(text: &[u8], start: usize, end: usize) -> [u8; 4] {
    let limit = end.min(text.len());
    let mut octets = [0u8; 4];
    let mut pos = start;

    for octet in &mut octets {
        let mut acc = 0u32;
        while pos < limit && !matches!(text[pos], b'.' | b':') {
            acc = acc
                .wrapping_mul(10)
                .wrapping_add(u32::from(text[pos].wrapping_sub(b'0')));
            pos += 1;
        }
        *octet = acc as u8;
        if pos >= limit {
            break;
        }
        pos += 1;
    }
    octets
}
