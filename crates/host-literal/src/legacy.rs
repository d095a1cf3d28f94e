//! The permissive ("non-canonical") host literal dialect.
//!
//! This is the grammar historically accepted by BSD `inet_aton` and most URI
//! stacks: one to four dot-separated components, each of which may be written
//! in decimal, octal (leading `0`) or hexadecimal (leading `0x`/`0X`). When
//! fewer than four components are given, the last one absorbs the bits of the
//! missing ones, so `127.1` is `127.0.0.1` and `2130706433` is too.

/// Upper bound for any component while its digits are being folded in.
const MAX_IPV4: u64 = u32::MAX as u64;

/// Largest value a component may hold when it is closed by a `.`.
const MAX_OCTET: u64 = 0xFF;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Radix {
    Octal,
    #[default]
    Decimal,
    Hex,
}

impl Radix {
    #[inline(always)]
    fn base(self) -> u64 {
        match self {
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hex => 16,
        }
    }

    /// Value of `b` as a digit of this radix, if it is one.
    #[inline(always)]
    fn digit(self, b: u8) -> Option<u64> {
        let v = match (self, b) {
            (Radix::Octal, b'0'..=b'7') => b - b'0',
            (Radix::Decimal | Radix::Hex, b'0'..=b'9') => b - b'0',
            (Radix::Hex, b'a'..=b'f') => b - b'a' + 10,
            (Radix::Hex, b'A'..=b'F') => b - b'A' + 10,
            _ => return None,
        };
        Some(u64::from(v))
    }
}

/// One numeric component being scanned. Reset at every `.`.
#[derive(Clone, Copy, Debug, Default)]
struct Component {
    value: u64,
    radix: Radix,
    saw_digit: bool,
}

impl Component {
    /// Start a component at `*pos`, consuming a `0` or `0x` radix prefix.
    ///
    /// A lone leading `0` already counts as a digit (it is the octal zero),
    /// whereas `0x` still needs at least one hex digit after it.
    #[inline]
    fn open(text: &[u8], pos: &mut usize, limit: usize) -> Component {
        if text[*pos] != b'0' {
            return Component::default();
        }
        *pos += 1;
        if *pos < limit && matches!(text[*pos], b'x' | b'X') {
            *pos += 1;
            return Component {
                radix: Radix::Hex,
                ..Component::default()
            };
        }
        Component {
            radix: Radix::Octal,
            saw_digit: true,
            ..Component::default()
        }
    }

    /// Fold one digit in. Fails as soon as the running value leaves the
    /// 32-bit range, before any further digit can be accumulated.
    #[inline(always)]
    fn fold(&mut self, digit: u64) -> Option<()> {
        self.value = self.value * self.radix.base() + digit;
        if self.value > MAX_IPV4 {
            return None;
        }
        self.saw_digit = true;
        Some(())
    }
}

/// Characters that end a host in a path-like context without failing it.
#[inline(always)]
pub(crate) fn is_host_terminator(b: u8, not_implicit_file: bool) -> bool {
    matches!(b, b'/' | b'\\') || (not_implicit_file && matches!(b, b':' | b'?' | b'#'))
}

/// Parse `text[start..*end]` with the permissive dialect.
///
/// On success the address is returned and `*end` is moved back to the
/// terminator (`/`, `\`, and with `not_implicit_file` also `:`, `?`, `#`)
/// that stopped the scan, or left at the bound if the whole span matched.
/// On failure `None` is returned and `*end` is untouched.
///
/// # Example
///
/// ```
/// use host_literal::parse_legacy;
///
/// let text = b"0x7f.1/index.html";
/// let mut end = text.len();
/// assert_eq!(parse_legacy(text, 0, &mut end, true), Some(0x7f00_0001));
/// assert_eq!(end, 6);
/// ```
pub fn parse_legacy(text: &[u8], start: usize, end: &mut usize, not_implicit_file: bool) -> Option<u32> {
    let limit = (*end).min(text.len());
    let mut parts = [0u64; 4];
    let mut dots = 0;
    let mut pos = start;
    let mut comp = Component::default();

    while pos < limit {
        comp = Component::open(text, &mut pos, limit);

        while pos < limit {
            let Some(digit) = comp.radix.digit(text[pos]) else {
                break;
            };
            comp.fold(digit)?;
            pos += 1;
        }

        if pos < limit && text[pos] == b'.' {
            // Only the last component may exceed one octet, and at most
            // four components are allowed.
            if dots >= 3 || !comp.saw_digit || comp.value > MAX_OCTET {
                return None;
            }
            parts[dots] = comp.value;
            dots += 1;
            pos += 1;
            comp = Component::default();
            continue;
        }
        break;
    }

    // Empty trailing component, e.g. `1.2.3.` or `0x`.
    if !comp.saw_digit {
        return None;
    }
    if pos < limit && !is_host_terminator(text[pos], not_implicit_file) {
        return None;
    }
    parts[dots] = comp.value;

    let addr = combine(&parts, dots)?;
    *end = pos;
    Some(addr)
}

/// Reassemble the recorded components, letting the last one absorb the
/// bits of any missing ones.
#[inline]
fn combine(parts: &[u64; 4], dots: usize) -> Option<u32> {
    let [a, b, c, d] = *parts;
    let addr = match dots {
        0 => a,
        1 if b <= 0xFF_FFFF => (a << 24) | (b & 0xFF_FFFF),
        2 if c <= 0xFFFF => (a << 24) | ((b & 0xFF) << 16) | (c & 0xFFFF),
        3 if d <= 0xFF => (a << 24) | ((b & 0xFF) << 16) | ((c & 0xFF) << 8) | (d & 0xFF),
        _ => return None,
    };
    u32::try_from(addr).ok()
}
