use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::{parse_host, ParseContext, ParseOutcome};

/// First octet of the loopback network, 127.0.0.0/8.
const LOOPBACK_NET: u8 = 127;

/// Render `addr` as `a.b.c.d` and report whether it is a loopback address.
///
/// Octets are taken most significant first and written as plain base-10
/// ASCII without leading zeros.
///
/// # Example
///
/// ```
/// use host_literal::to_canonical_text;
///
/// assert_eq!(to_canonical_text(0x7f00_0001), ("127.0.0.1".to_string(), true));
/// assert_eq!(to_canonical_text(0x0a00_0001), ("10.0.0.1".to_string(), false));
/// ```
pub fn to_canonical_text(addr: u32) -> (String, bool) {
    let octets = addr.to_be_bytes();
    let mut text = String::with_capacity(15);
    let mut buf = itoa::Buffer::new();
    for (i, octet) in octets.iter().enumerate() {
        if i > 0 {
            text.push('.');
        }
        text.push_str(buf.format(*octet));
    }
    (text, octets[0] == LOOPBACK_NET)
}

/// A parsed host literal together with its normalized text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CanonicalHost {
    /// The address as a big-endian 32-bit value.
    address: u32,
    /// The dotted-decimal rendering of `address`.
    text: String,
    /// Whether the first octet is 127.
    #[serde(rename = "loopback")]
    is_loopback: bool,
}

impl CanonicalHost {
    /// Build the canonical form of an already parsed address.
    #[inline]
    #[must_use]
    pub fn from_address(address: u32) -> CanonicalHost {
        let (text, is_loopback) = to_canonical_text(address);
        CanonicalHost {
            address,
            text,
            is_loopback,
        }
    }

    /// Parse a whole string as a host literal in the given context.
    ///
    /// Unlike the span based functions, the literal must cover the entire
    /// string: a terminator that would end the host early (for example the
    /// `/` in `1.2.3.4/x`) is reported as [`Error::TrailingInput`].
    ///
    /// # Example
    ///
    /// ```
    /// use host_literal::{CanonicalHost, ParseContext};
    ///
    /// let host = CanonicalHost::parse_with("0177.1", ParseContext::authority())?;
    /// assert_eq!(host.text(), "127.0.0.1");
    /// assert!(host.is_loopback());
    /// # Ok::<(), host_literal::Error>(())
    /// ```
    pub fn parse_with(s: &str, ctx: ParseContext) -> Result<CanonicalHost> {
        let bytes = s.as_bytes();
        match parse_host(bytes, 0, bytes.len(), ctx) {
            ParseOutcome::Address { addr, end, .. } if end == bytes.len() => {
                Ok(CanonicalHost::from_address(addr))
            }
            ParseOutcome::Address { end, .. } => Err(Error::TrailingInput {
                literal: s.to_string(),
                consumed: end,
            }),
            ParseOutcome::NotAnAddress => Err(Error::NotAnAddress {
                literal: s.to_string(),
            }),
        }
    }

    /// The address as a 32-bit value, most significant octet first.
    #[inline]
    #[must_use]
    pub fn address(&self) -> u32 {
        self.address
    }

    /// The normalized `a.b.c.d` text.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    #[must_use]
    pub fn is_loopback(&self) -> bool {
        self.is_loopback
    }

    #[inline]
    #[must_use]
    pub fn ip(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.address)
    }
}

impl fmt::Display for CanonicalHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<CanonicalHost> for Ipv4Addr {
    fn from(host: CanonicalHost) -> Ipv4Addr {
        host.ip()
    }
}

/// Strict parsing: `"1.2.3.4".parse::<CanonicalHost>()` only accepts the
/// canonical dotted-decimal dialect.
impl FromStr for CanonicalHost {
    type Err = Error;

    fn from_str(s: &str) -> Result<CanonicalHost> {
        CanonicalHost::parse_with(s, ParseContext::new().with_unknown_scheme(true))
    }
}
