//! Numeric IPv4 host literal parsing for URI authorities.
//!
//! `host-literal` decides whether the host part of an authority is an IPv4
//! address, and if so which address. Two textual dialects exist and they do
//! not agree with each other:
//!
//! - **Canonical**: exactly four decimal octets, no ambiguous leading zeros
//!   (`192.168.0.1`).
//! - **Legacy**: one to four components, each decimal, octal (`0` prefix) or
//!   hexadecimal (`0x` prefix), with the last component absorbing missing
//!   ones (`0300.0250.1`, `0xc0a80001`, `3232235521`).
//!
//! The same text can mean different addresses, or an address and a DNS name,
//! depending on the dialect. A check that validates a host against one
//! dialect while the connecting code reads it with the other is a classic
//! host allow-list bypass, so the dialect is selected in exactly one place,
//! [`parse_host`], from an explicit [`ParseContext`].
//!
//! ## Quick Start
//!
//! ```
//! use host_literal::{parse_host, Dialect, ParseContext, ParseOutcome};
//!
//! let text = b"0x7f.0.0.1:8080";
//! let ctx = ParseContext::authority();
//!
//! match parse_host(text, 0, text.len(), ctx) {
//!     ParseOutcome::Address { addr, end, dialect } => {
//!         assert_eq!(addr, 0x7f00_0001);
//!         assert_eq!(end, 10);
//!         assert_eq!(dialect, Dialect::Legacy);
//!     }
//!     ParseOutcome::NotAnAddress => unreachable!(),
//! }
//! ```
//!
//! ## Spans
//!
//! Every parser works on `text[start..end]` of a byte slice and never looks
//! outside it. Bounds past the end of `text` are clamped, and an empty span
//! is never an address. When a parser accepts a literal that is followed by
//! a path, query or port delimiter, it reports a shorter `end` so that the
//! caller can continue with the rest of the authority. A rejected span leaves
//! `end` as it was.
//!
//! All functions are pure: no allocation (except for the rendered text of a
//! [`CanonicalHost`]), no I/O and no shared state.

use serde::Serialize;
use std::fmt;

mod canonical;
pub mod error;
mod legacy;
mod text;

pub use canonical::{extract_canonical, is_valid_canonical};
pub use error::{Error, Result};
pub use legacy::parse_legacy;
pub use text::{to_canonical_text, CanonicalHost};

/// Caller supplied flags that pick the dialect and the early terminators.
///
/// The default is the most permissive context: legacy dialect, with only
/// `/` and `\` ending a host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ParseContext {
    /// The literal sits inside (or next to) IPv6 bracket syntax. Forces the
    /// canonical dialect and makes `]`, `/` and `%` terminators.
    pub allow_ipv6: bool,
    /// The host belongs to a URI authority rather than an implicit file
    /// path, so `:`, `?` and `#` also end it.
    pub not_implicit_file: bool,
    /// The scheme is not one whose host syntax is trusted. Forces the
    /// canonical dialect.
    pub unknown_scheme: bool,
}

impl ParseContext {
    /// The all-false context.
    #[inline]
    #[must_use]
    pub const fn new() -> ParseContext {
        ParseContext {
            allow_ipv6: false,
            not_implicit_file: false,
            unknown_scheme: false,
        }
    }

    /// The context for the authority of a URI with a well-known scheme.
    #[inline]
    #[must_use]
    pub const fn authority() -> ParseContext {
        ParseContext {
            allow_ipv6: false,
            not_implicit_file: true,
            unknown_scheme: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_allow_ipv6(mut self, yes: bool) -> ParseContext {
        self.allow_ipv6 = yes;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_not_implicit_file(mut self, yes: bool) -> ParseContext {
        self.not_implicit_file = yes;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_unknown_scheme(mut self, yes: bool) -> ParseContext {
        self.unknown_scheme = yes;
        self
    }

    /// Whether `b` ends a host in this context: `]`, `/` and `%` next to
    /// IPv6 syntax, otherwise `/`, `\` and, outside implicit file paths,
    /// `:`, `?` and `#`.
    ///
    /// ```
    /// use host_literal::ParseContext;
    ///
    /// assert!(ParseContext::authority().is_terminator(b':'));
    /// assert!(!ParseContext::new().is_terminator(b':'));
    /// assert!(ParseContext::new().with_allow_ipv6(true).is_terminator(b']'));
    /// ```
    #[inline]
    #[must_use]
    pub fn is_terminator(&self, b: u8) -> bool {
        canonical::is_stop(b, self.allow_ipv6, self.not_implicit_file)
    }

    /// The dialect [`parse_host`] will use in this context.
    #[inline]
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        if self.allow_ipv6 || self.unknown_scheme {
            Dialect::Canonical
        } else {
            Dialect::Legacy
        }
    }
}

/// The grammar that produced (or rejected) an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Strict dotted-decimal, see [`is_valid_canonical`].
    Canonical,
    /// Permissive 1-4 component form, see [`parse_legacy`].
    Legacy,
}

impl Dialect {
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Canonical => "canonical",
            Dialect::Legacy => "legacy",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of [`parse_host`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The span starts with an IPv4 literal.
    Address {
        /// The address, most significant octet first.
        addr: u32,
        /// Where the literal stopped; never past the requested end.
        end: usize,
        dialect: Dialect,
    },
    /// Not an IPv4 literal in the selected dialect. The caller will usually
    /// treat the host as a DNS name instead.
    NotAnAddress,
}

impl ParseOutcome {
    #[inline]
    #[must_use]
    pub fn is_address(&self) -> bool {
        matches!(self, ParseOutcome::Address { .. })
    }

    #[inline]
    #[must_use]
    pub fn address(&self) -> Option<u32> {
        match *self {
            ParseOutcome::Address { addr, .. } => Some(addr),
            ParseOutcome::NotAnAddress => None,
        }
    }

    /// The (possibly shortened) end of the literal.
    #[inline]
    #[must_use]
    pub fn end(&self) -> Option<usize> {
        match *self {
            ParseOutcome::Address { end, .. } => Some(end),
            ParseOutcome::NotAnAddress => None,
        }
    }
}

/// Check whether `text[start..*end]` is an IPv4 host in context `ctx`.
///
/// IPv6-adjacent hosts and hosts of unknown schemes must be canonical;
/// everything else is read with the legacy dialect. On success `*end` is
/// moved back to where the literal stopped.
///
/// # Example
///
/// ```
/// use host_literal::{is_valid_host, ParseContext};
///
/// let text = b"0177.0.0.1/admin";
/// let mut end = text.len();
/// assert!(is_valid_host(text, 0, &mut end, ParseContext::authority()));
/// assert_eq!(end, 10);
///
/// let strict = ParseContext::authority().with_unknown_scheme(true);
/// let mut end = text.len();
/// assert!(!is_valid_host(text, 0, &mut end, strict));
/// ```
#[inline]
pub fn is_valid_host(text: &[u8], start: usize, end: &mut usize, ctx: ParseContext) -> bool {
    match ctx.dialect() {
        Dialect::Canonical => {
            is_valid_canonical(text, start, end, ctx.allow_ipv6, ctx.not_implicit_file)
        }
        Dialect::Legacy => parse_legacy(text, start, end, ctx.not_implicit_file).is_some(),
    }
}

/// Parse `text[start..end]` with the dialect selected by `ctx` and return
/// the address it denotes.
///
/// Accepts exactly what [`is_valid_host`] accepts. In the canonical dialect
/// the octets are extracted from the validated span; in the legacy dialect
/// the combined component value is the address.
pub fn parse_host(text: &[u8], start: usize, end: usize, ctx: ParseContext) -> ParseOutcome {
    let mut stop = end;
    let dialect = ctx.dialect();
    let addr = match dialect {
        Dialect::Canonical => {
            if !is_valid_canonical(text, start, &mut stop, ctx.allow_ipv6, ctx.not_implicit_file)
            {
                return ParseOutcome::NotAnAddress;
            }
            u32::from_be_bytes(extract_canonical(text, start, stop))
        }
        Dialect::Legacy => match parse_legacy(text, start, &mut stop, ctx.not_implicit_file) {
            Some(addr) => addr,
            None => return ParseOutcome::NotAnAddress,
        },
    };
    ParseOutcome::Address {
        addr,
        end: stop,
        dialect,
    }
}

/// Parse a host span and render its normalized text and loopback flag.
///
/// The address comes from [`parse_host`], so the dialect that accepted the
/// host is also the one that decides what it means.
///
/// # Example
///
/// ```
/// use host_literal::{canonicalize_host, ParseContext};
///
/// let host = canonicalize_host(b"2130706433", 0, 10, ParseContext::authority()).unwrap();
/// assert_eq!(host.text(), "127.0.0.1");
/// assert!(host.is_loopback());
/// ```
pub fn canonicalize_host(
    text: &[u8],
    start: usize,
    end: usize,
    ctx: ParseContext,
) -> Option<CanonicalHost> {
    parse_host(text, start, end, ctx)
        .address()
        .map(CanonicalHost::from_address)
}
