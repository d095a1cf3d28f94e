//! Locating URI authority hosts in free text.
//!
//! This is a thin authority splitter, not a URI parser: it finds
//! `scheme://[userinfo@]` prefixes, decides which [`ParseContext`] the host
//! after them lives in, and hands the parser a span bounded by the next
//! character that cannot be part of a URL in running text. The host parser
//! itself decides where the literal stops within that span.

use std::ops::Range;

use bstr::ByteSlice;
use host_literal::ParseContext;
use regex_automata::meta::Regex;
use regex_automata::MatchKind;
use regex_syntax::hir::Hir;

use crate::error::Result;

/// Schemes whose authorities are read with the legacy dialect.
pub const KNOWN_SCHEMES: &[&str] = &[
    "http", "https", "ftp", "ftps", "ws", "wss", "file", "gopher", "news", "nntp", "telnet",
    "ldap", "net.tcp", "net.pipe",
];

/// `scheme://` followed by optional userinfo. Group 1 is the scheme.
static AUTHORITY_PATTERN: &str = r"([A-Za-z][A-Za-z0-9+.\-]*)://(?:[^\s/?#@\[\]]*@)?";

/// A candidate host in a line of text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostSpan {
    /// Where the scheme was found, if the host came from a URL.
    pub scheme: Option<Range<usize>>,
    /// Start of the host and the furthest the literal may extend.
    pub range: Range<usize>,
    /// Context the host is parsed in.
    pub ctx: ParseContext,
}

/// Finds authority hosts in lines of text.
///
/// Build one with [`ScannerBuilder`] and reuse it for every line.
#[derive(Clone, Debug)]
pub struct Scanner {
    regex: Regex,
    known_schemes: Vec<String>,
    ipv6_tails: bool,
}

impl Scanner {
    /// Return every host span found in `line`, left to right.
    pub fn find_iter<'a>(&'a self, line: &'a [u8]) -> impl Iterator<Item = HostSpan> + 'a {
        self.regex.captures_iter(line).filter_map(move |caps| {
            let m = caps.get_match()?;
            let scheme = caps.get_group(1)?.range();
            let start = m.end();
            let bound = line[start..]
                .iter()
                .position(|&b| is_delimiter(b))
                .map_or(line.len(), |n| start + n);

            match line.get(start) {
                Some(b'[') => return self.ipv6_tail(line, scheme, start, bound),
                // Empty authority, as in `file:///etc/hosts`.
                Some(b'/' | b'?' | b'#') | None => return None,
                Some(_) if start == bound => return None,
                Some(_) => {}
            }

            let unknown = !self.is_known(&line[scheme.clone()]);
            let ctx = ParseContext::authority().with_unknown_scheme(unknown);
            Some(HostSpan {
                scheme: Some(scheme),
                range: start..bound,
                ctx,
            })
        })
    }

    /// Whether `scheme` is one of the configured well-known schemes.
    #[inline]
    pub fn is_known(&self, scheme: &[u8]) -> bool {
        self.known_schemes
            .iter()
            .any(|known| known.as_bytes().eq_ignore_ascii_case(scheme))
    }

    /// The dotted tail of a bracketed IPv6 host, e.g. `1.2.3.4` in
    /// `[::ffff:1.2.3.4]`. The span keeps the closing bracket so that the
    /// parser sees it as the terminator.
    fn ipv6_tail(
        &self,
        line: &[u8],
        scheme: Range<usize>,
        open: usize,
        bound: usize,
    ) -> Option<HostSpan> {
        if !self.ipv6_tails {
            return None;
        }
        let close = open + memchr::memchr(b']', &line[open..bound])?;
        let colon = open + memchr::memrchr(b':', &line[open..close])?;
        Some(HostSpan {
            scheme: Some(scheme),
            range: colon + 1..close + 1,
            ctx: ParseContext::authority().with_allow_ipv6(true),
        })
    }
}

/// Bytes that end a URL in running text.
#[inline(always)]
fn is_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace()
        || matches!(b, b'"' | b'\'' | b'<' | b'>' | b'(' | b')' | b'`' | b'{' | b'}' | b'|' | b'^')
}

/// Treat a whole line, minus surrounding whitespace, as one host.
///
/// Returns `None` for a blank line.
pub fn bare_host(line: &[u8], ctx: ParseContext) -> Option<HostSpan> {
    let start = line.len() - line.trim_start().len();
    let end = line.trim_end().len();
    if start >= end {
        return None;
    }
    Some(HostSpan {
        scheme: None,
        range: start..end,
        ctx,
    })
}

/// A builder for configuring authority scanning.
///
/// # Example
///
/// ```
/// use hostlit::scan::ScannerBuilder;
///
/// # fn main() -> hostlit::Result<()> {
/// let scanner = ScannerBuilder::new().scheme("gopher+tls").build()?;
/// let line = b"fetching http://0x7f.1/status";
/// let hosts: Vec<_> = scanner.find_iter(line).collect();
/// assert_eq!(hosts.len(), 1);
/// assert_eq!(&line[hosts[0].range.clone()], b"0x7f.1/status");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ScannerBuilder {
    known_schemes: Vec<String>,
    ipv6_tails: bool,
}

impl Default for ScannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScannerBuilder {
    /// Create a builder that knows [`KNOWN_SCHEMES`] and inspects bracketed
    /// hosts.
    pub fn new() -> Self {
        Self {
            known_schemes: KNOWN_SCHEMES.iter().map(|s| s.to_string()).collect(),
            ipv6_tails: true,
        }
    }

    /// Add a scheme whose hosts are read with the legacy dialect.
    pub fn scheme(&mut self, scheme: &str) -> &mut Self {
        self.known_schemes.push(scheme.to_ascii_lowercase());
        self
    }

    /// Forget every known scheme, so that all hosts are read strictly.
    pub fn clear_schemes(&mut self) -> &mut Self {
        self.known_schemes.clear();
        self
    }

    /// Look for an embedded IPv4 tail in bracketed IPv6 hosts.
    ///
    /// Default: `true`
    pub fn ipv6_tails(&mut self, include: bool) -> &mut Self {
        self.ipv6_tails = include;
        self
    }

    /// Build the scanner.
    pub fn build(&self) -> Result<Scanner> {
        let hir: Hir = regex_syntax::ParserBuilder::new()
            .unicode(false)
            .utf8(false)
            .build()
            .parse(AUTHORITY_PATTERN)?;

        let regex = Regex::builder()
            .configure(
                Regex::config()
                    .auto_prefilter(true)
                    .match_kind(MatchKind::LeftmostFirst),
            )
            .build_from_hir(&hir)?;

        Ok(Scanner {
            regex,
            known_schemes: self.known_schemes.clone(),
            ipv6_tails: self.ipv6_tails,
        })
    }
}
