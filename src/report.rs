use serde::Serialize;
use std::io::{self, Write};
use std::ops::Range;

use host_literal::{
    extract_canonical, is_valid_canonical, parse_host, parse_legacy, to_canonical_text,
    CanonicalHost, Dialect, ParseContext, ParseOutcome,
};

use crate::scan::HostSpan;

/// How one host span reads under the context's dialect and under each
/// dialect on its own.
#[derive(Clone, Debug, Serialize)]
pub struct HostReport {
    /// The host text, up to where the literal stopped.
    host: String,
    /// The URL scheme the host was found under, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    scheme: Option<String>,
    /// Byte range of `host` in the line.
    range: Range<usize>,
    context: ParseContext,
    /// The dialect the context selects.
    dialect: Dialect,
    /// The address the context's dialect produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<CanonicalHost>,
    /// Reading under the legacy dialect, regardless of context.
    legacy: Option<String>,
    /// Reading under the canonical dialect, regardless of context.
    canonical: Option<String>,
    /// The two dialects disagree about this host.
    ambiguous: bool,
}

impl HostReport {
    /// Classify the host at `span` in `line`.
    pub fn new(line: &[u8], span: &HostSpan) -> HostReport {
        let HostSpan { scheme, range, ctx } = span;
        let ctx = *ctx;
        let start = range.start;

        let outcome = parse_host(line, start, range.end, ctx);

        let mut legacy_end = range.end;
        let legacy = parse_legacy(line, start, &mut legacy_end, ctx.not_implicit_file);

        let mut strict_end = range.end;
        let strict = is_valid_canonical(
            line,
            start,
            &mut strict_end,
            ctx.allow_ipv6,
            ctx.not_implicit_file,
        )
        .then(|| u32::from_be_bytes(extract_canonical(line, start, strict_end)));

        // Inside IPv6 brackets only the canonical dialect can apply at all.
        let ambiguous = !ctx.allow_ipv6 && legacy != strict;

        let end = match outcome {
            ParseOutcome::Address { end, .. } => end,
            ParseOutcome::NotAnAddress if legacy.is_some() => legacy_end,
            ParseOutcome::NotAnAddress if strict.is_some() => strict_end,
            // A name: stop where the authority's host ends.
            ParseOutcome::NotAnAddress => line[start..range.end]
                .iter()
                .position(|&b| ctx.is_terminator(b))
                .map_or(range.end, |n| start + n),
        };

        HostReport {
            host: String::from_utf8_lossy(&line[start..end]).into_owned(),
            scheme: scheme
                .as_ref()
                .map(|s| String::from_utf8_lossy(&line[s.clone()]).into_owned()),
            range: start..end,
            context: ctx,
            dialect: ctx.dialect(),
            address: outcome.address().map(CanonicalHost::from_address),
            legacy: legacy.map(|addr| to_canonical_text(addr).0),
            canonical: strict.map(|addr| to_canonical_text(addr).0),
            ambiguous,
        }
    }

    /// Whether either dialect reads the host as an address.
    #[inline]
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.legacy.is_some() || self.canonical.is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.ambiguous
    }

    #[inline]
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    #[must_use]
    pub fn range(&self) -> &Range<usize> {
        &self.range
    }

    #[inline]
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[inline]
    #[must_use]
    pub fn address(&self) -> Option<&CanonicalHost> {
        self.address.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn legacy(&self) -> Option<&str> {
        self.legacy.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn canonical(&self) -> Option<&str> {
        self.canonical.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Comma separated notes about the host: `loopback`, `ambiguous`.
    #[must_use]
    pub fn notes(&self) -> String {
        let mut notes = Vec::with_capacity(2);
        if self.address.as_ref().is_some_and(CanonicalHost::is_loopback) {
            notes.push("loopback");
        }
        if self.ambiguous {
            notes.push("ambiguous");
        }
        notes.join(",")
    }

    /// Write the report as one JSON object.
    #[inline]
    pub fn write_json<W: Write + ?Sized>(&self, wtr: &mut W) -> io::Result<()> {
        serde_json::to_writer(wtr, self)?;
        Ok(())
    }
}
