//! The hostlit library: find the hosts of URLs in text and show how each
//! numeric host reads under the strict and the legacy IPv4 dialects.
//!
//! Parsing itself lives in the [`host_literal`] crate. This crate adds the
//! pieces a log or config scanner needs around it: locating authorities in
//! free text, comparing the two dialects for every host, and rendering the
//! result inline, as a one-per-line list or as JSON.
//!
//! # Examples
//!
//! Flag hosts that an allow-list and an HTTP client would read differently:
//!
//! ```rust
//! use hostlit::{HostReport, ScannerBuilder};
//!
//! # fn main() -> hostlit::Result<()> {
//! let scanner = ScannerBuilder::new().build()?;
//! let line = b"GET http://0177.0.0.1:8080/admin from 10.2.3.4";
//!
//! let ambiguous: Vec<_> = scanner
//!     .find_iter(line)
//!     .map(|span| HostReport::new(line, &span))
//!     .filter(HostReport::is_ambiguous)
//!     .collect();
//!
//! assert_eq!(ambiguous.len(), 1);
//! assert_eq!(ambiguous[0].host(), "0177.0.0.1");
//! assert_eq!(ambiguous[0].legacy(), Some("127.0.0.1"));
//! assert_eq!(ambiguous[0].canonical(), None);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod input;
pub mod logging;
pub mod report;
pub mod scan;
pub mod template;

pub use crate::error::{Error, Result};
pub use crate::report::HostReport;
pub use crate::scan::{bare_host, HostSpan, Scanner, ScannerBuilder};
pub use crate::template::{Decorator, Template, TemplateField};
pub use host_literal::{CanonicalHost, Dialect, ParseContext};
