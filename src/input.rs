use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};

/// A source that can be either a file or stdin.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub enum FileOrStdin {
    /// Input from a file.
    File(Utf8PathBuf),
    /// Input from stdin.
    #[default]
    Stdin,
}

impl fmt::Display for FileOrStdin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOrStdin::File(path) => write!(f, "{}", path),
            FileOrStdin::Stdin => write!(f, "<stdin>"),
        }
    }
}

impl FileOrStdin {
    /// Create a new FileOrStdin from a path.
    ///
    /// If the path is "-", stdin is used.
    pub fn from_path(path: Utf8PathBuf) -> Self {
        if path.as_str() == "-" {
            FileOrStdin::Stdin
        } else {
            FileOrStdin::File(path)
        }
    }

    /// Open the input source as a reader.
    pub fn reader(&self) -> Result<InputReader> {
        match self {
            FileOrStdin::File(path) => {
                let file =
                    File::open(path).with_context(|| format!("failed to open file: {}", path))?;
                Ok(InputReader::File(file))
            }
            FileOrStdin::Stdin => Ok(InputReader::Stdin(io::stdin())),
        }
    }
}

/// A reader for input from either a file or stdin.
///
/// Unbuffered: the line buffer that consumes it does its own buffering.
pub enum InputReader {
    /// A reader for a file.
    File(File),
    /// A reader for stdin.
    Stdin(io::Stdin),
}

impl Read for InputReader {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            InputReader::File(rdr) => rdr.read(buf),
            InputReader::Stdin(rdr) => rdr.read(buf),
        }
    }
}
