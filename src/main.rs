use anyhow::{Error, Result};
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use ripline::{
    line_buffer::{LineBufferBuilder, LineBufferReader},
    lines::LineIter,
};
use rustc_hash::FxHashMap as HashMap;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use termcolor::{ColorChoice, StandardStream};
use tracing::{debug, warn};

use hostlit::input::FileOrStdin;
use hostlit::{bare_host, logging, template, Decorator, HostReport, HostSpan, ParseContext};
use hostlit::{Scanner, ScannerBuilder};

/// Upper bound on cached decorations.
const CACHE_LIMIT: usize = 100_000;

/// Check if the error chain contains a broken pipe error.
#[inline(always)]
fn is_broken_pipe(err: &Error) -> bool {
    for cause in err.chain() {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::BrokenPipe {
                return true;
            }
        }
    }
    false
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Show only the decorations of numeric hosts, one per line
    #[clap(short, long)]
    only_matching: bool,

    /// Use markers to highlight the decorations
    #[clap(short = 'C', long, value_enum, default_value_t = ArgsColorChoice::Auto)]
    color: ArgsColorChoice,

    /// Specify the format of the host decoration. Use the --list-templates option
    /// to see which fields are available. Field names are enclosed in {}, for example
    /// "{host} is {ip} ({notes})"
    #[clap(short, long, env = "HOSTLIT_TEMPLATE")]
    template: Option<String>,

    /// Output one JSON object per numeric host instead of decorating
    #[clap(long, conflicts_with_all = &["only_matching", "template"])]
    json: bool,

    /// Treat every input line as a single host instead of scanning for URLs
    #[clap(long)]
    bare: bool,

    /// Only report hosts that the legacy and canonical dialects read differently
    #[clap(long)]
    ambiguous_only: bool,

    /// Bare hosts sit inside IPv6 brackets (canonical dialect, `]`/`%` terminators)
    #[clap(long, requires = "bare")]
    ipv6_context: bool,

    /// Bare hosts belong to a scheme whose host syntax is not trusted (canonical dialect)
    #[clap(long, requires = "bare")]
    unknown_scheme: bool,

    /// Bare hosts are implicit file paths: `:`, `?` and `#` do not end the host
    #[clap(long, requires = "bare")]
    implicit_file: bool,

    /// Additional URL scheme to read with the legacy dialect (repeatable)
    #[clap(long = "scheme", value_name = "SCHEME")]
    schemes: Vec<String>,

    /// Display a list of available template substitution parameters to
    /// use in --template format string
    #[clap(short = 'L', long)]
    list_templates: bool,

    /// Input file(s) to process. Leave empty or use "-" to read from stdin
    #[clap(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    input: Vec<Utf8PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum ArgsColorChoice {
    Always,
    Never,
    Auto,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum OutputMode {
    Inline,
    OnlyMatching,
    Json,
}

impl Args {
    fn bare_context(&self) -> ParseContext {
        ParseContext::new()
            .with_allow_ipv6(self.ipv6_context)
            .with_not_implicit_file(!self.implicit_file)
            .with_unknown_scheme(self.unknown_scheme)
    }

    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.only_matching {
            OutputMode::OnlyMatching
        } else {
            OutputMode::Inline
        }
    }
}

fn main() -> ExitCode {
    let err = match run_main() {
        Ok(code) => return code,
        Err(err) => err,
    };

    if is_broken_pipe(&err) {
        return ExitCode::SUCCESS;
    }

    // Print detailed error information based on environment variables
    if std::env::var("RUST_BACKTRACE").is_ok_and(|v| v == "1")
        && std::env::var("RUST_LIB_BACKTRACE").map_or(true, |v| v == "1")
    {
        let _ = writeln!(io::stderr(), "{:?}", err);
    } else {
        let _ = writeln!(io::stderr(), "{:#}", err);
    }

    ExitCode::FAILURE
}

fn run_main() -> Result<ExitCode> {
    let mut args = Args::parse();
    logging::init_logging();

    if args.list_templates {
        println!("Available template fields:");
        for field in template::FIELDS {
            println!(
                "{{{}}}\t{}\t(example: {})",
                field.name, field.description, field.example
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    // if no files specified, add stdin
    if args.input.is_empty() {
        args.input.push(Utf8PathBuf::from("-"));
    }

    // auto colours only when stdout is a tty
    let colormode = match args.color {
        ArgsColorChoice::Auto => {
            if io::stdout().is_terminal() {
                ColorChoice::Always
            } else {
                ColorChoice::Never
            }
        }
        ArgsColorChoice::Always => ColorChoice::Always,
        ArgsColorChoice::Never => ColorChoice::Never,
    };

    run(args, colormode)?;

    Ok(ExitCode::SUCCESS)
}

/// Where host spans come from for each line.
enum Source {
    Urls(Scanner),
    Bare(ParseContext),
}

impl Source {
    fn spans(&self, line: &[u8]) -> Vec<HostSpan> {
        match self {
            Source::Urls(scanner) => scanner.find_iter(line).collect(),
            Source::Bare(ctx) => bare_host(line, *ctx).into_iter().collect(),
        }
    }
}

/// A host worth reporting: either dialect reads it as an address, and it
/// passes the ambiguity filter.
#[inline]
fn wanted(report: &HostReport, ambiguous_only: bool) -> bool {
    report.is_numeric() && (!ambiguous_only || report.is_ambiguous())
}

fn classify(line: &[u8], span: &HostSpan) -> HostReport {
    let report = HostReport::new(line, span);
    if report.is_ambiguous() {
        warn!(
            host = report.host(),
            legacy = report.legacy().unwrap_or("-"),
            canonical = report.canonical().unwrap_or("-"),
            "host literal reads differently in the legacy and canonical dialects"
        );
    } else {
        debug!(host = report.host(), dialect = %report.dialect(), "classified host");
    }
    report
}

fn run(args: Args, colormode: ColorChoice) -> Result<()> {
    let source = if args.bare {
        Source::Bare(args.bare_context())
    } else {
        let mut builder = ScannerBuilder::new();
        for scheme in &args.schemes {
            builder.scheme(scheme);
        }
        Source::Urls(builder.build()?)
    };
    let decorator = Decorator::new(args.template.as_deref(), colormode)?;
    let mode = args.output_mode();
    let ambiguous_only = args.ambiguous_only;

    let mut out = io::BufWriter::with_capacity(65536, StandardStream::stdout(colormode));

    // Decorations keyed by the bounded host bytes and their context. The
    // value holds the literal's length and its decoration, if reported.
    let mut cache: HashMap<(Vec<u8>, ParseContext), (usize, Option<String>)> =
        HashMap::with_capacity_and_hasher(4096, Default::default());
    let mut line_buffer = LineBufferBuilder::new().capacity(65536).build();

    for path in args.input {
        let file = FileOrStdin::from_path(path);
        debug!(input = %file, "reading");
        let reader = file.reader()?;
        let mut lb_reader = LineBufferReader::new(reader, &mut line_buffer);

        while lb_reader.fill()? {
            let buffer = lb_reader.buffer();
            let lines = LineIter::new(b'\n', buffer);

            for line in lines {
                let spans = source.spans(line);

                if mode == OutputMode::Json {
                    for span in &spans {
                        let report = classify(line, span);
                        if wanted(&report, ambiguous_only) {
                            report.write_json(&mut out)?;
                            out.write_all(b"\n")?;
                        }
                    }
                    continue;
                }

                let mut last_pos = 0;
                for span in &spans {
                    // a scheme-like run inside a literal already written out
                    if span.range.start < last_pos {
                        continue;
                    }
                    let key = (line[span.range.clone()].to_vec(), span.ctx);
                    let (len, decoration) = match cache.get(&key) {
                        Some(hit) => hit.clone(),
                        None => {
                            let report = classify(line, span);
                            let entry = (
                                report.range().len(),
                                wanted(&report, ambiguous_only)
                                    .then(|| decorator.decorate(&report)),
                            );
                            if cache.len() < CACHE_LIMIT {
                                cache.insert(key, entry.clone());
                            }
                            entry
                        }
                    };
                    let Some(decoration) = decoration else {
                        continue;
                    };

                    if mode == OutputMode::OnlyMatching {
                        out.write_all(decoration.as_bytes())?;
                        out.write_all(b"\n")?;
                    } else {
                        let start = span.range.start;
                        out.write_all(&line[last_pos..start])?;
                        out.write_all(decoration.as_bytes())?;
                        last_pos = start + len;
                    }
                }
                if mode == OutputMode::Inline {
                    out.write_all(&line[last_pos..])?;
                }
            }
            lb_reader.consume_all();
        }
        out.flush()?;
    }

    Ok(())
}
