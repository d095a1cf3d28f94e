use std::fmt;

use termcolor::ColorChoice;

use crate::error::{Error, Result};
use crate::report::HostReport;

/// Decoration used when no `--template` is given.
pub const DEFAULT_TEMPLATE: &str = "<{host}|{ip}|{dialect}|{notes}>";

/// A field that can be referenced in a decoration template.
#[derive(Clone, Copy, Debug)]
pub struct TemplateField {
    pub name: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

/// Every field a template may reference.
pub const FIELDS: &[TemplateField] = &[
    TemplateField {
        name: "host",
        description: "The host literal as written",
        example: "0x7f.1",
    },
    TemplateField {
        name: "ip",
        description: "Dotted-decimal address under the context's dialect, empty if rejected",
        example: "127.0.0.1",
    },
    TemplateField {
        name: "dialect",
        description: "Dialect selected by the context: legacy or canonical",
        example: "legacy",
    },
    TemplateField {
        name: "scheme",
        description: "URL scheme the host was found under, empty for bare hosts",
        example: "http",
    },
    TemplateField {
        name: "legacy",
        description: "Address under the legacy dialect, empty if rejected",
        example: "127.0.0.1",
    },
    TemplateField {
        name: "canonical",
        description: "Address under the canonical dialect, empty if rejected",
        example: "",
    },
    TemplateField {
        name: "notes",
        description: "Comma separated notes: loopback, ambiguous",
        example: "loopback,ambiguous",
    },
];

/// A pre-compiled decoration template.
///
/// Templates use `{field_name}` syntax for field references and `{{`/`}}`
/// for literal braces. The template is split once into literal and field
/// segments; rendering is a single left-to-right pass, so a field value is
/// never itself expanded.
#[derive(Clone, Debug)]
pub struct Template {
    parts: Vec<TemplatePart>,
    /// Pre-computed estimate of output size for allocation.
    estimated_size: usize,
}

#[derive(Clone, Debug)]
enum TemplatePart {
    Literal(String),
    Field(&'static str),
}

impl Template {
    /// Compile a template string.
    ///
    /// An unclosed `{` is treated as a literal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTemplate`] for an empty field name (`{}`) and
    /// [`Error::UnknownField`] for a name not listed in [`FIELDS`].
    pub fn compile(template: &str) -> Result<Template> {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut estimated_size = 0;
        let bytes = template.as_bytes();
        let len = bytes.len();
        let mut i = 0;

        while i < len {
            match bytes[i] {
                b'{' if i + 1 < len && bytes[i + 1] == b'{' => {
                    literal.push('{');
                    i += 2;
                }
                b'{' => {
                    let Some(close) = template[i + 1..].find('}') else {
                        literal.push('{');
                        i += 1;
                        continue;
                    };
                    let name = &template[i + 1..i + 1 + close];
                    if name.is_empty() {
                        return Err(Error::InvalidTemplate {
                            reason: format!("empty field name at byte {}", i),
                        });
                    }
                    let field = FIELDS
                        .iter()
                        .find(|f| f.name == name)
                        .ok_or_else(|| Error::UnknownField {
                            name: name.to_string(),
                        })?;
                    if !literal.is_empty() {
                        estimated_size += literal.len();
                        parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
                    }
                    estimated_size += 16;
                    parts.push(TemplatePart::Field(field.name));
                    i += close + 2;
                }
                b'}' if i + 1 < len && bytes[i + 1] == b'}' => {
                    literal.push('}');
                    i += 2;
                }
                _ => {
                    // Copy the whole UTF-8 sequence, not just its first byte.
                    let ch = template[i..].chars().next().unwrap_or_default();
                    literal.push(ch);
                    i += ch.len_utf8().max(1);
                }
            }
        }

        if !literal.is_empty() {
            estimated_size += literal.len();
            parts.push(TemplatePart::Literal(literal));
        }

        Ok(Template {
            parts,
            estimated_size,
        })
    }

    /// Render the template using a closure to look up field values.
    #[inline]
    pub fn render<'a>(&self, mut lookup: impl FnMut(&str) -> &'a str) -> String {
        let mut output = String::with_capacity(self.estimated_size);
        for part in &self.parts {
            match part {
                TemplatePart::Literal(s) => output.push_str(s),
                TemplatePart::Field(name) => output.push_str(lookup(name)),
            }
        }
        output
    }

    /// Names of the fields referenced in this template, in order.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                TemplatePart::Field(name) => Some(*name),
                TemplatePart::Literal(_) => None,
            })
            .collect()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part {
                TemplatePart::Literal(s) => {
                    write!(f, "{}", s.replace('{', "{{").replace('}', "}}"))?
                }
                TemplatePart::Field(name) => write!(f, "{{{name}}}")?,
            }
        }
        Ok(())
    }
}

/// Renders host reports through a template, optionally in colour.
#[derive(Clone, Debug)]
pub struct Decorator {
    template: Template,
    color: ColorChoice,
}

impl Decorator {
    pub fn new(template: Option<&str>, color: ColorChoice) -> Result<Decorator> {
        let template = Template::compile(template.unwrap_or(DEFAULT_TEMPLATE))?;
        Ok(Decorator { template, color })
    }

    /// Render the decoration for one report.
    pub fn decorate(&self, report: &HostReport) -> String {
        let ip = report.address().map(|a| a.text()).unwrap_or("");
        let notes = report.notes();
        let rendered = self.template.render(|name| match name {
            "host" => report.host(),
            "ip" => ip,
            "dialect" => report.dialect().as_str(),
            "scheme" => report.scheme().unwrap_or(""),
            "legacy" => report.legacy().unwrap_or(""),
            "canonical" => report.canonical().unwrap_or(""),
            "notes" => &notes,
            _ => "",
        });
        if self.color == ColorChoice::Always {
            // bookend the decoration with ansi red escapes
            format!("\x1b[1;31m{}\x1b[0;0m", rendered)
        } else {
            rendered
        }
    }
}
