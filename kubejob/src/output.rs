//! Printing objects in the format requested with `-o`.

use handlebars::Handlebars;
use kubejob_common::prelude::*;
use std::str::FromStr;

/// Output formats accepted by `-o`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    /// No `-o` flag: print a human-readable success message.
    Default,
    /// `-o name`: print just `kind/name`.
    Name,
    /// `-o json`: print the whole object as JSON.
    Json,
    /// `-o yaml`: print the whole object as YAML.
    Yaml,
    /// `-o template=TEMPLATE`: render the object using a [Handlebars][]
    /// template.
    ///
    /// [Handlebars]: https://handlebarsjs.com/
    Template(String),
}

impl OutputFormat {
    /// Should we print a success message instead of the whole object?
    pub fn is_short(&self) -> bool {
        matches!(self, OutputFormat::Default | OutputFormat::Name)
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Ok(OutputFormat::Default),
            "name" => Ok(OutputFormat::Name),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ if s.starts_with("template=") => {
                Ok(OutputFormat::Template(s["template=".len()..].to_owned()))
            }
            _ => Err(format_err!(
                "unable to match a printer suitable for the output format {:?}, \
                 allowed formats are: json,name,template=TEMPLATE,yaml",
                s,
            )),
        }
    }
}

/// Report that we performed `operation` on the object `kind/name`.
pub fn print_success(
    format: &OutputFormat,
    out: &mut dyn Write,
    kind: &str,
    name: &str,
    dry_run: bool,
    operation: &str,
) -> Result<()> {
    let resource = kind.to_lowercase();
    if *format == OutputFormat::Name {
        writeln!(out, "{}/{}", resource, name)?;
    } else {
        let dry_run_msg = if dry_run { " (dry run)" } else { "" };
        writeln!(out, "{}/{} {}{}", resource, name, operation, dry_run_msg)?;
    }
    Ok(())
}

/// Print an entire object using `format`.
pub fn print_object<T: Serialize>(
    format: &OutputFormat,
    out: &mut dyn Write,
    object: &T,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, object)
                .context("could not write JSON output")?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(object)
                .context("could not convert object to YAML")?;
            write!(out, "{}", yaml)?;
        }
        OutputFormat::Template(template) => {
            write!(out, "{}", render_template(template, object)?)?;
        }
        OutputFormat::Default | OutputFormat::Name => {
            return Err(format_err!(
                "cannot print a whole object using {:?} output",
                format
            ));
        }
    }
    Ok(())
}

/// Render `template`, filling in fields from `object` using [Handlebars][].
/// Referring to a missing field is an error.
///
/// [Handlebars]: https://handlebarsjs.com/
fn render_template<T: Serialize>(template: &str, object: &T) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
        .render_template(template, object)
        .context("error rendering output template")
}
