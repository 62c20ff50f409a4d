//! Error-handling code.

use std::{backtrace::BacktraceStatus, error, fmt};

use anyhow::Error;

/// The user invoked a command incorrectly. We report these a bit differently
/// from other errors, so that the user knows where to find help.
#[derive(Debug)]
pub struct UsageError {
    /// The full name of the command, such as `"kubejob create job"`.
    command: String,
    /// What was wrong with the command line.
    message: String,
}

impl UsageError {
    /// Create a new usage error for `command`.
    pub fn new<S: Into<String>>(command: &str, message: S) -> UsageError {
        UsageError {
            command: command.to_owned(),
            message: message.into(),
        }
    }

    /// The command which was invoked incorrectly.
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl error::Error for UsageError {}

/// Support for displaying an error with a complete list of causes, and an
/// optional backtrace.
pub trait DisplayCausesAndBacktraceExt {
    /// Display the error and its causes, plus a backtrace (if available).
    fn display_causes_and_backtrace(&self) -> DisplayCauses<'_>;

    /// Display the error and its causes.
    fn display_causes_without_backtrace(&self) -> DisplayCauses<'_>;
}

impl DisplayCausesAndBacktraceExt for Error {
    fn display_causes_and_backtrace(&self) -> DisplayCauses<'_> {
        DisplayCauses {
            err: self,
            show_backtrace: true,
        }
    }

    fn display_causes_without_backtrace(&self) -> DisplayCauses<'_> {
        DisplayCauses {
            err: self,
            show_backtrace: false,
        }
    }
}

/// Helper type used to display errors.
pub struct DisplayCauses<'a> {
    /// The error to display.
    err: &'a Error,

    /// Should we show the backtrace?
    show_backtrace: bool,
}

impl fmt::Display for DisplayCauses<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.err)?;
        for cause in self.err.chain().skip(1) {
            writeln!(f, "  caused by: {}", cause)?;
        }

        // Usage errors are the user's problem, not ours, so point them at the
        // help instead of at our stack.
        if let Some(usage) = self.err.downcast_ref::<UsageError>() {
            return writeln!(
                f,
                "See '{} -h' for help and examples.",
                usage.command()
            );
        }

        if self.show_backtrace {
            let backtrace = self.err.backtrace();
            if backtrace.status() == BacktraceStatus::Captured {
                write!(f, "{}", backtrace)?;
            }
        }
        Ok(())
    }
}

/// Generate a `main` function which calls the specified function. If the
/// function returns `Result::Err(_)`, then `main` will print the error and exit
/// with a non-zero status code.
#[macro_export]
macro_rules! quick_main {
    ($wrapped:ident) => {
        fn main() {
            if let Err(err) = $wrapped() {
                use ::std::io::Write;
                use $crate::errors::DisplayCausesAndBacktraceExt;
                let stderr = ::std::io::stderr();
                write!(&mut stderr.lock(), "{}", err.display_causes_and_backtrace())
                    .expect("Error occurred while trying to display error");
                ::std::process::exit(1);
            }
        }
    };
}

#[test]
fn usage_errors_point_at_help() {
    let err = Error::new(UsageError::new("kubejob create job", "NAME is required"));
    let displayed = format!("{}", err.display_causes_and_backtrace());
    assert_eq!(
        displayed,
        "ERROR: NAME is required\nSee 'kubejob create job -h' for help and examples.\n",
    );
}

#[test]
fn causes_are_listed_in_order() {
    let err = anyhow::format_err!("connection refused")
        .context("error running kubectl")
        .context("could not look up cron job");
    let displayed = format!("{}", err.display_causes_without_backtrace());
    assert_eq!(
        displayed,
        "ERROR: could not look up cron job\n  caused by: error running kubectl\n  caused by: connection refused\n",
    );
}
