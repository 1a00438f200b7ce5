//! Last-resort error reporting: print to stderr and exit.

use std::fmt;
use std::io::{self, Write};
use std::process;

use crate::error::Error;

/// Formats the message, adding the trailing newline if it is missing.
pub fn format_message(args: fmt::Arguments<'_>) -> String {
    let mut msg = args.to_string();
    if !msg.ends_with('\n') {
        msg.push('\n');
    }
    msg
}

pub fn terminate(code: i32, args: fmt::Arguments<'_>) -> ! {
    let msg = format_message(args);
    let _ = io::stderr().lock().write_all(msg.as_bytes());
    process::exit(code)
}

/// `terminate!(code, "format", args...)`: prints the message to stderr and
/// exits with `code`.
#[macro_export]
macro_rules! terminate {
    ($code:expr, $($arg:tt)*) => {
        $crate::fatal::terminate($code, format_args!($($arg)*))
    };
}

/// Reports `err` and exits with its class-specific status.
pub fn exit_on_error(err: &Error) -> ! {
    crate::terminate!(err.exit_code(), "{err}")
}
