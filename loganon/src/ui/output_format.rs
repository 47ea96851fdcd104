// loganon/src/ui/output_format.rs
//! Status message formatting for stderr.
//!
//! Messages are colored only when the caller says the target supports it,
//! so redirected output and test captures stay plain.

use owo_colors::{AnsiColors, OwoColorize};
use std::io::{self, Write};

/// Logical kinds of status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warn,
    Error,
}

impl MessageKind {
    fn color(self) -> AnsiColors {
        match self {
            MessageKind::Info => AnsiColors::Cyan,
            MessageKind::Success => AnsiColors::Green,
            MessageKind::Warn => AnsiColors::Yellow,
            MessageKind::Error => AnsiColors::Red,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            MessageKind::Info | MessageKind::Success => "",
            MessageKind::Warn => "Warning: ",
            MessageKind::Error => "Error: ",
        }
    }
}

/// Writes one message line, colored when `enable_colors` is set.
pub fn print_message<W: Write + ?Sized>(
    writer: &mut W,
    kind: MessageKind,
    message: &str,
    enable_colors: bool,
) -> io::Result<()> {
    let text = format!("{}{}", kind.prefix(), message);
    if enable_colors {
        writeln!(writer, "{}", text.color(kind.color()))
    } else {
        writeln!(writer, "{}", text)
    }
}

pub fn print_info_message<W: Write + ?Sized>(writer: &mut W, message: &str, enable_colors: bool) -> io::Result<()> {
    print_message(writer, MessageKind::Info, message, enable_colors)
}

pub fn print_success_message<W: Write + ?Sized>(writer: &mut W, message: &str, enable_colors: bool) -> io::Result<()> {
    print_message(writer, MessageKind::Success, message, enable_colors)
}

pub fn print_warn_message<W: Write + ?Sized>(writer: &mut W, message: &str, enable_colors: bool) -> io::Result<()> {
    print_message(writer, MessageKind::Warn, message, enable_colors)
}

pub fn print_error_message<W: Write + ?Sized>(writer: &mut W, message: &str, enable_colors: bool) -> io::Result<()> {
    print_message(writer, MessageKind::Error, message, enable_colors)
}
