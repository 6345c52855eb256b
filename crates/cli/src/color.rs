// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal colors for `rec` output and help.

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use std::io::IsTerminal;

pub mod codes {
    /// Section headers and channel names: steel blue
    pub const HEADER: u8 = 74;
    /// Commands and literals in help: light grey
    pub const LITERAL: u8 = 250;
    /// Placeholders and secondary detail: medium grey
    pub const CONTEXT: u8 = 245;
    /// Timestamps and paths: darker grey
    pub const MUTED: u8 = 240;
    /// Live recording marker: soft red
    pub const LIVE: u8 = 167;
    /// Failures
    pub const ERROR: u8 = 203;
}

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables, then `COLOR=1` forces, then TTY check.
pub fn should_colorize() -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Build clap `Styles` using the project palette.
pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    let fg = |code| Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))));
    Styles::styled()
        .header(fg(codes::HEADER))
        .literal(fg(codes::LITERAL))
        .placeholder(fg(codes::CONTEXT))
}

fn paint(code: u8, text: &str) -> String {
    if should_colorize() {
        format!("\x1b[38;5;{code}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

pub fn header(text: &str) -> String {
    paint(codes::HEADER, text)
}

pub fn context(text: &str) -> String {
    paint(codes::CONTEXT, text)
}

pub fn muted(text: &str) -> String {
    paint(codes::MUTED, text)
}

pub fn live(text: &str) -> String {
    paint(codes::LIVE, text)
}

pub fn error(text: &str) -> String {
    paint(codes::ERROR, text)
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
