#![allow(clippy::module_inception)]

use std::sync::Arc;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod builtin;
pub mod checker;
pub mod environment;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod types;

extern crate regex;

#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Arc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Arc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }
}

/// Returns the 1-based line number, the text of that line and the
/// byte offset of `position` inside the line.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if source.is_empty() {
        return Some((1, String::new(), 0));
    }

    // End of input points just past the last character.
    let pos = pos.min(source.len());

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) || (end == source.len() && pos == end) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    None
}

/// Renders a diagnostic underneath the offending source line.
pub fn display_error(error: &Error, source: &str, file: &str) -> String {
    /*
        Error: UnknownName (unknown name foo)
        -> rule.expr
           |
         1 | foo + 1
           | ^
    */

    let mut out = String::new();

    match error.get_tip() {
        ErrorTip::None => out.push_str(&format!("Error: {}\n", error.get_error_name())),
        tip => out.push_str(&format!("Error: {} ({})\n", error.get_error_name(), tip)),
    }
    out.push_str(&format!("-> {}\n", file));

    let Some((line, line_text, line_pos)) = get_line_at_position(source, error.get_position().0)
    else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ').count();

    (String::from(&string[start..]), start)
}
