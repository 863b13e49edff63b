//! Chat-command adapter.
//!
//! Commands look like `flip 1 5 3 2`: an optional verb, then switch numbers
//! counted from 1 on the left. Every digit is one switch, so `135` flips
//! switches 1, 3 and 5. Spaces, commas and semicolons are free separators.

use crate::{Error, Result};

/// Help line shown to chat players, `{0}` being the module's command prefix
pub const HELP_MESSAGE: &str =
    "!{0} flip 1 5 3 2 [flips the switches in that order; numbered left to right]";

const VERBS: [&str; 3] = ["flip", "toggle", "switch"];

/// Strip a leading verb if it is followed by whitespace.
fn strip_verb(command: &str) -> &str {
    for verb in VERBS {
        let Some(head) = command.get(..verb.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(verb) {
            continue;
        }
        let rest = &command[verb.len()..];
        if rest.starts_with(char::is_whitespace) {
            return rest.trim_start();
        }
    }
    command
}

/// Parse a command into 0-based switch indices, in flip order.
///
/// Rejects the whole command if it has anything but digits and separators
/// after the verb, names a switch outside `1..=switch_count`, or names none.
pub fn parse_command(command: &str, switch_count: usize) -> Result<Vec<usize>> {
    let not_understood = || Error::CommandNotUnderstood(command.to_owned());
    let body = strip_verb(command.trim());

    let mut flips = Vec::new();
    for ch in body.chars() {
        match ch {
            ' ' | ',' | ';' => {}
            '1'..='9' => {
                let number = ch as usize - '0' as usize;
                if number > switch_count {
                    return Err(not_understood());
                }
                flips.push(number - 1);
            }
            _ => return Err(not_understood()),
        }
    }

    if flips.is_empty() {
        return Err(not_understood());
    }
    Ok(flips)
}
