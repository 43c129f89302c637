// SPDX-License-Identifier: GPL-3.0-or-later

//! The invocation record line format.
//!
//! A record is one line of whitespace separated arguments. The reader splits
//! the line on whitespace, then merges a word with the following ones while
//! it contains an odd number of single or double quotes. This reconstructs
//! arguments like `-DNAME="a b"`, which the build system passes with the
//! quotes being part of the argument.
//!
//! The writer checks that each argument survives this reading. Those which
//! would not (an embedded space outside of quotes, an empty argument) are
//! wrapped into a pair of quotes, which the reader removes again.

use std::borrow::Cow;

const QUOTE_MARKS: [char; 2] = ['"', '\''];
const PROBE: &str = "probe";

/// Serialize an argument vector into a record line (without the line terminator).
pub fn serialize<S: AsRef<str>>(arguments: &[S]) -> String {
    arguments
        .iter()
        .map(|argument| quote(argument.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a record line back into arguments.
pub fn tokenize(line: &str) -> Vec<String> {
    split_balanced(line).into_iter().map(unquote).collect()
}

/// Split the line on whitespace and merge words until the quotes are balanced.
///
/// Merged words are joined with a single space.
pub fn split_balanced(line: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    let mut open = false;

    for word in line.split_whitespace() {
        match words.last_mut() {
            Some(last) if open => {
                last.push(' ');
                last.push_str(word);
            }
            _ => words.push(word.to_string()),
        }
        if let Some(last) = words.last() {
            open = unbalanced_quotes(last);
        }
    }
    words
}

/// Returns true if the number of single or double quotes is odd.
fn unbalanced_quotes(text: &str) -> bool {
    let (single, double) = text.chars().fold((0usize, 0usize), |(single, double), c| match c {
        '\'' => (single + 1, double),
        '"' => (single, double + 1),
        _ => (single, double),
    });
    single % 2 == 1 || double % 2 == 1
}

/// Quote an argument, if that is needed to read it back unchanged.
fn quote(argument: &str) -> Cow<'_, str> {
    if !is_wrapped(argument) && survives_reading(argument) {
        return Cow::Borrowed(argument);
    }
    for mark in QUOTE_MARKS {
        let candidate = format!("{mark}{argument}{mark}");
        if survives_reading(&candidate) {
            return Cow::Owned(candidate);
        }
    }
    log::debug!("Argument can not be recorded faithfully: {argument:?}");
    if argument.contains(['\n', '\r']) {
        Cow::Owned(argument.replace(['\n', '\r'], " "))
    } else {
        Cow::Borrowed(argument)
    }
}

/// Remove one pair of matching outer quotes.
fn unquote(word: String) -> String {
    if is_wrapped(&word) {
        word[1..word.len() - 1].to_string()
    } else {
        word
    }
}

fn is_wrapped(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) => first == last && QUOTE_MARKS.contains(&first),
        _ => false,
    }
}

/// The text reads back as one word, and does not swallow the word after it.
fn survives_reading(text: &str) -> bool {
    let line = format!("{text} {PROBE}");
    matches!(split_balanced(&line).as_slice(), [word, probe] if word == text && probe == PROBE)
}
