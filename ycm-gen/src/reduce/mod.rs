// SPDX-License-Identifier: GPL-3.0-or-later

//! Reduction of the recorded invocations into one canonical flag set.
//!
//! The reducer sees each log line once. It counts the admitted and skipped
//! invocations and collects the whitelisted flags of the admitted ones into
//! sets. Nothing depends on the order of the lines, so the result is the
//! same for every ordering of the same multiset of lines.

mod filter;

use crate::intercept::record;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Options which take a file name as their argument.
///
/// Sorted so that an option never shadows a longer one with the same prefix
/// when the joined spelling is split.
const FILENAME_OPTIONS: [&str; 7] = ["-isystem", "-isysroot", "-iquote", "-include", "-imacros", "-I", "-o"];

/// A flag of the canonical flag set.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Flag {
    /// A single argument, like `-Wall` or `-DNDEBUG`.
    Opaque(String),
    /// An option with its argument, like `-isystem /usr/include`.
    Paired(String, String),
}

impl Flag {
    fn primary(&self) -> &str {
        match self {
            Flag::Opaque(token) => token,
            Flag::Paired(option, _) => option,
        }
    }

    /// The compiler arguments this flag expands to.
    pub fn arguments(&self) -> Vec<&str> {
        match self {
            Flag::Opaque(token) => vec![token.as_str()],
            Flag::Paired(option, argument) => vec![option.as_str(), argument.as_str()],
        }
    }
}

impl Ord for Flag {
    fn cmp(&self, other: &Self) -> Ordering {
        fn key(flag: &Flag) -> (&str, u8, &str) {
            match flag {
                Flag::Opaque(token) => (token, 0, ""),
                Flag::Paired(option, argument) => (option, 1, argument),
            }
        }
        key(self).cmp(&key(other))
    }
}

impl PartialOrd for Flag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Opaque(token) => write!(f, "{token}"),
            Flag::Paired(option, argument) => write!(f, "{option} {argument}"),
        }
    }
}

/// A macro which was defined with different values across the invocations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MacroConflict {
    pub name: String,
    pub candidates: BTreeSet<String>,
    pub chosen: String,
}

impl fmt::Display for MacroConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let candidates: Vec<&str> = self.candidates.iter().map(String::as_str).collect();
        write!(
            f,
            "Macro {} is defined with multiple values ({}), using {}",
            self.name,
            candidates.join(", "),
            self.chosen
        )
    }
}

/// The result of the reduction of one log.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CanonicalFlagSet {
    /// Number of admitted invocations.
    pub relevant: usize,
    /// Number of invocations dropped by the admission filter.
    pub skipped: usize,
    pub flags: BTreeSet<Flag>,
    pub conflicts: Vec<MacroConflict>,
}

impl CanonicalFlagSet {
    /// The flags as compiler arguments, pairs expanded, in flag order.
    pub fn arguments(&self) -> Vec<String> {
        self.flags
            .iter()
            .flat_map(|flag| flag.arguments())
            .map(str::to_string)
            .collect()
    }
}

/// Accumulates log lines, see the module documentation.
#[derive(Debug, Default)]
pub struct Reducer {
    relevant: usize,
    skipped: usize,
    flags: BTreeSet<Flag>,
    macros: BTreeMap<String, BTreeSet<String>>,
    word_sizes: BTreeSet<String>,
}

impl Reducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one log line.
    pub fn admit(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        let tokens = record::tokenize(line);
        if !filter::admitted(&tokens) {
            log::debug!("Skipping invocation: {line}");
            self.skipped += 1;
            return;
        }
        self.relevant += 1;

        // The first token is the compiler itself.
        let mut tokens = tokens.into_iter().skip(1).peekable();
        while let Some(token) = tokens.next() {
            let takes_argument = token == "-D" || FILENAME_OPTIONS.contains(&token.as_str());
            let argument = match tokens.peek() {
                Some(next) if takes_argument && !next.starts_with('-') => tokens.next(),
                _ => None,
            };
            match argument {
                Some(definition) if token == "-D" => self.collect(format!("-D{definition}")),
                Some(argument) => self.collect_pair(token, argument),
                None => self.collect(token),
            }
        }
    }

    fn collect(&mut self, token: String) {
        if let Some((option, argument)) = split_joined(&token) {
            self.collect_pair(option.to_string(), argument.to_string());
            return;
        }
        if !filter::whitelisted(&token) {
            return;
        }
        if filter::is_word_size(&token) {
            self.word_sizes.insert(token);
        } else if let Some((name, value)) = token.strip_prefix("-D").and_then(|macro_| macro_.split_once('=')) {
            self.macros.entry(name.to_string()).or_default().insert(value.to_string());
        } else {
            self.flags.insert(Flag::Opaque(token));
        }
    }

    fn collect_pair(&mut self, option: String, argument: String) {
        if filter::whitelisted(&option) {
            self.flags.insert(Flag::Paired(option, argument));
        }
    }

    /// Resolve the collected values into the canonical flag set.
    pub fn finish(self) -> CanonicalFlagSet {
        let Reducer { relevant, skipped, mut flags, macros, word_sizes } = self;

        let mut conflicts = Vec::new();
        for (name, candidates) in macros {
            let Some(chosen) = candidates.last().cloned() else {
                continue;
            };
            flags.insert(Flag::Opaque(format!("-D{name}={chosen}")));
            if candidates.len() > 1 {
                let conflict = MacroConflict { name, candidates, chosen };
                log::warn!("{conflict}");
                conflicts.push(conflict);
            }
        }
        if let Some(word_size) = word_sizes.last() {
            if word_sizes.len() > 1 {
                log::debug!("Multiple word sizes found, using {word_size}");
            }
            flags.insert(Flag::Opaque(word_size.clone()));
        }

        CanonicalFlagSet { relevant, skipped, flags, conflicts }
    }
}

/// Split the joined spelling of a file name option, like `-I/usr/include`.
fn split_joined(token: &str) -> Option<(&str, &str)> {
    FILENAME_OPTIONS.iter().find_map(|option| {
        token
            .strip_prefix(option)
            .filter(|argument| !argument.is_empty())
            .map(|argument| (*option, argument))
    })
}

/// Reduce all lines of a log.
pub fn reduce<I, S>(lines: I) -> CanonicalFlagSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut reducer = Reducer::new();
    for line in lines {
        reducer.admit(line.as_ref());
    }
    reducer.finish()
}
