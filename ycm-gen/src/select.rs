// SPDX-License-Identifier: GPL-3.0-or-later

//! Choosing the language of the generated configuration.

use crate::intercept::Language;
use crate::reduce::CanonicalFlagSet;

/// The flag set of the chosen language.
#[derive(Debug, PartialEq)]
pub struct Selection {
    pub language: Language,
    pub flags: CanonicalFlagSet,
}

/// Neither log has a relevant invocation.
#[derive(Debug, PartialEq)]
pub struct NothingRecorded {
    pub c_relevant: usize,
    pub c_skipped: usize,
    pub cxx_relevant: usize,
    pub cxx_skipped: usize,
}

/// Pick the language with more relevant invocations.
///
/// The override discards the other language entirely. A tie goes to C++.
pub fn select(
    c: CanonicalFlagSet,
    cxx: CanonicalFlagSet,
    preferred: Option<Language>,
) -> Result<Selection, NothingRecorded> {
    let c_relevant = match preferred {
        Some(Language::Cxx) => 0,
        _ => c.relevant,
    };
    let cxx_relevant = match preferred {
        Some(Language::C) => 0,
        _ => cxx.relevant,
    };

    if c_relevant == 0 && cxx_relevant == 0 {
        return Err(NothingRecorded {
            c_relevant,
            c_skipped: c.skipped,
            cxx_relevant,
            cxx_skipped: cxx.skipped,
        });
    }
    if c_relevant > cxx_relevant {
        Ok(Selection { language: Language::C, flags: c })
    } else {
        Ok(Selection { language: Language::Cxx, flags: cxx })
    }
}
