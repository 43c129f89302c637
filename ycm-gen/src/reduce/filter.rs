// SPDX-License-Identifier: GPL-3.0-or-later

//! Decisions on single invocations and single flags.
//!
//! The admission filter drops the invocations which do not compile a source
//! file into an object: preprocessor runs, dependency generation, assembler
//! sources and the probes configure scripts make into scratch outputs.
//! The whitelist keeps the flags which influence how a source is parsed.

use regex_lite::Regex;
use std::path::Path;
use std::sync::LazyLock;

const NON_COMPILING_FLAGS: [&str; 4] = ["-S", "-E", "-M", "-MM"];
const DISCARDED_OUTPUT: &str = "/dev/null";
const SCRATCH_SUFFIX: &str = ".tmp";

static WHITELIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"-I.*|-i.*|-D.*|-F.*|-W[^,]*",
        r"|-std=[a-z0-9+]+|-stdlib=.+|-(?:no)?std(?:lib|inc)",
        r"|-m[0-9]+",
        r")$"
    ))
    .expect("Invalid flag whitelist pattern")
});

static WORD_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-m[0-9]+$").expect("Invalid word size pattern"));

/// Returns true if the invocation compiles a source into an object.
pub fn admitted<S: AsRef<str>>(tokens: &[S]) -> bool {
    let mut tokens = tokens.iter().map(AsRef::as_ref).peekable();

    while let Some(token) = tokens.next() {
        if NON_COMPILING_FLAGS.contains(&token) || token == DISCARDED_OUTPUT {
            return false;
        }
        if token.starts_with("-xassembler") {
            return false;
        }
        if token == "-x" && tokens.peek().is_some_and(|language| language.starts_with("assembler")) {
            return false;
        }
        let output = match token {
            "-o" => tokens.peek().copied(),
            _ => token.strip_prefix("-o").filter(|target| !target.is_empty()),
        };
        if output.is_some_and(discarded_output) {
            return false;
        }
    }
    true
}

fn discarded_output(target: &str) -> bool {
    target == DISCARDED_OUTPUT
        || Path::new(target)
            .file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(SCRATCH_SUFFIX))
}

/// Returns true if the flag influences how the sources are parsed.
pub fn whitelisted(flag: &str) -> bool {
    WHITELIST.is_match(flag)
}

pub fn is_word_size(flag: &str) -> bool {
    WORD_SIZE.is_match(flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<&str> {
        line.split_whitespace().collect()
    }

    #[test]
    fn test_compilations_are_admitted() {
        assert!(admitted(&words("cc -I/inc -DX=1 -Wall -c a.c -o a.o")));
        assert!(admitted(&words("c++ -std=c++17 -c b.cpp")));
        assert!(admitted(&words("cc -Mfoo -c a.c -o build/a.o")));
        assert!(admitted::<&str>(&[]));
    }

    #[test]
    fn test_non_compiling_invocations_are_skipped() {
        assert!(!admitted(&words("cc -S a.c")));
        assert!(!admitted(&words("cc -E a.c")));
        assert!(!admitted(&words("cc -M a.c")));
        assert!(!admitted(&words("cc -MM a.c")));
    }

    #[test]
    fn test_assembler_sources_are_skipped() {
        assert!(!admitted(&words("cc -x assembler -c a.s")));
        assert!(!admitted(&words("cc -x assembler-with-cpp -c a.S")));
        assert!(!admitted(&words("cc -xassembler-with-cpp -c a.S")));
        assert!(admitted(&words("cc -x c -c a.c")));
    }

    #[test]
    fn test_scratch_outputs_are_skipped() {
        assert!(!admitted(&words("cc -c conftest.c -o /dev/null")));
        assert!(!admitted(&words("cc -c conftest.c -o/dev/null")));
        assert!(!admitted(&words("cc -E - /dev/null")));
        assert!(!admitted(&words("cc -c conftest.c -o conftest.tmp")));
        assert!(!admitted(&words("cc -c conftest.c -o/tmp/dir/out.tmp")));
        assert!(admitted(&words("cc -c a.c -o tmp/a.o")));
    }

    #[test]
    fn test_whitelist() {
        for flag in [
            "-I/inc", "-I", "-isystem", "-iquote", "-include", "-DX=1", "-DX", "-F/frameworks", "-Wall",
            "-Wno-unused", "-std=c++17", "-std=gnu99", "-stdlib=libc++", "-nostdinc", "-nostdlib",
            "-stdlib", "-m32", "-m64",
        ] {
            assert!(whitelisted(flag), "should keep {flag}");
        }
        for flag in [
            "-c", "-o", "-O2", "-g", "-fPIC", "-Wl,-rpath,/lib", "-Wa,--noexecstack", "-std=C++17",
            "-march=native", "-mavx", "a.c", "-x", "-pthread", "-L/lib", "-lm",
        ] {
            assert!(!whitelisted(flag), "should drop {flag}");
        }
    }

    #[test]
    fn test_word_size() {
        assert!(is_word_size("-m32"));
        assert!(is_word_size("-m64"));
        assert!(!is_word_size("-m"));
        assert!(!is_word_size("-mavx"));
        assert!(!is_word_size("-m64x"));
    }
}
