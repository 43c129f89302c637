// SPDX-License-Identifier: GPL-3.0-or-later

//! The configuration file formats of the supported completion engines.
//!
//! - The YouCompleteMe extra configuration, which is a Python module.
//! - The color_coded configuration, which is a plain list of arguments.

use crate::reduce::Flag;
use std::io::Write;

/// A file format which can hold a list of compiler flags.
pub trait ConfigFormat {
    fn write(writer: impl Write, flags: &[Flag]) -> std::io::Result<()>;
}

/// The `.ycm_extra_conf.py` format.
pub struct YcmExtraConf;

const YCM_PROLOGUE: &str = "\
import os

flags = [
";

const YCM_EPILOGUE: &str = "\
]


def DirectoryOfThisScript():
    return os.path.dirname(os.path.abspath(__file__))


def MakeRelativePathsInFlagsAbsolute(flags, working_directory):
    if not working_directory:
        return list(flags)
    new_flags = []
    make_next_absolute = False
    path_flags = ['-isystem', '-I', '-iquote', '--sysroot=']
    for flag in flags:
        new_flag = flag

        if make_next_absolute:
            make_next_absolute = False
            if not flag.startswith('/'):
                new_flag = os.path.join(working_directory, flag)

        for path_flag in path_flags:
            if flag == path_flag:
                make_next_absolute = True
                break

            if flag.startswith(path_flag):
                path = flag[len(path_flag):]
                new_flag = path_flag + os.path.join(working_directory, path)
                break

        if new_flag:
            new_flags.append(new_flag)
    return new_flags


def Settings(**kwargs):
    relative_to = DirectoryOfThisScript()
    return {
        'flags': MakeRelativePathsInFlagsAbsolute(flags, relative_to),
    }


def FlagsForFile(filename, **kwargs):
    relative_to = DirectoryOfThisScript()
    return {
        'flags': MakeRelativePathsInFlagsAbsolute(flags, relative_to),
        'do_cache': True,
    }
";

impl ConfigFormat for YcmExtraConf {
    fn write(mut writer: impl Write, flags: &[Flag]) -> std::io::Result<()> {
        let now = chrono::Local::now();
        writeln!(writer, "# Generated by ycm-gen at {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(writer)?;
        writer.write_all(YCM_PROLOGUE.as_bytes())?;
        for flag in flags {
            let quoted: Vec<String> = flag.arguments().into_iter().map(python_string).collect();
            writeln!(writer, "    {},", quoted.join(", "))?;
        }
        writer.write_all(YCM_EPILOGUE.as_bytes())?;
        writer.flush()
    }
}

/// Single quoted Python string literal.
fn python_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// The `.color_coded` format.
pub struct ColorCoded;

impl ConfigFormat for ColorCoded {
    fn write(mut writer: impl Write, flags: &[Flag]) -> std::io::Result<()> {
        for argument in flags.iter().flat_map(Flag::arguments) {
            writeln!(writer, "{argument}")?;
        }
        writer.flush()
    }
}
