/*
 * SPDX-License-Identifier: GPL-3.0-or-later
 *
 * This build script is responsible for setting up environment variables and
 * cfg flags required by the integration tests.
 */

const EXE_SUFFIX: &str = if cfg!(windows) { ".exe" } else { "" };

fn main() {
    // Set up paths for the application and the shim artifacts
    let (application_path, shim_path) = find_artifacts();
    println!("cargo:rustc-env=YCM_GEN_EXECUTABLE_PATH={}", application_path);
    println!("cargo:rustc-env=SHIM_EXECUTABLE_PATH={}", shim_path);

    // Re-run build script if env changes
    println!("cargo:rerun-if-env-changed=PATH");
    println!("cargo:rerun-if-env-changed=CARGO_TARGET_DIR");
    println!("cargo:rerun-if-env-changed=PROFILE");

    // Re-run if the application or the shim sources change
    println!("cargo:rerun-if-changed=../ycm-gen/src");
    println!("cargo:rerun-if-changed=../fake-toolchain/src");

    // Perform checks for executables
    check_executable_exists("true");
    check_executable_exists("false");
    check_one_executable_exists("shell", &["sh", "bash", "zsh"]);
    check_one_executable_exists("make", &["make", "gmake"]);
    check_one_executable_exists("compiler_c", &["gcc", "cc", "clang"]);
}

fn find_artifacts() -> (String, String) {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let target_dir = std::path::Path::new(&out_dir)
        .ancestors()
        .nth(3) // Go up from out_dir to target/debug or target/release
        .unwrap();

    let application_path = target_dir.join(format!("ycm-gen{EXE_SUFFIX}"));
    let shim_path = target_dir.join(format!("ycm-shim{EXE_SUFFIX}"));

    (format!("{}", application_path.display()), format!("{}", shim_path.display()))
}

fn check_executable_exists(executable: &str) {
    match which::which(executable) {
        Ok(path) => {
            println!("cargo:rustc-cfg=has_executable_{}", executable);
            println!("cargo:rustc-check-cfg=cfg(has_executable_{})", executable);
            println!("cargo:rustc-env={}_PATH={}", executable.to_uppercase(), path.display());
            println!("cargo:warning=Checking for executable: {} ... {}", executable, path.display());
        }
        Err(_) => {
            println!("cargo:warning=Checking for executable: {} ... missing", executable);
        }
    }
}

fn check_one_executable_exists(define: &str, executables: &[&str]) {
    for executable in executables {
        if let Ok(path) = which::which(executable) {
            println!("cargo:rustc-cfg=has_executable_{}", define);
            println!("cargo:rustc-check-cfg=cfg(has_executable_{})", define);
            println!("cargo:rustc-env={}_PATH={}", define.to_uppercase(), path.display());
            println!("cargo:warning=Checking for executable: {} ... {}", define, path.display());
            return;
        }
    }
    println!("cargo:warning=Checking for executable: {} ... missing", define);
}
