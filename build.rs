// SPDX-License-Identifier: MPL-2.0

use std::process::Command;

fn main() {
    // Re-run build script if git HEAD changes
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=PHOTOBOOTH_VERSION");

    // Packagers may pin the version explicitly
    let version = match std::env::var("PHOTOBOOTH_VERSION") {
        Ok(v) => v,
        Err(_) => describe_version(),
    };

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Build a "<version>-<hash>" string from `git describe`, falling back to the
/// crate version when git is unavailable (e.g. building from a tarball).
fn describe_version() -> String {
    let pkg_version = std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());

    let described = run_git(&["describe", "--tags", "--always", "--match", "v*"]);
    let hash = run_git(&["rev-parse", "--short", "HEAD"]);

    match (described, hash) {
        (Some(described), Some(hash)) => {
            let described = described.strip_prefix('v').unwrap_or(&described).to_string();
            if described.contains('-') {
                // "0.1.0-5-gabcdef1" -> "0.1.0-dirty-abcdef1"
                let parts: Vec<&str> = described.rsplitn(3, '-').collect();
                if parts.len() >= 3 {
                    return format!("{}-dirty-{}", parts[2], hash);
                }
                described
            } else if described == hash {
                // No tags yet, describe fell back to the bare hash
                format!("{}-{}", pkg_version, hash)
            } else {
                format!("{}-{}", described, hash)
            }
        }
        _ => pkg_version,
    }
}

fn run_git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        None
    }
}
