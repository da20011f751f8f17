//! Build script for perm-optimizer
//!
//! Embeds build metadata read back by `perm_optimizer::build_info()`.

use std::process::Command;

fn main() {
    let docs_rs = std::env::var_os("DOCS_RS").is_some();

    let build_time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs().to_string())
        .unwrap_or_default();
    emit("BUILD_TIME", &build_time);

    let git_hash = if docs_rs {
        Some("docs-rs-build".to_string())
    } else {
        command_output("git", &["rev-parse", "--short", "HEAD"])
    };
    emit("GIT_HASH", git_hash.as_deref().unwrap_or("unknown"));

    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    emit(
        "RUST_VERSION",
        command_output(&rustc, &["--version"])
            .as_deref()
            .unwrap_or("unknown"),
    );

    // Cargo's PROFILE is only visible to build scripts
    emit(
        "BUILD_PROFILE",
        &std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string()),
    );

    for path in [".git/HEAD", ".git/refs/heads/", "Cargo.toml"] {
        println!("cargo:rerun-if-changed={}", path);
    }
    println!("cargo:rerun-if-env-changed=DOCS_RS");
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env={}={}", key, value);
}

/// Trimmed stdout of a successful command
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
