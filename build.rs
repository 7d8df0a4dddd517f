use std::{env, process::Command};

fn main() {
    for watched in ["build.rs", ".git/HEAD", ".git/refs"] {
        println!("cargo:rerun-if-changed={watched}");
    }

    let git_hash = command_stdout("git", &["rev-parse", "--short", "HEAD"])
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".into());
    let git_status = match command_stdout("git", &["status", "--porcelain"]) {
        Some(changes) if changes.is_empty() => "clean",
        Some(_) => "dirty",
        None => "unknown",
    };
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let rustc = command_stdout("rustc", &["--version"]).unwrap_or_else(|| "unknown".into());

    let entries = [
        ("HASH", git_hash),
        ("STATUS", git_status.to_string()),
        ("TIMESTAMP", timestamp),
        ("TARGET", env_or("TARGET", "unknown-target")),
        ("PROFILE", env_or("PROFILE", "unknown-profile")),
        ("RUSTC", rustc),
    ];
    for (key, value) in entries {
        println!("cargo:rustc-env=LIFEPLAN_BUILD_{key}={value}");
    }
}

/// Trimmed stdout of a successful command, `None` when it fails to run or exits non-zero.
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}

fn env_or(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}
