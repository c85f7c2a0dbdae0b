use std::env;
use std::process::Command;

// Embeds the source revision shown by `lvis-reader --version`.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=LVIS_GIT_SHA");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");

    let commit = ["LVIS_GIT_SHA", "GITHUB_SHA"]
        .into_iter()
        .find_map(|name| env::var(name).ok().filter(|value| !value.trim().is_empty()))
        .map(|sha| short_commit(sha.trim()))
        .or_else(|| git(&["describe", "--always", "--dirty", "--abbrev=7"]))
        .unwrap_or_else(|| "unknown".to_string());
    let date = git(&["log", "-1", "--format=%cs"]).unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=LVIS_BUILD_COMMIT={commit}");
    println!("cargo:rustc-env=LVIS_BUILD_DATE={date}");
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty()).then_some(value)
}

fn short_commit(sha: &str) -> String {
    sha.chars().take(7).collect()
}
