use std::process::Command;

/// Used when the crate is built outside a git checkout.
const UNKNOWN_BUILD: &str = "unknown build";

fn main() {
  println!("cargo:rustc-env=FIXCOPYRIGHT_BUILD={}", build_id());
  println!("cargo:rerun-if-changed=build.rs");
  println!("cargo:rerun-if-changed=.git/HEAD");
  println!("cargo:rerun-if-changed=.git/refs/heads");
}

/// Short commit hash and commit date of the checkout, e.g. `1a2b3c4 2025-03-01`.
fn build_id() -> String {
  Command::new("git")
    .args(["log", "-1", "--format=%h %cs"])
    .output()
    .ok()
    .filter(|output| output.status.success())
    .and_then(|output| String::from_utf8(output.stdout).ok())
    .map(|id| id.trim().to_string())
    .filter(|id| !id.is_empty())
    .unwrap_or_else(|| UNKNOWN_BUILD.to_string())
}
