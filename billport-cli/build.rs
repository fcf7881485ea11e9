use std::path::Path;
use std::process::Command;

fn git(repo_root: &Path, args: &[&str]) -> Option<String> {
    let out = Command::new("git").arg("-C").arg(repo_root).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let s = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!s.is_empty()).then_some(s)
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let repo_root = Path::new(&manifest_dir).join("..");

    // Re-embed when HEAD moves to another branch or commit.
    if let Some(head) = git(&repo_root, &["rev-parse", "--git-path", "HEAD"]) {
        println!("cargo:rerun-if-changed={}", repo_root.join(head).display());
    }
    println!("cargo:rerun-if-changed=build.rs");

    let sha = git(&repo_root, &["rev-parse", "--short", "HEAD"])
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=BILLPORT_BUILD_SHA={sha}");
}
