use std::path::{Path, PathBuf};

use anyhow::Context;
use regex_lite::Regex;
use serde::Deserialize;

/// The domain crate runs on every form edit and must stay free of I/O.
const DOMAIN_PACKAGE: &str = "rushroyale-domain";

const FORBIDDEN_DEPENDENCIES: &[&str] = &[
    "async-trait",
    "axum",
    "dotenvy",
    "reqwest",
    "tokio",
    "tower",
    "tower-http",
    "tracing-subscriber",
];

const FORBIDDEN_PATHS: &str = r"\b(std::fs|std::net|std::process|tokio::|axum::|reqwest::)";

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    manifest_path: PathBuf,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    /// `None` for normal dependencies, "dev" or "build" otherwise
    kind: Option<String>,
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;
    let domain = metadata
        .packages
        .iter()
        .find(|p| p.name == DOMAIN_PACKAGE)
        .with_context(|| format!("package {DOMAIN_PACKAGE} not found"))?;

    let mut violations: Vec<String> = forbidden_dependencies(domain)
        .into_iter()
        .map(|dep| format!("{DOMAIN_PACKAGE} depends on {dep}"))
        .collect();

    let src = domain
        .manifest_path
        .parent()
        .map(|dir| dir.join("src"))
        .context("domain manifest has no parent directory")?;
    let pattern = Regex::new(FORBIDDEN_PATHS).context("compiling source pattern")?;
    for file in rust_files(&src)? {
        let text = std::fs::read_to_string(&file)
            .with_context(|| format!("reading {}", file.display()))?;
        for (line, hit) in scan_source(&pattern, &text) {
            violations.push(format!("{}:{}: uses {}", file.display(), line, hit));
        }
    }

    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("{violation}");
        }
        anyhow::bail!("arch-check failed with {} violation(s)", violations.len());
    }

    println!("arch-check passed");
    Ok(())
}

/// Normal dependencies of `package` that pull I/O into it.
fn forbidden_dependencies(package: &Package) -> Vec<&str> {
    package
        .dependencies
        .iter()
        .filter(|dep| dep.kind.is_none())
        .map(|dep| dep.name.as_str())
        .filter(|name| FORBIDDEN_DEPENDENCIES.contains(name))
        .collect()
}

/// 1-based line numbers and matches of forbidden paths, skipping comments.
fn scan_source(pattern: &Regex, text: &str) -> Vec<(usize, String)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .filter_map(|(i, line)| pattern.find(line).map(|m| (i + 1, m.as_str().to_string())))
        .collect()
}

fn rust_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(rust_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
