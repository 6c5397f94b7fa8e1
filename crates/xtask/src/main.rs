use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::Context;
use regex_lite::Regex;
use serde::Deserialize;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

/// Internal crates each workspace crate may depend on.
const ALLOWED_INTERNAL_DEPS: &[(&str, &[&str])] = &[
    ("fatesheet-domain", &[]),
    ("fatesheet-shared", &["fatesheet-domain"]),
    ("fatesheet-player", &["fatesheet-domain", "fatesheet-shared"]),
    ("xtask", &[]),
];

/// Crates that must stay pure: no runtime, no logging, no I/O.
const PURE_CRATES: &[&str] = &["fatesheet-domain"];

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
    #[serde(default)]
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
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata output")?;

    let mut violations = check_layering(&metadata.packages);
    for package in &metadata.packages {
        if PURE_CRATES.contains(&package.name.as_str()) {
            let src = package
                .manifest_path
                .parent()
                .map(|dir| dir.join("src"))
                .context("manifest path has no parent")?;
            violations.extend(check_purity(&package.name, &src)?);
        }
    }

    if violations.is_empty() {
        println!("arch-check: OK ({} crates)", metadata.packages.len());
        Ok(())
    } else {
        for v in &violations {
            eprintln!("arch-check: {v}");
        }
        anyhow::bail!("arch-check failed with {} violation(s)", violations.len())
    }
}

fn check_layering(packages: &[Package]) -> Vec<String> {
    let allowed: BTreeMap<&str, BTreeSet<&str>> = ALLOWED_INTERNAL_DEPS
        .iter()
        .map(|(name, deps)| (*name, deps.iter().copied().collect()))
        .collect();

    let mut violations = Vec::new();
    for package in packages {
        let Some(permitted) = allowed.get(package.name.as_str()) else {
            violations.push(format!("{} is not a known workspace crate", package.name));
            continue;
        };
        for dep in &package.dependencies {
            // Dev-dependencies may reach across layers.
            if dep.kind.as_deref() == Some("dev") {
                continue;
            }
            let internal = allowed.contains_key(dep.name.as_str());
            if internal && !permitted.contains(dep.name.as_str()) {
                violations.push(format!("{} must not depend on {}", package.name, dep.name));
            }
        }
    }
    violations
}

fn check_purity(crate_name: &str, src: &Path) -> anyhow::Result<Vec<String>> {
    let forbidden = Regex::new(r"\b(tokio|tracing|reqwest|std::fs|std::net|std::time::SystemTime)\b")
        .context("compiling purity pattern")?;

    let mut violations = Vec::new();
    for file in rust_files(src)? {
        let text = std::fs::read_to_string(&file)
            .with_context(|| format!("reading {}", file.display()))?;
        for (line_no, line) in text.lines().enumerate() {
            let code = line.split("//").next().unwrap_or_default();
            if let Some(m) = forbidden.find(code) {
                violations.push(format!(
                    "{crate_name} must stay pure: `{}` at {}:{}",
                    m.as_str(),
                    file.display(),
                    line_no + 1
                ));
            }
        }
    }
    Ok(violations)
}

fn rust_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in
            std::fs::read_dir(&dir).with_context(|| format!("listing {}", dir.display()))?
        {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}
