//! Layering guardrails for the workspace crates.
//!
//! `ditables_core` holds the shared model and must stay free of runtime dependencies, and the reference frameworks
//! may only build on the core. This test scans the member manifests and fails if either rule is broken.

fn dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            if line == "[dependencies]" {
                in_dependencies = true;
                continue;
            }
            if in_dependencies {
                break;
            }
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn core_has_no_dependencies() {
    let deps = dependencies(include_str!("../crates/ditables_core/Cargo.toml"));
    assert!(deps.is_empty(), "`ditables_core` must not depend on other crates, found {deps:?}");
}

#[test]
fn frameworks_only_build_on_core() {
    let deps = dependencies(include_str!("../crates/ditables_frameworks/Cargo.toml"));
    for dep in &deps {
        assert!(
            dep == "ditables_core" || dep == "tracing",
            "`ditables_frameworks` may only depend on the core and logging, found `{dep}`"
        );
    }
    assert!(deps.iter().any(|d| d == "ditables_core"));
}

#[test]
fn engine_links_core_and_frameworks() {
    let deps = dependencies(include_str!("../Cargo.toml"));
    assert!(deps.iter().any(|d| d == "ditables_frameworks"));
    assert!(deps.iter().any(|d| d == "ditables_core"));
}
