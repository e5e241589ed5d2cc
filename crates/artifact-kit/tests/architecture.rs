//! Architecture rule tests.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

const FORBIDDEN_INNER_IMPORTS: &[&str] = &[
    "artifact_kit_adapters",
    "artifact_kit_infra",
    "crate::adapters",
    "crate::infra",
    "tokio::",
    "axum::",
    "tracing::",
    "std::fs",
    "Utc::now",
];

fn crates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

fn collect_rs_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, files)?;
        } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
            files.push(path);
        }
    }
    Ok(())
}

fn assert_no_forbidden_imports(layer: &str, root: &Path, forbidden: &[&str]) {
    let mut files = Vec::new();
    if let Err(err) = collect_rs_files(root, &mut files) {
        panic!("collect source files under {}: {err}", root.display());
    }
    assert!(!files.is_empty(), "no sources found for {layer} layer");

    let mut violations = Vec::new();
    for file in files {
        let Ok(contents) = fs::read_to_string(&file) else {
            continue;
        };
        for token in forbidden {
            if contents.contains(token) {
                violations.push(format!("{}: {}", file.display(), token));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Found forbidden dependencies in {} layer:\n{}",
        layer,
        violations.join("\n")
    );
}

#[test]
fn domain_layer_has_no_outward_dependencies() {
    let root = crates_dir().join("artifact-kit-domain/src");
    assert_no_forbidden_imports("domain", &root, FORBIDDEN_INNER_IMPORTS);
}

#[test]
fn usecase_layer_has_no_outward_dependencies() {
    let root = crates_dir().join("artifact-kit-usecases/src");
    assert_no_forbidden_imports("usecases", &root, FORBIDDEN_INNER_IMPORTS);
}

#[test]
fn adapter_layer_does_not_depend_on_infra() {
    let root = crates_dir().join("artifact-kit-adapters/src");
    assert_no_forbidden_imports(
        "adapters",
        &root,
        &["artifact_kit_infra", "crate::infra", "tokio::", "axum::"],
    );
}
