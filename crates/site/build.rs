//! Build script for the site crate.
//!
//! Fingerprints the stylesheets under `static/css` so templates can link
//! `/static/css/main.css?v=<hash>` and browsers refetch after a change.

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use sha2::{Digest, Sha256};

/// Hex characters of the digest kept in the query string.
const FINGERPRINT_LEN: usize = 8;

fn main() {
    let css_dir = Path::new(&env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default()).join("static/css");
    println!("cargo:rerun-if-changed={}", css_dir.display());

    let fingerprint = match stylesheets(&css_dir).and_then(|files| digest(&files)) {
        Ok(hex) => hex.chars().take(FINGERPRINT_LEN).collect(),
        Err(e) => {
            println!("cargo:warning=Could not fingerprint {}: {e}", css_dir.display());
            String::new()
        }
    };

    println!("cargo:rustc-env=CSS_HASH={fingerprint}");
}

/// Every `.css` file in `dir`, sorted so the digest is stable.
fn stylesheets(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "css") {
            println!("cargo:rerun-if-changed={}", path.display());
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn digest(files: &[PathBuf]) -> io::Result<String> {
    let mut hasher = Sha256::new();
    for file in files {
        hasher.update(fs::read(file)?);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
