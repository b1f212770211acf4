//! Build script: content-hash the stylesheet.
//!
//! Page templates link `/static/css/derived/main.{hash}.css` so the
//! stylesheet can be cached immutably. The short hash is exposed to the
//! crate as the `CSS_HASH` env var and the hashed copy is written under
//! `static/css/derived/`.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let css = Path::new(&manifest_dir).join("static/css/main.css");
    println!("cargo:rerun-if-changed={}", css.display());

    let Ok(content) = fs::read(&css) else {
        // A fresh checkout may not have the stylesheet yet; templates
        // then link a bare name until the next build.
        println!("cargo:warning=Could not read {}", css.display());
        println!("cargo:rustc-env=CSS_HASH=");
        return;
    };

    let short_hash = content_hash(&content);
    println!("cargo:rustc-env=CSS_HASH={short_hash}");

    let derived = Path::new(&manifest_dir).join("static/css/derived");
    fs::create_dir_all(&derived).expect("Failed to create derived CSS directory");
    fs::copy(&css, derived.join(format!("main.{short_hash}.css")))
        .expect("Failed to copy CSS to derived directory");
}

/// First 8 hex chars of the SHA-256 of the file content.
fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())[..8].to_string()
}
