//! Build script: writes a placeholder triview-ui panel when the gui feature is enabled.

use std::path::Path;

fn main() {
    // Only needed when the gui feature is enabled.
    if std::env::var("CARGO_FEATURE_GUI").is_err() {
        return;
    }

    // rust-embed needs the triview-ui dist directory to exist even before
    // `trunk build` has run, so write a placeholder page when it is absent.
    let dist = Path::new("crates/triview-ui/dist");
    let index = dist.join("index.html");
    if !index.exists() {
        let written = std::fs::create_dir_all(dist).and_then(|()| {
            std::fs::write(
                &index,
                "<!DOCTYPE html><html><body>triview-ui not built</body></html>",
            )
        });
        if let Err(e) = written {
            println!("cargo:warning=could not write placeholder panel: {e}");
        }
    }

    // Re-run when the dist contents change (after trunk build).
    println!("cargo:rerun-if-changed=crates/triview-ui/dist");
}
