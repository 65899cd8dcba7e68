//! Build script for spotinsight.
//!
//! Copies the `.env.example` template into the local data directory so the
//! secrets file can be created next to it:
//! - Linux: `~/.local/share/spotinsight/.env.example`
//! - macOS: `~/Library/Application Support/spotinsight/.env.example`
//! - Windows: `%LOCALAPPDATA%/spotinsight/.env.example`
//!
//! A missing template only produces a cargo warning.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("spotinsight");
    fs::create_dir_all(&out_dir)?;

    if template.is_file() {
        fs::copy(&template, out_dir.join(".env.example"))?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            template.display()
        );
    }

    Ok(())
}
