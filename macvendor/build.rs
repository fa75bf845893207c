//! Compiles `data/vendors.json` into the compressed trie artifact that
//! `src/lib.rs` embeds with `include_bytes!`.

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use macvendor_core::{codec, normalize, Trie};

/// Artifact file name inside `OUT_DIR`.
const ARTIFACT: &str = "embedb.bin.zst";

fn main() -> Result<()> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let source = manifest_dir.join("data").join("vendors.json");
    println!("cargo:rerun-if-changed={}", source.display());

    let file = File::open(&source).with_context(|| format!("opening {}", source.display()))?;
    let records = normalize::load_records(BufReader::new(file))
        .with_context(|| format!("normalizing {}", source.display()))?;
    let trie = Trie::from_records(records)?;
    let artifact = codec::encode(&trie)?;

    let out = PathBuf::from(env::var("OUT_DIR")?).join(ARTIFACT);
    std::fs::write(&out, artifact).with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}
