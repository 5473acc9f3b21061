pub mod barrace;
pub mod daily;
pub mod extract;
pub mod switchiest;

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use xega_bench::BenchmarkFile;

pub fn load_benchmark(path: &Path) -> Result<BenchmarkFile> {
    BenchmarkFile::load(path).with_context(|| format!("loading benchmark {}", path.display()))
}

pub fn create_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}

/// Write `bytes` to `path`, creating missing parent directories first.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    create_parent_dirs(path)?;
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

/// JSON with a custom indent string, e.g. `b" "` for one-space indentation.
pub fn to_json_indented<T: Serialize + ?Sized>(value: &T, indent: &[u8]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer).context("encoding JSON")?;
    Ok(buf)
}
