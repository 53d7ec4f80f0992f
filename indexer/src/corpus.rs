use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Read every regular file directly under `dir` as one document.
///
/// The document id is the file name. Files are returned sorted by name so a
/// rebuild of the same directory produces identical postings order.
pub fn read_corpus(dir: &Path) -> Result<Vec<(String, String)>> {
    if !dir.is_dir() {
        bail!("corpus directory {} does not exist", dir.display());
    }

    let mut docs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(file = %name, "not valid UTF-8, decoding lossily");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        docs.push((name, text));
    }
    Ok(docs)
}
