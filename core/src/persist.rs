use crate::export::{export_postings, parse_postings, PostingsWriter};
use crate::{InvertedIndex, Posting};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: usize,
    pub created_at: String,
    pub version: u32,
}

impl MetaFile {
    pub fn for_index(index: &InvertedIndex) -> Self {
        Self {
            num_docs: index.num_docs(),
            num_terms: index.num_terms(),
            created_at: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_default(),
            version: FORMAT_VERSION,
        }
    }
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn index(&self) -> PathBuf { self.root.join("index.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
    pub fn postings_text(&self) -> PathBuf { self.root.join("postings.txt") }
}

pub fn save_index(paths: &IndexPaths, index: &InvertedIndex) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.index())?;
    let bytes = bincode::serialize(index)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_index(paths: &IndexPaths) -> Result<InvertedIndex> {
    let path = paths.index();
    let mut f = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let index = bincode::deserialize(&buf)?;
    Ok(index)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let path = paths.meta();
    let mut f = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Write the text postings dump to `postings.txt` under the index root.
pub fn save_postings_text(paths: &IndexPaths, index: &InvertedIndex) -> Result<PathBuf> {
    create_dir_all(&paths.root)?;
    let path = paths.postings_text();
    let f = File::create(&path)?;
    let mut writer = PostingsWriter::new(BufWriter::new(f));
    export_postings(index, &mut writer)?;
    Ok(path)
}

/// Persist the index, its meta file and the postings dump.
pub fn save_snapshot(paths: &IndexPaths, index: &InvertedIndex) -> Result<MetaFile> {
    let meta = MetaFile::for_index(index);
    save_index(paths, index)?;
    save_meta(paths, &meta)?;
    save_postings_text(paths, index)?;
    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, "snapshot saved");
    Ok(meta)
}

/// Load an index and check it against its meta file.
pub fn load_snapshot(paths: &IndexPaths) -> Result<(InvertedIndex, MetaFile)> {
    let meta = load_meta(paths)?;
    if meta.version != FORMAT_VERSION {
        bail!("unsupported index version {} (expected {FORMAT_VERSION})", meta.version);
    }
    let index = load_index(paths)?;
    if index.num_docs() != meta.num_docs || index.num_terms() != meta.num_terms {
        bail!(
            "index.bin does not match meta.json ({} docs / {} terms vs {} / {})",
            index.num_docs(),
            index.num_terms(),
            meta.num_docs,
            meta.num_terms
        );
    }
    Ok((index, meta))
}

/// Parse a postings dump from disk.
pub fn load_postings_text(path: &Path) -> Result<BTreeMap<String, Vec<Posting>>> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_postings(BufReader::new(f))
}
