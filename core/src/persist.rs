//! Single-file index snapshot.
//!
//! Layout: `[bincode payload][magic "KWS1"][CRC32 of payload, BE]`. The file is written to a
//! temporary path and renamed into place, so a reader sees either the previous snapshot or
//! the complete new one.

use crate::error::{Error, Result};
use crate::index::{DocId, Document, InvertedIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs::{self, create_dir_all, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;

pub const FORMAT_VERSION: u32 = 1;
const SNAPSHOT_MAGIC: &[u8; 4] = b"KWS1";
const FOOTER_LEN: usize = 8;

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn snapshot(&self) -> PathBuf { self.root.join("index.bin") }
    fn snapshot_tmp(&self) -> PathBuf { self.root.join("index.bin.tmp") }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub version: u32,
    pub created_at: String,
    pub num_docs: u32,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    header: SnapshotHeader,
    postings: &'a HashMap<String, BTreeSet<DocId>>,
    documents: &'a [Document],
    term_frequencies: &'a HashMap<DocId, HashMap<String, u32>>,
    doc_lengths: &'a HashMap<DocId, u32>,
}

#[derive(Deserialize)]
struct Snapshot {
    header: SnapshotHeader,
    postings: HashMap<String, BTreeSet<DocId>>,
    documents: Vec<Document>,
    term_frequencies: HashMap<DocId, HashMap<String, u32>>,
    doc_lengths: HashMap<DocId, u32>,
}

/// Persist all four index mappings as one snapshot, replacing any previous one.
pub fn save(paths: &IndexPaths, index: &InvertedIndex) -> Result<SnapshotHeader> {
    create_dir_all(&paths.root)?;
    let num_docs = u32::try_from(index.num_docs()).map_err(|_| Error::TooManyDocuments(index.num_docs()))?;
    let header = SnapshotHeader {
        version: FORMAT_VERSION,
        created_at: time::OffsetDateTime::now_utc().format(&Rfc3339)?,
        num_docs,
    };
    let snapshot = SnapshotRef {
        header: header.clone(),
        postings: &index.postings,
        documents: &index.documents,
        term_frequencies: &index.term_frequencies,
        doc_lengths: &index.doc_lengths,
    };
    let bytes = bincode::serialize(&snapshot)?;
    let crc = crc32fast::hash(&bytes);

    let mut output = Vec::with_capacity(bytes.len() + FOOTER_LEN);
    output.extend_from_slice(&bytes);
    output.extend_from_slice(SNAPSHOT_MAGIC);
    output.extend_from_slice(&crc.to_be_bytes());

    let tmp = paths.snapshot_tmp();
    let mut f = File::create(&tmp)?;
    f.write_all(&output)?;
    // Contents must be durable before the rename makes them visible.
    f.sync_all()?;
    drop(f);
    fs::rename(&tmp, paths.snapshot())?;

    tracing::info!(path = %paths.snapshot().display(), bytes = output.len(), crc = format_args!("{crc:#010x}"), "saved index snapshot");
    Ok(header)
}

/// Load the snapshot written by [`save`].
pub fn load(paths: &IndexPaths) -> Result<InvertedIndex> {
    load_with_header(paths).map(|(_, index)| index)
}

pub fn load_with_header(paths: &IndexPaths) -> Result<(SnapshotHeader, InvertedIndex)> {
    let path = paths.snapshot();
    let raw = match fs::read(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::MissingArtifact { artifact: "index snapshot", path });
        }
        Err(e) => return Err(e.into()),
    };

    let payload = verify_footer(&raw)?;
    let header: SnapshotHeader = bincode::deserialize(payload)
        .map_err(|e| Error::CorruptSnapshot(format!("unreadable header: {e}")))?;
    if header.version != FORMAT_VERSION {
        return Err(Error::CorruptSnapshot(format!(
            "format version {} is not supported (expected {FORMAT_VERSION})",
            header.version
        )));
    }
    let snapshot: Snapshot = bincode::deserialize(payload)
        .map_err(|e| Error::CorruptSnapshot(format!("unreadable body: {e}")))?;
    if snapshot.header.num_docs as usize != snapshot.documents.len() {
        return Err(Error::CorruptSnapshot(format!(
            "header records {} documents but {} were stored",
            snapshot.header.num_docs,
            snapshot.documents.len()
        )));
    }
    let index = InvertedIndex::from_parts(
        snapshot.postings,
        snapshot.term_frequencies,
        snapshot.doc_lengths,
        snapshot.documents,
    )?;
    tracing::info!(path = %path.display(), num_docs = index.num_docs(), created_at = %header.created_at, "loaded index snapshot");
    Ok((header, index))
}

fn verify_footer(raw: &[u8]) -> Result<&[u8]> {
    if raw.len() < FOOTER_LEN || &raw[raw.len() - FOOTER_LEN..raw.len() - 4] != SNAPSHOT_MAGIC {
        return Err(Error::CorruptSnapshot("missing snapshot footer".into()));
    }
    let (payload, footer) = raw.split_at(raw.len() - FOOTER_LEN);
    let stored = u32::from_be_bytes([footer[4], footer[5], footer[6], footer[7]]);
    let computed = crc32fast::hash(payload);
    if stored != computed {
        return Err(Error::CorruptSnapshot(format!(
            "CRC32 mismatch: expected {stored:#010x}, got {computed:#010x}"
        )));
    }
    tracing::debug!(crc = format_args!("{stored:#010x}"), "snapshot checksum verified");
    Ok(payload)
}
