// ============================================================
// Layer 6 — Artifact Writer
// ============================================================
// Writes prepared datasets to an output directory in formats an
// external trainer can load directly:
//
//   prepared/embedding/
//     queries.json               ← {"train-0": "question", ...}
//     corpus.json                ← {"train-0": "passage", ...}
//     relevant_docs.json         ← {"train-0": ["train-0"], ...}
//     relevant_docs.train.json
//     relevant_docs.eval.json
//     train_pairs.jsonl          ← {"anchor": ..., "positive": ...}
//     eval_pairs.jsonl
//     training_plan.json
//     stats.json
//
// JSON documents are pretty-printed; JSONL files hold one compact
// object per line. Text is written as UTF-8 without escaping
// non-ASCII characters, so Vietnamese stays readable.

use serde::Serialize;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::PathBuf,
};

use crate::domain::error::PrepareResult;
use crate::domain::traits::ArtifactSink;

/// Writes artifacts as files under one directory.
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    /// Create the writer, creating the directory (and parents) if needed.
    pub fn new(dir: impl Into<PathBuf>) -> PrepareResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn create(&self, name: &str) -> PrepareResult<BufWriter<File>> {
        let path = self.dir.join(name);
        tracing::debug!("Writing '{}'", path.display());
        Ok(BufWriter::new(File::create(path)?))
    }
}

impl ArtifactSink for ArtifactWriter {
    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> PrepareResult<()> {
        let mut out = self.create(name)?;
        serde_json::to_writer_pretty(&mut out, value)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }

    fn write_jsonl<T: Serialize>(&self, name: &str, values: &[T]) -> PrepareResult<()> {
        let mut out = self.create(name)?;
        for value in values {
            serde_json::to_writer(&mut out, value)?;
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }
}
