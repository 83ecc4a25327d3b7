// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer only talks to these traits, so the CSV
// loader and the on-disk artifact writer can be swapped without
// touching the use cases (tests use in-memory versions).

use serde::Serialize;

use crate::domain::error::PrepareResult;
use crate::domain::row::Row;

// ─── RowSource ────────────────────────────────────────────────────────────────
/// Anything that can produce the ordered (question, context) rows.
///
/// Implementations:
///   - CsvLoader → reads a comma-separated file with a header row
///   - Vec<Row>  → rows already in memory
pub trait RowSource {
    /// Load every row, preserving source order.
    fn load_rows(&self) -> PrepareResult<Vec<Row>>;
}

impl RowSource for Vec<Row> {
    fn load_rows(&self) -> PrepareResult<Vec<Row>> {
        Ok(self.clone())
    }
}

// ─── ArtifactSink ─────────────────────────────────────────────────────────────
/// Anything that can persist a named JSON document or JSON-lines stream.
///
/// Values are serialized directly rather than through
/// `serde_json::Value`, so maps keyed by `QueryId` / `CorpusId`
/// keep their numeric order in the written file.
///
/// Implementations:
///   - ArtifactWriter → files under an output directory
pub trait ArtifactSink {
    /// Write one pretty-printed JSON document under `name`.
    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> PrepareResult<()>;

    /// Write one JSON value per line under `name`.
    fn write_jsonl<T: Serialize>(&self, name: &str, values: &[T]) -> PrepareResult<()>;
}
