//! Per-category job sequencing.

use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::IndexingError;
use kg_indexer_pipeline::orchestrator::{Indexor, JobSummary};
use kg_indexer_shared::ResourceCategory;

/// Index each category in turn.
///
/// Categories run one after the other; the first fatal error aborts the
/// remaining ones.
#[instrument(skip(indexor, categories), fields(index = %indexor.config().index_name))]
pub async fn run_categories(
    indexor: &Indexor,
    categories: &[ResourceCategory],
) -> Result<Vec<JobSummary>, IndexingError> {
    let mut summaries = Vec::with_capacity(categories.len());

    for category in categories {
        info!(category = %category, "Indexing category");
        let summary = indexor.index_category(category).await?;
        info!(summary = %summary_json(&summary), "Category complete");
        summaries.push(summary);
    }

    Ok(summaries)
}

/// Render a job summary as a JSON object for the log.
pub fn summary_json(summary: &JobSummary) -> Value {
    json!({
        "category": summary.category.as_str(),
        "index": summary.index_name,
        "total": summary.total,
        "pages": summary.pages,
        "failed_pages": summary.failed_pages,
        "documents_indexed": summary.documents_indexed,
        "dropped": summary.dropped,
        "started_at": summary.started_at.to_rfc3339(),
        "finished_at": summary.finished_at.map(|t| t.to_rfc3339()),
        "elapsed_ms": summary.elapsed().map(|d| d.as_millis() as u64),
    })
}
