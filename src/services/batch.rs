use anyhow::{Context, Result, bail};

use crate::models::{NormalizedRecord, VectorPoint};
use crate::services::{EmbeddingClient, VectorStoreClient, vector_store::IndexHandle};

/// Embed one batch of records and upsert the resulting vectors.
///
/// The embedding response is order-aligned with the batch, so ids, vectors,
/// and metadata zip positionally.
pub async fn process_batch(
    embedding_client: &EmbeddingClient,
    vector_client: &VectorStoreClient,
    handle: &IndexHandle,
    batch: &[NormalizedRecord],
) -> Result<u64> {
    if batch.is_empty() {
        return Ok(0);
    }

    let texts: Vec<String> = batch.iter().map(|r| r.text.clone()).collect();

    let embeddings = embedding_client
        .embed_batch(texts)
        .await
        .context("failed to generate embeddings")?;

    if embeddings.len() != batch.len() {
        bail!(
            "embedding count {} does not match batch size {}",
            embeddings.len(),
            batch.len()
        );
    }

    let points: Vec<VectorPoint> = batch
        .iter()
        .zip(embeddings)
        .map(|(record, values)| VectorPoint {
            id: record.id.clone(),
            values,
            metadata: record.metadata.clone(),
        })
        .collect();

    vector_client
        .upsert(handle, &points)
        .await
        .context("failed to upsert vectors")
}

/// Number of batches produced by chunking `total` records with `batch_size`.
pub fn batch_count(total: usize, batch_size: usize) -> usize {
    total.div_ceil(batch_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecordMetadata, SourceTag};

    fn records(n: usize) -> Vec<NormalizedRecord> {
        (0..n)
            .map(|i| NormalizedRecord {
                id: format!("tmcf_{}", i),
                text: format!("record {}", i),
                metadata: RecordMetadata {
                    source: SourceTag::TmcfJobs,
                    original: "{}".to_string(),
                },
            })
            .collect()
    }

    #[test]
    fn test_batch_count() {
        assert_eq!(batch_count(0, 100), 0);
        assert_eq!(batch_count(1, 100), 1);
        assert_eq!(batch_count(100, 100), 1);
        assert_eq!(batch_count(101, 100), 2);
        assert_eq!(batch_count(250, 100), 3);
    }

    #[test]
    fn test_chunks_partition_preserves_order() {
        let all = records(250);
        let batches: Vec<&[NormalizedRecord]> = all.chunks(100).collect();

        assert_eq!(batches.len(), batch_count(all.len(), 100));
        assert_eq!(batches[0].len(), 100);
        assert_eq!(batches[1].len(), 100);
        assert_eq!(batches[2].len(), 50);

        let reconstructed: Vec<&NormalizedRecord> =
            batches.into_iter().flatten().collect();
        assert_eq!(reconstructed.len(), all.len());
        for (original, rebuilt) in all.iter().zip(reconstructed) {
            assert_eq!(original.id, rebuilt.id);
        }
    }

    #[test]
    fn test_exact_multiple_has_no_short_batch() {
        let all = records(200);
        let batches: Vec<&[NormalizedRecord]> = all.chunks(100).collect();
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.len() == 100));
    }
}
