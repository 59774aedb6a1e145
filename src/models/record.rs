//! Record types flowing through the indexing pipeline.

use serde::{Deserialize, Serialize};

/// Which source file a record came from.
///
/// The tag fixes the id prefix, the `metadata.source` value, and the field
/// schema used to render the embedding text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    TmcfJobs,
    UncfOpportunities,
}

impl SourceTag {
    /// Stable name stored in vector metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::TmcfJobs => "tmcf_jobs",
            SourceTag::UncfOpportunities => "uncf_opportunities",
        }
    }

    /// Prefix used when building record ids (`tmcf_0`, `uncf_0`, ...).
    pub fn id_prefix(&self) -> &'static str {
        match self {
            SourceTag::TmcfJobs => "tmcf",
            SourceTag::UncfOpportunities => "uncf",
        }
    }

    /// Labeled fields rendered into the embedding text, in order.
    ///
    /// The label doubles as the lookup key in the source object.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            SourceTag::TmcfJobs => &["Job Title", "Location", "Type", "URL"],
            SourceTag::UncfOpportunities => &[
                "Program Name",
                "Program Type",
                "Award Year",
                "Open Date",
                "Deadline",
                "Application Link",
            ],
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata stored alongside each vector.
///
/// `original` holds the serialized source element so the full record can be
/// recovered from a query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub source: SourceTag,
    pub original: String,
}

/// A source element normalized into the uniform pipeline shape.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// Globally unique: `{prefix}_{index}` within the source file.
    pub id: String,
    /// Flattened human-readable description, never empty.
    pub text: String,
    pub metadata: RecordMetadata,
}

/// The unit accepted by the vector store: id, embedding, metadata.
#[derive(Debug, Clone, Serialize)]
pub struct VectorPoint {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: RecordMetadata,
}
