mod config;
mod record;

pub use config::{
    Config, DEFAULT_BATCH_SIZE, DEFAULT_EMBEDDING_DIMENSION, DEFAULT_EMBEDDING_MODEL,
    DEFAULT_INDEX, DEFAULT_METRIC, DEFAULT_PINECONE_URL, DEFAULT_REGION, EmbeddingConfig,
    ENV_OPENAI_API_KEY, ENV_PINECONE_API_KEY, ENV_PINECONE_REGION, IndexingConfig, RetrySettings,
    VectorStoreConfig, require_env,
};
pub use record::{NormalizedRecord, RecordMetadata, SourceTag, VectorPoint};
