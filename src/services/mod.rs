mod batch;
mod embedding;
pub mod vector_store;

pub use batch::{batch_count, process_batch};
pub use embedding::EmbeddingClient;
pub use vector_store::{IndexDescription, IndexHandle, VectorStoreClient};
