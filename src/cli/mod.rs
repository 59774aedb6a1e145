//! CLI definition for the opportunity indexer.

pub mod output;
pub mod run;

use std::path::PathBuf;

use clap::Parser;

/// Batch-embed TMCF job postings and UNCF funding opportunities into Pinecone.
#[derive(Debug, Parser)]
#[command(name = "oppindex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TMCF jobs JSON file
    #[arg(long)]
    pub jobs: Option<PathBuf>,

    /// Path to the UNCF opportunities JSON file
    #[arg(long)]
    pub opportunities: Option<PathBuf>,

    /// Records per embedding/upsert batch
    #[arg(long)]
    pub batch_size: Option<u32>,

    /// Destination Pinecone index name
    #[arg(long)]
    pub index: Option<String>,

    /// Parse and normalize the input files without calling any API
    #[arg(long)]
    pub validate_only: bool,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
