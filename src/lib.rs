pub mod config;
pub mod diagnostics;
pub mod export;
pub mod index;
pub mod ingest;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod occupation;
pub mod pipeline;
pub mod population;
pub mod resolve;
