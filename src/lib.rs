pub mod document;
pub mod server;
pub mod utils;

pub use document::{
    CellDetection, ConfidenceSummary, DocumentError, DocumentResult, MergePipeline, OcrDocument,
    TableDocument, TextItem, TextRegion,
};
pub use server::{create_app, start_server};
pub use utils::config::{AppConfig, MergeConfig};
