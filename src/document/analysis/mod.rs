pub mod pipeline;
pub mod result;
pub mod splitter;
pub mod summary;

pub use pipeline::{ItemOutcome, MergePipeline};
pub use result::{
    to_document_result, AssignmentMethod, CellWithText, DocumentResult, EmptyCell,
    ResultMetadata, SpanningAssignment, UnassignedText,
};
pub use summary::ConfidenceSummary;
