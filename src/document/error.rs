use std::path::PathBuf;

use thiserror::Error;

use crate::utils::error::BoxError;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("Unrecognized input shape: {message}")]
    UnrecognizedShape { message: String },

    #[error("Geometry processing failed for text item {text_id}")]
    ProcessingFault {
        text_id: usize,
        #[source]
        source: BoxError,
    },

    #[error("Failed to load input file: {path}")]
    InputLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse input file: {path}")]
    InputParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write output file: {path}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize result")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}
