use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoxError {
    #[error("Region has {count} point(s), at least 2 are required")]
    TooFewPoints { count: usize },

    #[error("Region contains a non-finite coordinate")]
    NonFiniteCoordinate,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration")]
    Parse {
        #[from]
        source: serde_json::Error,
    },

    #[error("Invalid value for `{field}`: {message}")]
    InvalidValue { field: &'static str, message: String },
}

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to load image: {path}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save image: {path}")]
    Save {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to read font file: {path}")]
    FontRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse font file: {path}")]
    FontParse {
        path: String,
        #[source]
        source: ab_glyph::InvalidFont,
    },
}
