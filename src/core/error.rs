use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid scale factor: {0} (must be finite and > 0)")]
    InvalidScale(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Render channel closed")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, RenderError>;
