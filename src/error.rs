use thiserror::Error;

/// Main error type for the promo-slate library
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Slide rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Slide rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No usable caption font found; searched {searched} locations")]
    FontUnavailable { searched: usize },

    #[error("Failed to load caption font: {path}")]
    FontLoadFailed { path: String },
}

/// Timeline composition and synchronization errors
#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("Audio/visual duration mismatch: audio {audio:.3}s, visual {visual:.3}s")]
    DurationMismatch { audio: f64, visual: f64 },
}

/// Audio probing and synthesis errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to probe audio file: {path}")]
    ProbeFailed { path: String },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Speech synthesis failed: {reason}")]
    SynthesisFailed { reason: String },
}

/// Video export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Video encoding failed: {reason}")]
    EncodingFailed { reason: String },

    #[error("Failed to create output directory: {path}")]
    DirectoryCreationFailed { path: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Product catalog input errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read product file: {path}")]
    ReadFailed { path: String },

    #[error("Failed to parse product file: {path}: {reason}")]
    ParseFailed { path: String, reason: String },
}

/// Convenience type alias for Results using PipelineError
pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Render(RenderError::FontUnavailable { .. }) => {
                "No caption font available. Set render.font_path in the configuration file.".to_string()
            }
            Self::Audio(AudioError::ProbeFailed { path }) => {
                format!("Could not read audio file '{}'. Please check the file is a supported format.", path)
            }
            Self::Export(ExportError::EncodingFailed { reason }) => {
                format!("Video encoding failed: {}. Is ffmpeg installed and on PATH?", reason)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
