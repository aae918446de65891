use thiserror::Error;

/// Crate-wide error type.
/// Aggregates errors from the standard library, dependencies and the
/// spreadsheet / workflow / config modules.
#[derive(Error, Debug)]
pub enum AuditError {
    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    // Third-party library errors
    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    HttpError(#[from] reqwest::Error),

    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error("{0}")]
    XmlEscapeError(#[from] quick_xml::escape::EscapeError),

    // Module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::spreadsheet::xml::XmlError),

    #[error("{0}")]
    SheetError(#[from] crate::spreadsheet::SheetError),

    #[error("{0}")]
    ScenarioError(#[from] crate::models::ScenarioError),

    #[error("{0}")]
    ConfigError(#[from] crate::config::ConfigError),
}
