use thiserror::Error;

#[derive(Error, Debug)]
pub enum EpubError {
    #[error("not an EPUB file: {0}")]
    NotAnEpub(String),

    #[error("corrupt container: {0}")]
    CorruptContainer(String),

    #[error("package document not found in archive: {0}")]
    MissingPackageDocument(String),

    #[error("malformed package document {path}: {reason}")]
    MalformedPackageDocument { path: String, reason: String },

    #[error("resource not found: {path}")]
    ResourceNotFound { path: String },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EpubError {
    /// Errors that mean "no readable publication structure" rather than a
    /// failure of the caller's request.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            EpubError::NotAnEpub(_)
                | EpubError::CorruptContainer(_)
                | EpubError::MissingPackageDocument(_)
                | EpubError::MalformedPackageDocument { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EpubError>;
