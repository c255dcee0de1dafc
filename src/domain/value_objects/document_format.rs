use std::fmt;
use std::path::Path;

pub const ALLOWED_EXTENSIONS: [&str; 3] = [".pdf", ".docx", ".html"];

/// Upload formats the indexer knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedFileType(pub String);

impl fmt::Display for UnsupportedFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unsupported file type '{}'. Allowed: {}",
            self.0,
            ALLOWED_EXTENSIONS.join(", ")
        )
    }
}

impl std::error::Error for UnsupportedFileType {}

impl DocumentFormat {
    pub fn from_extension(extension: &str) -> Result<Self, UnsupportedFileType> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "html" => Ok(DocumentFormat::Html),
            other => Err(UnsupportedFileType(other.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, UnsupportedFileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| UnsupportedFileType(path.display().to_string()))?;

        Self::from_extension(extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Html => "html",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
