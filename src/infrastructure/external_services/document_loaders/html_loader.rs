use async_trait::async_trait;
use html2text::from_read;
use std::path::Path;

use crate::application::ports::{DocumentLoadError, DocumentLoader};
use crate::domain::entities::SourceDocument;
use crate::domain::value_objects::{ChunkMetadata, DocumentFormat};

const TEXT_WIDTH: usize = 80;

pub struct HtmlLoader;

impl HtmlLoader {
    pub fn new() -> Self {
        Self
    }

    fn html_to_text(html_content: &[u8]) -> Result<String, DocumentLoadError> {
        from_read(html_content, TEXT_WIDTH).map_err(|e| {
            DocumentLoadError::ExtractionFailed(format!("Failed to convert HTML to text: {}", e))
        })
    }
}

impl Default for HtmlLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_title_from_html(html: &str) -> Option<String> {
    let title_regex = regex::Regex::new(r"(?is)<title[^>]*>([^<]+)</title>").ok()?;
    title_regex
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|title| !title.is_empty())
}

#[async_trait]
impl DocumentLoader for HtmlLoader {
    async fn load(&self, file_path: &Path) -> Result<Vec<SourceDocument>, DocumentLoadError> {
        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|e| DocumentLoadError::IoError(e.to_string()))?;

        let text = Self::html_to_text(&bytes)?;

        let mut metadata = ChunkMetadata::new();
        metadata.set_source(file_path.display().to_string());
        if let Some(title) = extract_title_from_html(&String::from_utf8_lossy(&bytes)) {
            metadata.set_title(title);
        }

        Ok(vec![SourceDocument::new(text, metadata)])
    }

    fn can_load(&self, format: DocumentFormat) -> bool {
        format == DocumentFormat::Html
    }
}
