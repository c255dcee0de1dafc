use async_trait::async_trait;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::application::ports::{DocumentLoadError, DocumentLoader};
use crate::domain::entities::SourceDocument;
use crate::domain::value_objects::{ChunkMetadata, DocumentFormat};

const DOCUMENT_XML: &str = "word/document.xml";

/// Reads the main body part of a Word document as plain text.
pub struct DocxLoader;

impl DocxLoader {
    pub fn new() -> Self {
        Self
    }

    fn read_document_xml(path: &Path) -> Result<String, DocumentLoadError> {
        let file = File::open(path).map_err(|e| DocumentLoadError::IoError(e.to_string()))?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| DocumentLoadError::CorruptedFile(e.to_string()))?;
        let mut entry = archive.by_name(DOCUMENT_XML).map_err(|e| {
            DocumentLoadError::CorruptedFile(format!("{} missing: {}", DOCUMENT_XML, e))
        })?;

        let mut xml = String::new();
        entry
            .read_to_string(&mut xml)
            .map_err(|e| DocumentLoadError::CorruptedFile(e.to_string()))?;
        Ok(xml)
    }
}

impl Default for DocxLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Text runs, tabs, breaks and paragraph ends, in document order.
fn xml_to_text(xml: &str) -> Result<String, DocumentLoadError> {
    let token_regex =
        Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab\s*/>|<w:(?:br|cr)\s*/>|</w:p>")
            .map_err(|e| DocumentLoadError::ExtractionFailed(e.to_string()))?;

    let mut text = String::new();
    for caps in token_regex.captures_iter(xml) {
        if let Some(run) = caps.get(1) {
            text.push_str(&unescape_xml(run.as_str()));
            continue;
        }

        let token = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        if token.starts_with("<w:tab") {
            text.push('\t');
        } else if token == "</w:p>" {
            text.push_str("\n\n");
        } else {
            text.push('\n');
        }
    }

    Ok(text.trim().to_string())
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[async_trait]
impl DocumentLoader for DocxLoader {
    async fn load(&self, file_path: &Path) -> Result<Vec<SourceDocument>, DocumentLoadError> {
        let path: PathBuf = file_path.to_path_buf();
        let xml = tokio::task::spawn_blocking(move || Self::read_document_xml(&path))
            .await
            .map_err(|e| DocumentLoadError::ExtractionFailed(e.to_string()))??;

        let text = xml_to_text(&xml)?;

        let mut metadata = ChunkMetadata::new();
        metadata.set_source(file_path.display().to_string());

        Ok(vec![SourceDocument::new(text, metadata)])
    }

    fn can_load(&self, format: DocumentFormat) -> bool {
        format == DocumentFormat::Docx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::write_docx;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
<w:p><w:r><w:t>Quarterly</w:t></w:r><w:r><w:t xml:space="preserve"> report</w:t></w:r></w:p>
<w:p><w:r><w:t>Revenue</w:t><w:tab/><w:t>&lt;up&gt; &amp; growing</w:t><w:br/><w:t>Next line</w:t></w:r></w:p>
<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
</w:body>
</w:document>"#;

    #[test]
    fn test_xml_to_text_keeps_structure() {
        let text = xml_to_text(BODY).unwrap();

        assert_eq!(
            text,
            "Quarterly report\n\nRevenue\t<up> & growing\nNext line\n\nCell"
        );
    }

    #[test]
    fn test_unescape_amp_last() {
        assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
    }

    #[tokio::test]
    async fn test_load_docx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temp_notes.docx");
        write_docx(&path, Some(BODY));

        let documents = DocxLoader::new().load(&path).await.unwrap();

        assert_eq!(documents.len(), 1);
        assert!(documents[0].text().starts_with("Quarterly report"));
        assert_eq!(
            documents[0].metadata().source(),
            Some(path.display().to_string().as_str())
        );
    }

    #[tokio::test]
    async fn test_archive_without_body_is_corrupted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.docx");
        write_docx(&path, None);

        let result = DocxLoader::new().load(&path).await;

        assert!(matches!(result, Err(DocumentLoadError::CorruptedFile(_))));
    }

    #[tokio::test]
    async fn test_not_a_zip_is_corrupted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.docx");
        std::fs::write(&path, b"plain text").unwrap();

        let result = DocxLoader::new().load(&path).await;

        assert!(matches!(result, Err(DocumentLoadError::CorruptedFile(_))));
    }
}
