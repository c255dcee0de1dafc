use async_trait::async_trait;
use lopdf::{Document, Object};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::path::{Path, PathBuf};

use crate::application::ports::{DocumentLoadError, DocumentLoader};
use crate::domain::entities::SourceDocument;
use crate::domain::value_objects::{ChunkMetadata, DocumentFormat};

/// One [`SourceDocument`] per page, pages numbered from 0.
pub struct PdfLoader {
    password: String,
}

impl PdfLoader {
    pub fn new() -> Self {
        Self {
            password: String::new(),
        }
    }

    fn filter_func(object_id: (u32, u16), object: &mut Object) -> Option<((u32, u16), Object)> {
        static IGNORE: &[&[u8]] = &[
            b"Length",
            b"BBox",
            b"Matrix",
            b"Filter",
            b"ColorSpace",
            b"Width",
            b"Height",
            b"BitsPerComponent",
            b"PTEX.FileName",
            b"PTEX.PageNumber",
            b"PTEX.InfoDict",
            b"FontDescriptor",
            b"ExtGState",
            b"MediaBox",
        ];

        if let Object::Dictionary(dict) = object {
            let keys_to_remove: Vec<_> = dict
                .iter()
                .filter(|(key, _)| IGNORE.contains(&key.as_slice()))
                .map(|(key, _)| key.clone())
                .collect();
            for key in keys_to_remove {
                dict.remove(&key);
            }
        }

        Some((object_id, object.to_owned()))
    }

    fn load_pages(path: &Path, password: &str) -> Result<Vec<SourceDocument>, DocumentLoadError> {
        let mut doc = Document::load_filtered(path, Self::filter_func)
            .map_err(|e| DocumentLoadError::CorruptedFile(e.to_string()))?;

        if doc.is_encrypted() {
            doc.decrypt(password).map_err(|_| {
                DocumentLoadError::ExtractionFailed(
                    "Failed to decrypt PDF - invalid password".to_string(),
                )
            })?;
        }

        let source = path.display().to_string();
        let page_numbers: Vec<u32> = doc.get_pages().into_keys().collect();

        let mut pages: Vec<(u32, String)> = page_numbers
            .into_par_iter()
            .map(|page_num| {
                let text = match doc.extract_text(&[page_num]) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(
                            "Failed to extract text from page {} of {}: {}",
                            page_num,
                            source,
                            e
                        );
                        String::new()
                    }
                };

                let lines: Vec<&str> = text
                    .split('\n')
                    .map(str::trim_end)
                    .filter(|line| !line.is_empty())
                    .collect();

                (page_num, lines.join("\n"))
            })
            .collect();
        pages.sort_by_key(|(page_num, _)| *page_num);

        Ok(pages
            .into_iter()
            .map(|(page_num, text)| {
                let mut metadata = ChunkMetadata::new();
                metadata.set_source(source.clone());
                metadata.set_page(page_num.saturating_sub(1));
                SourceDocument::new(text, metadata)
            })
            .collect())
    }
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentLoader for PdfLoader {
    async fn load(&self, file_path: &Path) -> Result<Vec<SourceDocument>, DocumentLoadError> {
        let path: PathBuf = file_path.to_path_buf();
        let password = self.password.clone();

        tokio::task::spawn_blocking(move || Self::load_pages(&path, &password))
            .await
            .map_err(|e| DocumentLoadError::ExtractionFailed(e.to_string()))?
    }

    fn can_load(&self, format: DocumentFormat) -> bool {
        format == DocumentFormat::Pdf
    }
}
