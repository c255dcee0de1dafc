use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use super::{DocxLoader, HtmlLoader, PdfLoader};
use crate::application::ports::{DocumentLoadError, DocumentLoader};
use crate::domain::entities::SourceDocument;
use crate::domain::value_objects::DocumentFormat;

/// Picks a loader by file extension.
pub struct CompositeDocumentLoader {
    loaders: Vec<Arc<dyn DocumentLoader>>,
}

impl CompositeDocumentLoader {
    pub fn new() -> Self {
        Self {
            loaders: vec![
                Arc::new(PdfLoader::new()),
                Arc::new(DocxLoader::new()),
                Arc::new(HtmlLoader::new()),
            ],
        }
    }

    fn loader_for(&self, format: DocumentFormat) -> Option<&Arc<dyn DocumentLoader>> {
        self.loaders.iter().find(|loader| loader.can_load(format))
    }
}

impl Default for CompositeDocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentLoader for CompositeDocumentLoader {
    async fn load(&self, file_path: &Path) -> Result<Vec<SourceDocument>, DocumentLoadError> {
        let format = DocumentFormat::from_path(file_path)?;

        let loader = self.loader_for(format).ok_or_else(|| {
            DocumentLoadError::ExtractionFailed(format!("No loader registered for {}", format))
        })?;

        tracing::debug!("Loading {} as {}", file_path.display(), format);
        loader.load(file_path).await
    }

    fn can_load(&self, format: DocumentFormat) -> bool {
        self.loader_for(format).is_some()
    }
}
