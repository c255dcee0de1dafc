use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const FILE_ID_KEY: &str = "file_id";
pub const SOURCE_KEY: &str = "source";
pub const PAGE_KEY: &str = "page";
pub const TITLE_KEY: &str = "title";

/// Free-form provenance attached to loaded documents and their chunks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkMetadata {
    properties: HashMap<String, serde_json::Value>,
}

impl ChunkMetadata {
    pub fn new() -> Self {
        Self {
            properties: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn with_property(mut self, key: &str, value: serde_json::Value) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    pub fn set_property(&mut self, key: &str, value: serde_json::Value) {
        self.properties.insert(key.to_string(), value);
    }

    pub fn get_property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn set_file_id(&mut self, file_id: i32) {
        self.set_property(FILE_ID_KEY, serde_json::Value::Number(file_id.into()));
    }

    pub fn file_id(&self) -> Option<i32> {
        self.get_property(FILE_ID_KEY)
            .and_then(|v| v.as_i64())
            .and_then(|n| i32::try_from(n).ok())
    }

    pub fn set_source(&mut self, source: String) {
        self.set_property(SOURCE_KEY, serde_json::Value::String(source));
    }

    #[cfg(test)]
    pub fn source(&self) -> Option<&str> {
        self.get_property(SOURCE_KEY).and_then(|v| v.as_str())
    }

    pub fn set_page(&mut self, page: u32) {
        self.set_property(PAGE_KEY, serde_json::Value::Number(page.into()));
    }

    #[cfg(test)]
    pub fn page(&self) -> Option<u32> {
        self.get_property(PAGE_KEY)
            .and_then(|v| v.as_u64())
            .and_then(|n| u32::try_from(n).ok())
    }

    pub fn set_title(&mut self, title: String) {
        self.set_property(TITLE_KEY, serde_json::Value::String(title));
    }

    #[cfg(test)]
    pub fn title(&self) -> Option<&str> {
        self.get_property(TITLE_KEY).and_then(|v| v.as_str())
    }
}

impl From<ChunkMetadata> for serde_json::Value {
    fn from(metadata: ChunkMetadata) -> Self {
        serde_json::Value::Object(metadata.properties.into_iter().collect())
    }
}

impl TryFrom<serde_json::Value> for ChunkMetadata {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(map) => Ok(Self {
                properties: map.into_iter().collect(),
            }),
            serde_json::Value::Null => Ok(Self::new()),
            _ => Err("Metadata must be a JSON object".to_string()),
        }
    }
}
