use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::application::ports::{ChatModel, ChatModelError, ChatModelFactory};
use crate::domain::value_objects::ModelName;

/// One chat client per model name, built on first use and shared afterwards.
pub struct ChatModelCache {
    factory: Arc<dyn ChatModelFactory>,
    models: RwLock<HashMap<ModelName, Arc<dyn ChatModel>>>,
}

impl ChatModelCache {
    pub fn new(factory: Arc<dyn ChatModelFactory>) -> Self {
        Self {
            factory,
            models: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, model: ModelName) -> Result<Arc<dyn ChatModel>, ChatModelError> {
        if let Ok(models) = self.models.read() {
            if let Some(existing) = models.get(&model) {
                return Ok(Arc::clone(existing));
            }
        }

        let mut models = self
            .models
            .write()
            .map_err(|_| ChatModelError::Configuration("Chat model cache poisoned".to_string()))?;

        // Another request may have built it while we waited for the lock.
        if let Some(existing) = models.get(&model) {
            return Ok(Arc::clone(existing));
        }

        let created = self.factory.create(model)?;
        tracing::info!("Initialized chat model {}", model);
        models.insert(model, Arc::clone(&created));

        Ok(created)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.models.read().map(|models| models.len()).unwrap_or(0)
    }
}
