use std::collections::HashMap;
use std::sync::Mutex;

use xml_content_model::config::EnvProvider;

/// Environment provider backed by a fixed map, recording every lookup
#[derive(Default)]
pub struct MockEnv {
    vars: HashMap<String, String>,
    lookups: Mutex<Vec<String>>,
}

impl MockEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Keys requested so far, in order
    pub fn lookups(&self) -> Vec<String> {
        self.lookups
            .lock()
            .map(|lookups| lookups.clone())
            .unwrap_or_default()
    }
}

impl EnvProvider for MockEnv {
    fn get(&self, key: &str) -> Option<String> {
        if let Ok(mut lookups) = self.lookups.lock() {
            lookups.push(key.to_string());
        }
        self.vars.get(key).cloned()
    }
}
