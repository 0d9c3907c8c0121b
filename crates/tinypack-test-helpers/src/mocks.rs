//! Mock implementations for testing

use std::sync::Mutex;
use tinypack_core::emitter::{BundleData, BundleRenderer};
use tinypack_core::errors::Result;

/// A renderer that records the data it was given as JSON and renders it verbatim
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Mutex<Vec<serde_json::Value>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<serde_json::Value> {
        self.calls.lock().unwrap().clone()
    }
}

impl BundleRenderer for RecordingRenderer {
    fn render(&self, data: &BundleData<'_>) -> Result<String> {
        let value = serde_json::to_value(data).unwrap();
        let text = serde_json::to_string_pretty(&value).unwrap();
        self.calls.lock().unwrap().push(value);
        Ok(text)
    }
}
