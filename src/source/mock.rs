//! An in-memory source, whose failures can be scripted

use std::error::Error;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::mock_behaviour::MockBehaviour;
use crate::tabular::{parse_tsv, Table};
use crate::traits::EventSource;

/// A source that serves TSV text from memory
pub struct MockSource {
    name: String,
    text: Mutex<String>,
    behaviour: Mutex<MockBehaviour>,
}

impl MockSource {
    pub fn new<S: ToString, T: ToString>(name: S, tsv: T) -> Self {
        Self::with_behaviour(name, tsv, MockBehaviour::new())
    }

    pub fn with_behaviour<S: ToString, T: ToString>(name: S, tsv: T, behaviour: MockBehaviour) -> Self {
        Self {
            name: name.to_string(),
            text: Mutex::new(tsv.to_string()),
            behaviour: Mutex::new(behaviour),
        }
    }

    /// Replace the contents served by the next fetches
    pub fn set_text<T: ToString>(&self, tsv: T) {
        *self.text.lock().unwrap() = tsv.to_string();
    }

    pub fn set_behaviour(&self, behaviour: MockBehaviour) {
        *self.behaviour.lock().unwrap() = behaviour;
    }
}

#[async_trait]
impl EventSource for MockSource {
    fn name(&self) -> &str { &self.name }

    async fn fetch_table(&self) -> Result<Table, Box<dyn Error>> {
        self.behaviour.lock().unwrap().can_fetch_table()?;
        let text = self.text.lock().unwrap().clone();
        Ok(parse_tsv(&text))
    }
}
