use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Site-wide counters. Every field only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Counters {
    pub visits: u64,
    pub uploads: u64,
    pub refusals: u64,
    pub chat_messages: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterField {
    Visits,
    Uploads,
    Refusals,
    ChatMessages,
}

impl CounterField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterField::Visits => "visits",
            CounterField::Uploads => "uploads",
            CounterField::Refusals => "refusals",
            CounterField::ChatMessages => "chat_messages",
        }
    }
}

impl Counters {
    pub fn get(&self, field: CounterField) -> u64 {
        match field {
            CounterField::Visits => self.visits,
            CounterField::Uploads => self.uploads,
            CounterField::Refusals => self.refusals,
            CounterField::ChatMessages => self.chat_messages,
        }
    }

    /// Add one to `field`, saturating at `u64::MAX`.
    pub fn increment(&mut self, field: CounterField) {
        let slot = match field {
            CounterField::Visits => &mut self.visits,
            CounterField::Uploads => &mut self.uploads,
            CounterField::Refusals => &mut self.refusals,
            CounterField::ChatMessages => &mut self.chat_messages,
        };
        *slot = slot.saturating_add(1);
    }
}
