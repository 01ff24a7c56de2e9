use std::sync::Arc;

use perra_core::Responder;
use perra_core::clock::Clock;

use crate::counters::CounterStore;
use crate::uploads::UploadStore;

#[derive(Clone)]
pub struct AppState {
    pub responder: Arc<Responder>,
    pub counters: Arc<CounterStore>,
    pub uploads: UploadStore,
    pub clock: Arc<dyn Clock>,
    pub max_upload_bytes: usize,
}
