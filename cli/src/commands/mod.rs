pub mod chat;
pub mod classify;
pub mod health;
pub mod stats;
