pub mod compute;
pub mod engine;
pub mod entities;
pub mod error;
pub mod settings;
pub mod stats;
