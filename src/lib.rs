//! Core library surface for the song library HTTP service.
//!
//! The binary only wires these pieces together; integration tests drive the
//! same router against an in-memory database.
pub mod config;
pub mod db;
pub mod enrichment;
pub mod error;
pub mod http;
pub mod models;
pub mod service;
pub mod verses;

pub use config::Config;
pub use error::SongError;
pub use models::{NewSong, Page, Song, SongMetadata};
pub use service::SongService;
