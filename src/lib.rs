pub mod client;
pub mod error;
pub mod log;
pub mod mock;
pub mod models;
pub mod scenarios;

pub use client::{ChatApi, HttpChatClient};
pub use error::Error;
pub use log::{LogSink, WriterSink};
