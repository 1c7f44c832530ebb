pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod retry;
pub mod selection;
// cmd and reports are modules of the binary (main.rs); they only render what
// this library computes.
