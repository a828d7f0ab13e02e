#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else, clippy::missing_errors_doc)]

#[macro_use]
extern crate tracing;

pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod maud_conveniences;
pub mod routes;
pub mod state;
