#![deny(warnings)]

pub mod api;
pub mod config;
pub mod emotion;
pub mod server;
