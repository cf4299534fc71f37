pub mod api;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod counts;
pub mod events;
pub mod modal;
pub mod output;
pub mod page;
pub mod prompt;
pub mod reply;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod tests;
