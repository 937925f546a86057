pub mod catalog;
pub mod cli;
pub mod config;
pub mod filter;
pub mod logging;
pub mod panel;
pub mod portfolio;
pub mod render;
pub mod source;
pub mod web;
