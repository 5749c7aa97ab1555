#![forbid(unsafe_code)]

//! Terminal demo for `suggest-overlay`: a file path field whose overlay
//! lists the entries of the directory being typed.

pub mod app;
pub mod cli;
pub mod paths;
pub mod session;
pub mod view;
