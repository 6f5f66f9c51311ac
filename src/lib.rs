pub mod calendar;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod output;
pub mod pager;
pub mod prompt;
pub mod session;
pub mod stats;
