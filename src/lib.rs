pub mod calculator;
pub mod config;
pub mod output;
