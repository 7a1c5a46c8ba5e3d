pub mod catalog;
pub mod checkout;
pub mod config;
pub mod matcher;
pub mod model;
pub mod normalizer;
pub mod synthesizer;
pub mod utils;
