pub mod api;
pub mod assembler;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod driver;
pub mod error;
pub mod genome;
pub mod join;
pub mod kegg;
pub mod logging;
pub mod resolver;
pub mod sink;
pub mod source;
pub mod store;
