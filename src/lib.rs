pub mod auto;
pub mod backend;
pub mod common;
pub mod config;
pub mod cql;
pub mod editor;
pub mod errors;
pub mod palette;
pub mod repaint;
pub mod session;
pub mod style;
