pub mod api;
pub mod collection;
pub mod config;
pub mod editor;
pub mod error;
pub mod model;
