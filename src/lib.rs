pub mod cards;
pub mod config;
pub mod errors;
pub mod metadata;
pub mod resolution;
pub mod tokens;
pub mod web;
