//! Layerkit extracts icons from the layers of Inkscape documents.
pub mod args;
pub mod commands;
pub mod config;
