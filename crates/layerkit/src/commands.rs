//! Various commands that can be executed by layerkit
mod extract;

pub use extract::Extract;
