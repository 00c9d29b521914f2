mod document;
mod error;
mod leaf;
mod property_roundtrip;
pub mod utils;
