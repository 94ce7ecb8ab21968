pub mod json;

pub use json::PayloadJson;
