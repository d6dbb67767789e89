pub mod addr;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod graph;
pub mod value;
pub mod version;
pub mod walk;
pub mod wasm;
