/// opdef-gen library crate.
///
/// Exposes the compiler stages as a public API so that integration tests in
/// tests/ can import them via `opdef_gen::`.
///
/// The binary entry point (src/main.rs) uses these same modules.
pub mod config;
pub mod driver;
pub mod error;
pub mod generator;
pub mod loader;
pub mod model;
pub mod utils;
