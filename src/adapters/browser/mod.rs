//! Browser adapters.

mod fake;

pub use fake::FakeBrowser;
