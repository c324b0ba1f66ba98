pub mod loader;
pub mod types;

pub use loader::{expand_inputs, load_locations, load_many, validate_location};
pub use types::LocationRecord;
