pub mod bounds;
pub mod scale;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use scale::*;
pub use time::*;
