pub mod backend;
pub mod bus;
pub mod context;
pub mod sync;

pub use backend::*;
pub use bus::*;
pub use context::*;
pub use sync::*;
