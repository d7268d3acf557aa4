pub mod buffers;
pub mod event_index;
pub mod picking;
pub mod render;
pub mod visibility;

pub use buffers::*;
pub use event_index::*;
pub use picking::*;
pub use render::*;
pub use visibility::*;
