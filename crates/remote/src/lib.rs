pub mod backend;
pub mod busy;
pub mod coalescer;
pub mod feed;
pub mod protocol;
pub mod session;

pub use backend::*;
pub use busy::*;
pub use coalescer::*;
pub use feed::*;
pub use protocol::*;
pub use session::*;
