pub mod catalogue;
pub mod filter;
pub mod mineplan;
pub mod records;
pub mod source;

pub use catalogue::*;
pub use filter::*;
pub use mineplan::*;
pub use records::*;
pub use source::*;
