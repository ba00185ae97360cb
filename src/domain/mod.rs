pub mod check;
pub mod message;
pub mod vu;

pub use check::*;
pub use message::*;
pub use vu::*;
