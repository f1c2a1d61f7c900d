//! Compiled spec model consumed by the container engine.

mod io;
mod types;

pub use io::*;
pub use types::*;
