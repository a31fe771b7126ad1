//! Small helpers shared by the HD map crates: logging setup, phase timing, IO, and collections.

#[macro_use]
extern crate log;

mod collections;
pub mod io;
pub mod logger;
mod time;

pub use crate::collections::MultiMap;
pub use crate::time::{elapsed_seconds, prettyprint_time, prettyprint_usize, Timer};
