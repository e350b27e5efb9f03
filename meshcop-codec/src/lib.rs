#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

pub mod commissioner;
pub mod dataset;
pub mod error;
pub mod radio;
pub mod thread;
pub(crate) mod util;

pub(crate) use util::{fill_random_bytes, random_range_u16};
