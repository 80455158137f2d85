//! Building blocks for recursive digital filters and colored noise
//! sources.
//!
//! The [`filter`] module provides direct-form II filter sections and
//! multi-stage Butterworth and Chebyshev designs derived from analog
//! prototypes via the bilinear transform. The [`noise`] module provides
//! white, pink, brown, violet and binary noise generators over a
//! pluggable random number source. The [`node`] module supplies the
//! channel-based machinery for wiring these pieces into processing
//! pipelines, and [`fft`] the spectrum measurements used to check them.

extern crate crossbeam;
extern crate rand;

#[macro_use]
pub mod node;
pub mod fft;
pub mod filter;
pub mod noise;
pub mod util;

pub use crossbeam::channel::{self, Receiver, Sender};
