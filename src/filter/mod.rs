//! Recursive filters and multi-stage filter design.
//!
//! Infinite impulse response (IIR) filters are feedback based systems,
//! and have all the caveats associated with any feedback system. If
//! poorly designed they can be unstable and unpredictable, and their
//! phase and group delay responses are non-linear over frequency.
//!
//! In exchange they are extremely efficient: a design that would need
//! dozens of feedforward taps can often be met by a handful of
//! recursive sections. This module keeps the two concerns separate.
//! The [`iir`] module holds the runtime sections, direct-form II
//! recursions with no opinion about where their coefficients come
//! from. The [`design`] module computes those coefficients from analog
//! low-pass prototypes, currently Butterworth and Chebyshev type I.
//! Elliptic designs would slot into the same scheme but are not
//! implemented.
//!
//! Per-sample filtering is allocation free and safe to run on an audio
//! thread; changing a filter's order reallocates its stages and must be
//! kept off the processing path by the caller. The library does no
//! locking of its own.

pub mod design;
pub mod iir;
pub mod iir_node;
