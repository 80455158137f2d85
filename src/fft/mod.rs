//! Spectrum measurement built on
//! [RustFFT](https://github.com/awelkie/RustFFT).
//!
//! The filter and noise modules are specified in the frequency domain
//! (cutoff points, spectral slopes), so this module provides the small
//! amount of FFT plumbing needed to observe those properties on real
//! sample blocks.

use rustfft::num_complex::Complex as FFTComplex;
use rustfft::num_traits::Zero;
use rustfft::{FFTplanner, FFT};
use std::sync::Arc;

/// Magnitude-spectrum analyzer for real-valued sample blocks.
///
/// The analyzer owns an FFT plan for a fixed block size. Bin `k` of the
/// output corresponds to the frequency `k / fft_size` in cycles per
/// sample.
pub struct Spectrum {
    fft: Arc<dyn FFT<f64>>,
    fft_size: usize,
}

impl Spectrum {
    /// Creates an analyzer for blocks of `fft_size` samples.
    pub fn new(fft_size: usize) -> Spectrum {
        let mut planner = FFTplanner::new(false);
        let fft = planner.plan_fft(fft_size);
        Spectrum { fft, fft_size }
    }

    /// FFT block size.
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Returns the magnitude of every frequency bin for a real-valued
    /// block.
    ///
    /// Blocks shorter than the FFT size are zero-padded; longer blocks
    /// are truncated.
    pub fn magnitudes(&mut self, data: &[f64]) -> Vec<f64> {
        let mut input: Vec<FFTComplex<f64>> =
            data.iter().map(|&x| FFTComplex::new(x, 0.0)).collect();
        input.resize(self.fft_size, FFTComplex::zero());

        let mut output: Vec<FFTComplex<f64>> =
            vec![FFTComplex::zero(); self.fft_size];
        self.fft.process(&mut input[..], &mut output[..]);

        output.iter().map(|x| x.norm()).collect()
    }
}
