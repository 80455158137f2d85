//! Colored noise generators built on a pluggable random number source.
//!
//! The color names describe the shape of the power spectrum: white is
//! flat, pink falls off at 3 dB per octave, brown at 6 dB per octave,
//! and violet rises at 6 dB per octave. Binary noise flips between two
//! amplitudes and is handy at tiny levels for keeping denormals out of
//! recursive filters.
//!
//! Every generator is generic over the random number generator driving
//! it (anything implementing `rand::Rng`) and defaults to `SmallRng`.
//! Generators can be built from system entropy, from a caller-supplied
//! generator, or from a 32-bit seed for reproducible streams.

pub mod noise_node;

use crate::util::math::clip;
use rand::distributions::Uniform;
use rand::rngs::SmallRng;
use rand::{FromEntropy, Rng, RngCore, SeedableRng};

// Expands a 32-bit seed into a full RNG seed with a linear congruential
// byte generator.
fn rng_from_seed<R: SeedableRng>(seed: u32) -> R {
    let mut bytes: R::Seed = Default::default();
    let mut x = seed;
    for b in bytes.as_mut().iter_mut() {
        x = x.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        *b = (x >> 24) as u8;
    }
    R::from_seed(bytes)
}

// Uniform signed unit interval, [-1, 1).
fn signed_unit() -> Uniform<f32> {
    Uniform::new(-1.0_f32, 1.0)
}

/// White noise.
///
/// White noise has a uniform power spectrum; each call draws one
/// uniformly distributed sample in [-1, 1).
pub struct NoiseWhite<R = SmallRng> {
    rng: R,
    dist: Uniform<f32>,
}

impl<R: Rng + FromEntropy> NoiseWhite<R> {
    /// Creates a generator seeded from system entropy.
    pub fn new() -> NoiseWhite<R> {
        Self::from_rng(R::from_entropy())
    }
}

impl<R: Rng + SeedableRng> NoiseWhite<R> {
    /// Creates a generator with a reproducible stream.
    pub fn with_seed(seed: u32) -> NoiseWhite<R> {
        Self::from_rng(rng_from_seed(seed))
    }

    /// Restarts the stream from the given seed.
    pub fn reseed(&mut self, seed: u32) {
        self.rng = rng_from_seed(seed);
    }
}

impl<R: Rng> NoiseWhite<R> {
    /// Creates a generator driven by `rng`.
    pub fn from_rng(rng: R) -> NoiseWhite<R> {
        NoiseWhite {
            rng,
            dist: signed_unit(),
        }
    }

    /// Generates the next value.
    pub fn sample(&mut self) -> f32 {
        self.rng.sample(&self.dist)
    }
}

impl<R: Rng + FromEntropy> Default for NoiseWhite<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pink noise.
///
/// Pink noise has a power spectrum of 1/f, a -3 dB/octave amplitude
/// slope. It is produced by summing twelve octaves of down-sampled
/// white noise: eleven held octave values, of which one is refreshed
/// per call, plus a fresh white sample every call.
pub struct NoisePink<R = SmallRng> {
    rng: R,
    dist: Uniform<f32>,
    octaves: [f32; 11],
    phase: u32,
    running_sum: f32,
}

impl<R: Rng + FromEntropy> NoisePink<R> {
    /// Creates a generator seeded from system entropy.
    pub fn new() -> NoisePink<R> {
        Self::from_rng(R::from_entropy())
    }
}

impl<R: Rng + SeedableRng> NoisePink<R> {
    /// Creates a generator with a reproducible stream.
    pub fn with_seed(seed: u32) -> NoisePink<R> {
        Self::from_rng(rng_from_seed(seed))
    }

    /// Restarts the underlying random stream from the given seed. The
    /// held octave values keep running from their current state.
    pub fn reseed(&mut self, seed: u32) {
        self.rng = rng_from_seed(seed);
    }
}

impl<R: Rng> NoisePink<R> {
    /// Creates a generator driven by `rng`.
    pub fn from_rng(rng: R) -> NoisePink<R> {
        let mut noise = NoisePink {
            rng,
            dist: signed_unit(),
            octaves: [0.0; 11],
            phase: 0,
            running_sum: 0.0,
        };
        noise.init();
        noise
    }

    fn init(&mut self) {
        self.running_sum = 0.0;
        for octave in self.octaves.iter_mut() {
            let r = self.rng.sample(&self.dist);
            *octave = r;
            self.running_sum += r;
        }
        self.phase = 0;
    }

    /// Generates the next value.
    pub fn sample(&mut self) -> f32 {
        // The phase counter runs over [1, 2047]; its trailing zero
        // count selects the octave to refresh. The update is skipped on
        // the wrap tick, which would otherwise index octave 11.
        self.phase += 1;
        if self.phase != 2048 {
            let i = self.phase.trailing_zeros() as usize;
            let r = self.rng.sample(&self.dist);
            self.running_sum += r - self.octaves[i];
            self.octaves[i] = r;
        } else {
            self.phase = 0;
        }

        (self.running_sum + self.rng.sample(&self.dist)) * 0.083333333
    }
}

impl<R: Rng + FromEntropy> Default for NoisePink<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Brown noise.
///
/// Brown noise has a power spectrum of 1/f^2, a -6 dB/octave amplitude
/// slope. It is produced by integrating white noise, with the output
/// clipped to a fixed interval.
pub struct NoiseBrown<R = SmallRng> {
    rng: R,
    dist: Uniform<f32>,
    value: f32,
    step: f32,
    min: f32,
    max: f32,
}

impl<R: Rng + FromEntropy> NoiseBrown<R> {
    /// Creates a generator with the default accumulation step of 0.04
    /// and clipping interval [-1, 1], seeded from system entropy.
    pub fn new() -> NoiseBrown<R> {
        Self::from_rng(R::from_entropy())
    }

    /// Creates a generator with a custom start value, accumulation step
    /// and clipping interval.
    pub fn with_params(value: f32, step: f32, min: f32, max: f32) -> NoiseBrown<R> {
        NoiseBrown {
            rng: R::from_entropy(),
            dist: signed_unit(),
            value,
            step,
            min,
            max,
        }
    }
}

impl<R: Rng + SeedableRng> NoiseBrown<R> {
    /// Creates a generator with a reproducible stream.
    pub fn with_seed(seed: u32) -> NoiseBrown<R> {
        Self::from_rng(rng_from_seed(seed))
    }

    /// Restarts the random stream from the given seed. The accumulator
    /// keeps its current value.
    pub fn reseed(&mut self, seed: u32) {
        self.rng = rng_from_seed(seed);
    }
}

impl<R: Rng> NoiseBrown<R> {
    /// Creates a generator with default parameters driven by `rng`.
    pub fn from_rng(rng: R) -> NoiseBrown<R> {
        NoiseBrown {
            rng,
            dist: signed_unit(),
            value: 0.0,
            step: 0.04,
            min: -1.0,
            max: 1.0,
        }
    }

    /// Generates the next value.
    pub fn sample(&mut self) -> f32 {
        let white = self.rng.sample(&self.dist);
        self.value = clip(self.value + white * self.step, self.min, self.max);
        self.value
    }
}

impl<R: Rng + FromEntropy> Default for NoiseBrown<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Violet noise.
///
/// Violet noise has a power spectrum of f^2, a +6 dB/octave amplitude
/// slope. It is produced by differentiating white noise. The white
/// values are drawn in [1, 2) by splicing random mantissa bits onto a
/// fixed exponent, so each output is the difference of two such values.
pub struct NoiseViolet<R = SmallRng> {
    rng: R,
    prev: f32,
}

impl<R: Rng + FromEntropy> NoiseViolet<R> {
    /// Creates a generator seeded from system entropy.
    pub fn new() -> NoiseViolet<R> {
        Self::from_rng(R::from_entropy())
    }
}

impl<R: Rng + SeedableRng> NoiseViolet<R> {
    /// Creates a generator with a reproducible stream.
    pub fn with_seed(seed: u32) -> NoiseViolet<R> {
        Self::from_rng(rng_from_seed(seed))
    }

    /// Restarts the stream from the given seed.
    pub fn reseed(&mut self, seed: u32) {
        self.rng = rng_from_seed(seed);
        self.prev = 1.5;
    }
}

impl<R: Rng> NoiseViolet<R> {
    /// Creates a generator driven by `rng`.
    pub fn from_rng(rng: R) -> NoiseViolet<R> {
        NoiseViolet { rng, prev: 1.5 }
    }

    /// Generates the next value.
    pub fn sample(&mut self) -> f32 {
        let curr = f32::from_bits(0x3F80_0000 | (self.rng.next_u32() >> 9));
        let diff = curr - self.prev;
        self.prev = curr;
        diff
    }
}

impl<R: Rng + FromEntropy> Default for NoiseViolet<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Binary noise.
///
/// Flips randomly between -amp and +amp by XOR-ing a random bit into
/// the amplitude's sign. With a very small amplitude, say 1e-20, this
/// can be added to a filter's input to prevent denormals.
pub struct NoiseBinary<R = SmallRng> {
    rng: R,
    amp: f32,
}

impl<R: Rng + FromEntropy> NoiseBinary<R> {
    /// Creates a generator with unit amplitude, seeded from system
    /// entropy.
    pub fn new() -> NoiseBinary<R> {
        Self::from_rng(R::from_entropy(), 1.0)
    }

    /// Creates a generator with the given amplitude.
    pub fn with_amp(amp: f32) -> NoiseBinary<R> {
        Self::from_rng(R::from_entropy(), amp)
    }
}

impl<R: Rng + SeedableRng> NoiseBinary<R> {
    /// Creates a generator with the given amplitude and a reproducible
    /// stream.
    pub fn with_seed(amp: f32, seed: u32) -> NoiseBinary<R> {
        Self::from_rng(rng_from_seed(seed), amp)
    }

    /// Restarts the stream from the given seed.
    pub fn reseed(&mut self, seed: u32) {
        self.rng = rng_from_seed(seed);
    }
}

impl<R: Rng> NoiseBinary<R> {
    /// Creates a generator with the given amplitude driven by `rng`.
    pub fn from_rng(rng: R, amp: f32) -> NoiseBinary<R> {
        NoiseBinary { rng, amp }
    }

    /// Sets the flip amplitude.
    pub fn set_amp(&mut self, amp: f32) {
        self.amp = amp;
    }

    /// Generates the next value.
    pub fn sample(&mut self) -> f32 {
        f32::from_bits((self.rng.next_u32() & 0x8000_0000) ^ self.amp.to_bits())
    }
}

impl<R: Rng + FromEntropy> Default for NoiseBinary<R> {
    fn default() -> Self {
        Self::new()
    }
}
