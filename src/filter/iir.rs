//! Recursive (IIR) filter sections realized in direct form II.
//!
//! These are the stateful building blocks that the design module
//! assembles into multi-stage filters: a first-order section, a
//! second-order (biquad) section, and a general N-th order filter for
//! caller-supplied coefficients. Coefficients and delay state are
//! independent: replacing the coefficients of a running section never
//! disturbs its delay registers, so a filter can be retuned without
//! clicks from a state reset.

use num_traits::{Float, Num};

/// First-order recursive filter section (one pole, one zero).
///
/// Direct form II with a single delay register:
///
/// ```text
/// d0 = x - d1*co1
/// y  = d0*ci0 + d1*ci1
/// d1 = d0
/// ```
#[derive(Clone, Copy, Debug)]
pub struct OnePole<T> {
    d1: T,
    ci0: T,
    ci1: T,
    co1: T,
}

impl<T: Float> OnePole<T> {
    /// Creates a section with zeroed coefficients and state.
    pub fn new() -> OnePole<T> {
        OnePole {
            d1: T::zero(),
            ci0: T::zero(),
            ci1: T::zero(),
            co1: T::zero(),
        }
    }

    /// Filters one input sample.
    pub fn filter(&mut self, x: T) -> T {
        let d0 = x - self.d1 * self.co1;
        let y = d0 * self.ci0 + self.d1 * self.ci1;
        self.d1 = d0;
        y
    }

    /// Replaces the coefficients. The delay register is left untouched.
    pub fn set_coefs(&mut self, ci0: T, ci1: T, co1: T) {
        self.ci0 = ci0;
        self.ci1 = ci1;
        self.co1 = co1;
    }

    /// Returns the coefficients as `[ci0, ci1, co1]`.
    pub fn coefs(&self) -> [T; 3] {
        [self.ci0, self.ci1, self.co1]
    }

    /// Zeroes the delay register.
    pub fn reset(&mut self) {
        self.d1 = T::zero();
    }
}

impl<T: Float> Default for OnePole<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Second-order recursive filter section (two poles, two zeros).
///
/// Direct form II with two delay registers. The feedback terms are
/// subtracted first, in register order, before the feedforward sum:
///
/// ```text
/// d0 = x - d1*co1 - d2*co2
/// y  = d0*ci0 + d1*ci1 + d2*ci2
/// d2 = d1
/// d1 = d0
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Biquad<T> {
    d1: T,
    d2: T,
    ci0: T,
    ci1: T,
    ci2: T,
    co1: T,
    co2: T,
}

impl<T: Float> Biquad<T> {
    /// Creates a section with zeroed coefficients and state.
    pub fn new() -> Biquad<T> {
        Biquad {
            d1: T::zero(),
            d2: T::zero(),
            ci0: T::zero(),
            ci1: T::zero(),
            ci2: T::zero(),
            co1: T::zero(),
            co2: T::zero(),
        }
    }

    /// Filters one input sample.
    pub fn filter(&mut self, x: T) -> T {
        let d0 = x - self.d1 * self.co1 - self.d2 * self.co2;
        let y = d0 * self.ci0 + self.d1 * self.ci1 + self.d2 * self.ci2;
        self.d2 = self.d1;
        self.d1 = d0;
        y
    }

    /// Replaces the coefficients. The delay registers are left
    /// untouched.
    pub fn set_coefs(&mut self, ci0: T, ci1: T, ci2: T, co1: T, co2: T) {
        self.ci0 = ci0;
        self.ci1 = ci1;
        self.ci2 = ci2;
        self.co1 = co1;
        self.co2 = co2;
    }

    /// Returns the coefficients as `[ci0, ci1, ci2, co1, co2]`.
    pub fn coefs(&self) -> [T; 5] {
        [self.ci0, self.ci1, self.ci2, self.co1, self.co2]
    }

    /// Returns mutable references to the coefficients, in the same
    /// order as [`coefs`](Biquad::coefs).
    pub fn coefs_mut(&mut self) -> [&mut T; 5] {
        [
            &mut self.ci0,
            &mut self.ci1,
            &mut self.ci2,
            &mut self.co1,
            &mut self.co2,
        ]
    }

    /// Zeroes both delay registers.
    pub fn reset(&mut self) {
        self.d1 = T::zero();
        self.d2 = T::zero();
    }
}

impl<T: Float> Default for Biquad<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// N-th order direct-form II filter with caller-supplied coefficients.
///
/// Unlike the designed cascades, this filter takes the feedforward
/// (`ff`) and feedback (`fb`) coefficient arrays as given. Feedback is
/// summed into delay slot 0, feedforward into the output, walking the
/// delay line from the oldest slot down while shifting it. The output
/// is scaled by `fb[0]` as a final step; pass `fb[0] = 1` for the usual
/// direct-form II behavior.
///
/// The order is fixed at construction and cannot change afterwards.
#[derive(Clone, Debug)]
pub struct DirectFormN<T> {
    delay: Vec<T>,
    ff: Vec<T>,
    fb: Vec<T>,
}

impl<T: Num + Copy> DirectFormN<T> {
    /// Creates a filter from feedforward and feedback coefficients.
    ///
    /// # Panics
    ///
    /// Panics if the coefficient vectors are empty or differ in length.
    pub fn new(ff: Vec<T>, fb: Vec<T>) -> DirectFormN<T> {
        assert_eq!(
            ff.len(),
            fb.len(),
            "feedforward and feedback coefficient counts must match"
        );
        assert!(!ff.is_empty(), "filter order must be at least 1");
        let order = ff.len();
        DirectFormN {
            delay: vec![T::zero(); order],
            ff,
            fb,
        }
    }

    /// Filter order (number of delay slots).
    pub fn order(&self) -> usize {
        self.delay.len()
    }

    /// Feedforward coefficients.
    pub fn ff(&self) -> &[T] {
        &self.ff
    }

    /// Mutable view of the feedforward coefficients.
    pub fn ff_mut(&mut self) -> &mut [T] {
        &mut self.ff
    }

    /// Feedback coefficients. `fb[0]` is the final output scale.
    pub fn fb(&self) -> &[T] {
        &self.fb
    }

    /// Mutable view of the feedback coefficients.
    pub fn fb_mut(&mut self) -> &mut [T] {
        &mut self.fb
    }

    /// Filters one input sample.
    pub fn filter(&mut self, x: T) -> T {
        self.delay[0] = x;
        let mut y = T::zero();
        for i in (1..self.delay.len()).rev() {
            let di = self.delay[i];
            self.delay[0] = self.delay[0] + di * self.fb[i];
            y = y + di * self.ff[i];
            let shifted = self.delay[i - 1];
            self.delay[i] = shifted;
        }
        y = y + self.delay[0] * self.ff[0];
        y * self.fb[0]
    }

    /// Zeroes the delay line.
    pub fn reset(&mut self) {
        for d in self.delay.iter_mut() {
            *d = T::zero();
        }
    }
}
