//! Random Source port
//!
//! The engine never owns a concrete generator. Anything that can produce the
//! three variates below can drive it: a seeded PRNG for production runs, a
//! scripted sequence for tests.

/// Source of the random variates consumed by the model
pub trait RandomSource {
    /// Uniform draw in [0, 1)
    fn uniform(&mut self) -> f64;

    /// Exponentially distributed holding time with the given rate (>= 0)
    fn exponential(&mut self, rate: f64) -> f64;

    /// Gamma distributed draw with the given shape and scale (>= 0)
    fn gamma(&mut self, shape: f64, scale: f64) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }

    fn exponential(&mut self, rate: f64) -> f64 {
        (**self).exponential(rate)
    }

    fn gamma(&mut self, shape: f64, scale: f64) -> f64 {
        (**self).gamma(shape, scale)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }

    fn exponential(&mut self, rate: f64) -> f64 {
        (**self).exponential(rate)
    }

    fn gamma(&mut self, shape: f64, scale: f64) -> f64 {
        (**self).gamma(shape, scale)
    }
}
