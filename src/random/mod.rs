//! Random number generation for coordinate selection.
//!
//! The cipher engine draws through the [`RandomSource`] trait so that tests
//! and reproducible runs can substitute a seeded generator.

pub mod mersenne_twister;

pub use mersenne_twister::MersenneTwister;

/// Source of uniform draws used to pick a coordinate from a bucket.
///
/// Implementations must return values uniformly distributed over
/// `[0, bound)`. The engine never calls `next_below(0)`.
pub trait RandomSource {
    /// Returns the next value in `[0, bound)`.
    fn next_below(&mut self, bound: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_below(&mut self, bound: usize) -> usize {
        (**self).next_below(bound)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_below(&mut self, bound: usize) -> usize {
        (**self).next_below(bound)
    }
}
