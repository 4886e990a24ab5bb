//! Control and message reference number generation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Supplies the next control/message reference number for `UNB`/`UNH`
/// headers. Injected into [`crate::EdifactCodec`] for the same reason as
/// [`crate::Clock`]: deterministic, mockable generation.
pub trait ReferenceSource: Send + Sync {
    fn next_reference(&self) -> String;
}

/// Monotonically increasing reference numbers. The deterministic default
/// used by [`crate::EdifactCodec::default`].
#[derive(Debug)]
pub struct CounterReferenceSource {
    next: AtomicU64,
}

impl CounterReferenceSource {
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl ReferenceSource for CounterReferenceSource {
    fn next_reference(&self) -> String {
        let value = self.next.fetch_add(1, Ordering::Relaxed);
        value.to_string()
    }
}

/// Wraps a caller-supplied random number generator so callers who want
/// non-sequential reference numbers aren't forced through the monotonic
/// counter. The generator is injected as a closure rather than tied to a
/// specific RNG crate, so `edifact-codec` stays free of an RNG dependency
/// of its own; callers wire up whichever generator they already use.
pub struct RandomReferenceSource<F> {
    generator: F,
}

impl<F> RandomReferenceSource<F>
where
    F: Fn() -> u64,
{
    pub fn new(generator: F) -> Self {
        Self { generator }
    }
}

impl<F> ReferenceSource for RandomReferenceSource<F>
where
    F: Fn() -> u64 + Send + Sync,
{
    fn next_reference(&self) -> String {
        ((self.generator)() % 100_000_000).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_reference_source_increments_from_the_given_start() {
        let source = CounterReferenceSource::starting_at(5);
        assert_eq!(source.next_reference(), "5");
        assert_eq!(source.next_reference(), "6");
        assert_eq!(source.next_reference(), "7");
    }

    #[test]
    fn random_reference_source_delegates_to_the_injected_generator() {
        let source = RandomReferenceSource::new(|| 42);
        assert_eq!(source.next_reference(), "42");
    }

    #[test]
    fn random_reference_source_wraps_large_values() {
        let source = RandomReferenceSource::new(|| u64::MAX);
        let reference = source.next_reference();
        assert!(reference.parse::<u64>().unwrap() < 100_000_000);
    }
}
