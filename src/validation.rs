/// A pure accept/reject check over a validation token.
///
/// Strategies are the pluggable half of a
/// [`ValidationDecorator`](crate::ValidationDecorator): the decorator
/// decides *when* a token is checked, the strategy decides *whether* it
/// passes.
///
/// # Invariants
///
/// Implementations MUST:
/// - Be pure: same token, same answer, no side effects
/// - Be total over well-formed tokens (return `false` rather than panic)
/// - Hold no mutable state, so one strategy can be shared across threads
///   and across several decorators
///
/// Any `Fn(&str) -> bool + Send + Sync` closure is a strategy.
///
/// # Examples
///
/// ```
/// use qrand_core::ValidationStrategy;
///
/// let three_chars = |token: &str| token.chars().count() == 3;
///
/// assert!(three_chars.validate("abc"));
/// assert!(!three_chars.validate("abcd"));
/// ```
pub trait ValidationStrategy: Send + Sync {
    /// Returns `true` if the token is acceptable.
    fn validate(&self, validation_token: &str) -> bool;
}

impl<F> ValidationStrategy for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn validate(&self, validation_token: &str) -> bool {
        self(validation_token)
    }
}

/// A strategy that accepts every token (for testing only).
///
/// **WARNING:** performs NO validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ValidationStrategy for AcceptAll {
    fn validate(&self, _validation_token: &str) -> bool {
        true
    }
}

/// A strategy that rejects every token (for testing error paths).
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAll;

impl ValidationStrategy for RejectAll {
    fn validate(&self, _validation_token: &str) -> bool {
        false
    }
}

/// Accepts only a token equal to an expected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEquals {
    expected: String,
}

impl TokenEquals {
    /// Creates a strategy accepting exactly `expected`.
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl ValidationStrategy for TokenEquals {
    fn validate(&self, validation_token: &str) -> bool {
        validation_token == self.expected
    }
}

/// Accepts tokens of an exact length, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLength {
    len: usize,
}

impl TokenLength {
    /// Creates a strategy accepting tokens of exactly `len` characters.
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl ValidationStrategy for TokenLength {
    fn validate(&self, validation_token: &str) -> bool {
        validation_token.chars().count() == self.len
    }
}

/// Two-sided 1% critical value of the standard normal distribution.
pub const MONOBIT_DEFAULT_MAX_Z: f64 = 2.5758;

/// Frequency (monobit) check on a bit-string token.
///
/// Maps each `'1'` to +1 and each `'0'` to -1, sums them to `S`, and
/// accepts when `|S| / sqrt(n)` is at most `max_z`. A token that is empty
/// or contains anything other than `'0'` and `'1'` is rejected.
///
/// This is a sanity check against a stuck or heavily biased source, not a
/// proof of randomness.
///
/// # Examples
///
/// ```
/// use qrand_core::{MonobitFrequency, ValidationStrategy};
///
/// let monobit = MonobitFrequency::new();
///
/// assert!(monobit.validate("0110100110010110"));
/// assert!(!monobit.validate("1111111111111111"));
/// assert!(!monobit.validate("not bits"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonobitFrequency {
    max_z: f64,
}

impl MonobitFrequency {
    /// Creates the check with the default 1% significance level.
    pub fn new() -> Self {
        Self {
            max_z: MONOBIT_DEFAULT_MAX_Z,
        }
    }

    /// Overrides the largest accepted normalised deviation.
    ///
    /// `max_z` must be a non-negative number. A NaN or negative threshold
    /// would reject every token; debug builds panic on it.
    pub fn with_max_z(mut self, max_z: f64) -> Self {
        debug_assert!(max_z >= 0.0, "monobit threshold must be >= 0, got {}", max_z);
        self.max_z = max_z;
        self
    }

    /// Normalised deviation `|S| / sqrt(n)` of a bit-string token.
    ///
    /// Returns `None` for an empty or non-binary token.
    pub fn statistic(validation_token: &str) -> Option<f64> {
        let mut sum: i64 = 0;
        let mut n: u64 = 0;
        for c in validation_token.chars() {
            match c {
                '1' => sum += 1,
                '0' => sum -= 1,
                _ => return None,
            }
            n += 1;
        }
        if n == 0 {
            return None;
        }
        Some(sum.unsigned_abs() as f64 / (n as f64).sqrt())
    }
}

impl Default for MonobitFrequency {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationStrategy for MonobitFrequency {
    fn validate(&self, validation_token: &str) -> bool {
        Self::statistic(validation_token).is_some_and(|z| z <= self.max_z)
    }
}
