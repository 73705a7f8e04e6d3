use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{BackendError, BackendErrorKind};

/// A request for one batch of measured bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionRequest {
    /// Number of qubits measured per shot
    pub num_qubits: usize,
    /// Number of times the circuit is executed
    pub shots: usize,
}

impl ExtractionRequest {
    /// Total number of bits the platform is expected to return.
    ///
    /// Returns `None` if the product overflows `usize`.
    pub fn total_bits(&self) -> Option<usize> {
        self.num_qubits.checked_mul(self.shots)
    }
}

/// Raw data returned by a platform for one request.
///
/// Holds the measured bits (most significant first) and the validation
/// token downstream validation layers inspect. Unless the platform supplies
/// its own token, the token is the measured bit string.
#[derive(Clone, PartialEq, Eq)]
pub struct Measurement {
    bits: Vec<u8>,
    validation_token: String,
}

impl Measurement {
    /// Parses a string of `'0'` and `'1'` characters.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedResponse` error if any other character appears.
    ///
    /// # Examples
    ///
    /// ```
    /// use qrand_core::Measurement;
    ///
    /// let measurement = Measurement::from_bitstring("0110").unwrap();
    /// assert_eq!(measurement.num_bits(), 4);
    /// assert_eq!(measurement.validation_token(), "0110");
    ///
    /// assert!(Measurement::from_bitstring("01x0").is_err());
    /// ```
    pub fn from_bitstring(bitstring: &str) -> Result<Self, BackendError> {
        let bits = bitstring
            .chars()
            .map(|c| match c {
                '0' => Ok(0u8),
                '1' => Ok(1u8),
                other => Err(BackendError::new(
                    BackendErrorKind::MalformedResponse,
                    format!("unexpected symbol {:?} in measurement", other),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            bits,
            validation_token: bitstring.to_string(),
        })
    }

    /// Builds a measurement from booleans, most significant first.
    pub fn from_bits(bits: &[bool]) -> Self {
        let bits: Vec<u8> = bits.iter().map(|&b| u8::from(b)).collect();
        let validation_token = bits.iter().map(|&b| char::from(b'0' + b)).collect();
        Self {
            bits,
            validation_token,
        }
    }

    /// Replaces the validation token with one supplied by the platform.
    pub fn with_validation_token(mut self, token: impl Into<String>) -> Self {
        self.validation_token = token.into();
        self
    }

    /// Number of measured bits.
    pub fn num_bits(&self) -> usize {
        self.bits.len()
    }

    /// Token that validation layers inspect.
    pub fn validation_token(&self) -> &str {
        &self.validation_token
    }

    pub(crate) fn into_parts(self) -> (Vec<u8>, String) {
        (self.bits, self.validation_token)
    }
}

impl std::fmt::Debug for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Measurement")
            .field("num_bits", &self.bits.len())
            .finish_non_exhaustive()
    }
}

/// Anything that can execute an extraction request.
///
/// Implementations wrap a concrete backend (a quantum computing provider,
/// a simulator, a recorded session). A call blocks until the backend has
/// answered; timeouts and retries are the implementation's own business.
pub trait Platform: Send + Sync {
    /// Executes the request and returns the raw measurement.
    ///
    /// # Errors
    ///
    /// Returns a `BackendError` if the backend cannot service the request.
    fn execute(&self, request: &ExtractionRequest) -> Result<Measurement, BackendError>;
}

/// A platform that replays scripted answers (for testing).
///
/// Each call to [`execute`](Platform::execute) returns the next scripted
/// entry; once the script runs out the last entry is repeated. Every call
/// is counted, which makes it easy to assert how many times a chain
/// touched the backend.
///
/// # Examples
///
/// ```
/// use qrand_core::{ExtractionRequest, Measurement, Platform, ReplayPlatform};
///
/// let platform = ReplayPlatform::new(vec![Measurement::from_bitstring("01").unwrap()]);
/// let request = ExtractionRequest { num_qubits: 2, shots: 1 };
///
/// platform.execute(&request).unwrap();
/// platform.execute(&request).unwrap();
/// assert_eq!(platform.executions(), 2);
/// ```
pub struct ReplayPlatform {
    script: Mutex<Vec<Result<Measurement, BackendError>>>,
    executions: AtomicUsize,
}

impl ReplayPlatform {
    /// Creates a platform replaying the given measurements.
    pub fn new(measurements: Vec<Measurement>) -> Self {
        Self::scripted(measurements.into_iter().map(Ok).collect())
    }

    /// Creates a platform that always fails with the given error.
    pub fn failing(error: BackendError) -> Self {
        Self::scripted(vec![Err(error)])
    }

    /// Creates a platform replaying a mix of answers and failures.
    pub fn scripted(script: Vec<Result<Measurement, BackendError>>) -> Self {
        let mut script = script;
        // Stored reversed so the next answer is popped from the back
        script.reverse();
        Self {
            script: Mutex::new(script),
            executions: AtomicUsize::new(0),
        }
    }

    /// Number of times `execute` has been called.
    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

impl Platform for ReplayPlatform {
    fn execute(&self, _request: &ExtractionRequest) -> Result<Measurement, BackendError> {
        self.executions.fetch_add(1, Ordering::SeqCst);

        let mut script = self
            .script
            .lock()
            .map_err(|_| BackendError::new(BackendErrorKind::Execution, "replay script poisoned"))?;

        let next = if script.len() > 1 {
            script.pop()
        } else {
            script.last().cloned()
        };

        next.unwrap_or_else(|| {
            Err(BackendError::new(
                BackendErrorKind::Unavailable,
                "replay script is empty",
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: ExtractionRequest = ExtractionRequest {
        num_qubits: 2,
        shots: 1,
    };

    #[test]
    fn from_bits_matches_bitstring() {
        let from_bools = Measurement::from_bits(&[true, false, true]);
        let parsed = Measurement::from_bitstring("101").unwrap();

        assert_eq!(from_bools, parsed);
        assert_eq!(from_bools.validation_token(), "101");
    }

    #[test]
    fn malformed_bitstring_is_rejected() {
        let err = Measurement::from_bitstring("10 1").unwrap_err();
        assert_eq!(err.kind(), BackendErrorKind::MalformedResponse);
    }

    #[test]
    fn platform_token_overrides_default() {
        let measurement = Measurement::from_bitstring("11")
            .unwrap()
            .with_validation_token("abc");

        assert_eq!(measurement.validation_token(), "abc");
        assert_eq!(measurement.num_bits(), 2);
    }

    #[test]
    fn measurement_debug_hides_bits() {
        let measurement = Measurement::from_bitstring("110011").unwrap();
        let debug_output = format!("{:?}", measurement);

        assert!(!debug_output.contains("110011"));
        assert!(debug_output.contains("num_bits: 6"));
    }

    #[test]
    fn replay_walks_script_then_repeats_last() {
        let platform = ReplayPlatform::scripted(vec![
            Ok(Measurement::from_bitstring("00").unwrap()),
            Err(BackendError::new(BackendErrorKind::QuotaExceeded, "limit")),
            Ok(Measurement::from_bitstring("11").unwrap()),
        ]);

        assert_eq!(platform.execute(&REQUEST).unwrap().validation_token(), "00");
        assert_eq!(
            platform.execute(&REQUEST).unwrap_err().kind(),
            BackendErrorKind::QuotaExceeded
        );
        assert_eq!(platform.execute(&REQUEST).unwrap().validation_token(), "11");
        assert_eq!(platform.execute(&REQUEST).unwrap().validation_token(), "11");
        assert_eq!(platform.executions(), 4);
    }

    #[test]
    fn empty_script_is_unavailable() {
        let platform = ReplayPlatform::new(Vec::new());
        let err = platform.execute(&REQUEST).unwrap_err();

        assert_eq!(err.kind(), BackendErrorKind::Unavailable);
        assert_eq!(platform.executions(), 1);
    }

    #[test]
    fn total_bits_detects_overflow() {
        let request = ExtractionRequest {
            num_qubits: usize::MAX,
            shots: 2,
        };
        assert_eq!(request.total_bits(), None);
        assert_eq!(REQUEST.total_bits(), Some(2));
    }
}
