use crate::error::{
    BackendError, BackendErrorKind, ConfigurationError, ConfigurationErrorKind, Error,
};
use crate::platform::{ExtractionRequest, Measurement, Platform};
use crate::protocol::ProtocolStrategy;

/// Largest number of qubits a single shot may measure.
pub const MAX_QUBITS: usize = 1024;

/// Uniform-superposition extraction.
///
/// Every qubit is put through a Hadamard gate and measured, so each
/// measured bit is 0 or 1 with equal probability on an ideal device. One
/// run executes the circuit `shots` times and concatenates the outcomes,
/// yielding `num_qubits * shots` bits.
///
/// # Examples
///
/// ```
/// use qrand_core::{HadamardProtocol, Measurement, QuantumProtocol, ReplayPlatform};
///
/// let platform = ReplayPlatform::new(vec![Measurement::from_bitstring("10110010").unwrap()]);
/// let protocol = HadamardProtocol::new(4).with_shots(2);
///
/// let result = protocol.run(&platform).unwrap();
/// assert_eq!(result.live().unwrap().to_u128(), Some(0b1011_0010));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HadamardProtocol {
    num_qubits: usize,
    shots: usize,
}

impl HadamardProtocol {
    /// Measures `num_qubits` qubits once per run.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            shots: 1,
        }
    }

    /// Sets how many times the circuit is executed per run.
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    /// Qubits measured per shot.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Circuit executions per run.
    pub fn shots(&self) -> usize {
        self.shots
    }

    fn request(&self) -> ExtractionRequest {
        ExtractionRequest {
            num_qubits: self.num_qubits,
            shots: self.shots,
        }
    }
}

impl ProtocolStrategy for HadamardProtocol {
    fn check(&self) -> Result<(), ConfigurationError> {
        if self.num_qubits == 0 || self.num_qubits > MAX_QUBITS {
            return Err(ConfigurationError::new(
                ConfigurationErrorKind::InvalidSize,
                format!(
                    "{} qubits requested, expected 1..={}",
                    self.num_qubits, MAX_QUBITS
                ),
            ));
        }
        if self.shots == 0 {
            return Err(ConfigurationError::new(
                ConfigurationErrorKind::InvalidShots,
                "at least one shot is required",
            ));
        }
        if self.request().total_bits().is_none() {
            return Err(ConfigurationError::new(
                ConfigurationErrorKind::Overflow,
                format!("{} qubits x {} shots", self.num_qubits, self.shots),
            ));
        }
        Ok(())
    }

    fn extract(&self, platform: &dyn Platform) -> Result<Measurement, Error> {
        let request = self.request();
        // check() has already ruled out overflow
        let expected = request.total_bits().unwrap_or(usize::MAX);

        let measurement = platform.execute(&request).map_err(|e| {
            tracing::warn!(
                target: "qrand",
                num_qubits = request.num_qubits,
                shots = request.shots,
                error = %e,
                "platform failed to execute extraction"
            );
            e
        })?;

        if measurement.num_bits() != expected {
            return Err(BackendError::new(
                BackendErrorKind::MalformedResponse,
                format!(
                    "expected {} bits, platform returned {}",
                    expected,
                    measurement.num_bits()
                ),
            )
            .into());
        }

        tracing::debug!(
            target: "qrand",
            num_qubits = request.num_qubits,
            shots = request.shots,
            num_bits = measurement.num_bits(),
            "hadamard extraction complete"
        );
        Ok(measurement)
    }
}
