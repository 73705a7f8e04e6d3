use std::sync::Arc;

use crate::error::{ConfigurationError, Error};
use crate::platform::{Measurement, Platform};
use crate::result::{ExtractionResult, LiveResult};
use crate::validation::ValidationStrategy;

/// A node of a protocol chain.
///
/// A chain is one terminal [`ProtocolStrategy`] wrapped in zero or more
/// [`ValidationDecorator`]s:
///
/// ```text
/// Decorator(Decorator(Terminal, V1), V2)
///     run:      Terminal extracts once ──▶ V1 checks ──▶ V2 checks
///     validate: V2 && V1 (stops at the terminal)
/// ```
///
/// Every node exposes the same capability set, so callers never need to
/// know how deep a chain is.
pub trait QuantumProtocol: Send + Sync {
    /// Runs the extraction once and applies every validation layer.
    ///
    /// # Errors
    ///
    /// - `Error::Configuration` if the terminal fails its self-check
    /// - `Error::Backend` if the platform cannot service the request,
    ///   propagated unchanged through every layer
    ///
    /// A rejected token is not an error: the result comes back erased.
    fn run(&self, platform: &dyn Platform) -> Result<ExtractionResult, Error>;

    /// Self-check of the terminal's configuration. Never touches a platform.
    fn verify(&self) -> bool;

    /// Re-checks the whole chain against a result without extracting again.
    ///
    /// Returns `true` only if every layer accepts the token. A bare
    /// terminal asserts nothing and always returns `false`.
    fn validate(&self, result: &LiveResult) -> bool;

    /// The node this one wraps, or `None` for the terminal.
    fn base_protocol(&self) -> Option<&dyn QuantumProtocol>;

    /// Number of validation layers between this node and the terminal.
    fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self.base_protocol();
        while let Some(inner) = node {
            depth += 1;
            node = inner.base_protocol();
        }
        depth
    }
}

impl std::fmt::Debug for dyn QuantumProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuantumProtocol")
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}

/// The terminal of a chain: knows how to get bits out of a platform.
///
/// Implementors only describe the extraction itself. Every
/// `ProtocolStrategy` is a [`QuantumProtocol`] whose `run` checks the
/// configuration first, executes exactly once and wraps the measurement in
/// a live result. A terminal never validates anything: `validate` is
/// always `false` and `base_protocol` is always `None`.
pub trait ProtocolStrategy: Send + Sync {
    /// Checks that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` describing the first problem found.
    fn check(&self) -> Result<(), ConfigurationError>;

    /// Executes the extraction against the platform.
    ///
    /// Called only after [`check`](Self::check) passed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Backend` when the platform fails or answers with
    /// data that does not match the request.
    fn extract(&self, platform: &dyn Platform) -> Result<Measurement, Error>;
}

impl<T: ProtocolStrategy> QuantumProtocol for T {
    fn run(&self, platform: &dyn Platform) -> Result<ExtractionResult, Error> {
        self.check()?;
        let (bits, token) = self.extract(platform)?.into_parts();
        Ok(LiveResult::new_unchecked(bits, token).into())
    }

    fn verify(&self) -> bool {
        self.check().is_ok()
    }

    fn validate(&self, _result: &LiveResult) -> bool {
        false
    }

    fn base_protocol(&self) -> Option<&dyn QuantumProtocol> {
        None
    }
}

/// Adds one independent acceptance test on top of an existing chain.
///
/// The decorator owns its inner node and shares its strategy read-only.
/// It never changes how bits are extracted: `run` delegates to the inner
/// node (so the terminal talks to the platform exactly once), then checks
/// the token with this layer's strategy and erases the result if the
/// check fails.
///
/// # Examples
///
/// ```
/// use qrand_core::{
///     HadamardProtocol, Measurement, QuantumProtocol, ReplayPlatform, TokenEquals, TokenLength,
///     ValidationDecorator,
/// };
///
/// let platform = ReplayPlatform::new(vec![
///     Measurement::from_bitstring("101").unwrap().with_validation_token("abc"),
/// ]);
///
/// let chain = ValidationDecorator::new(
///     ValidationDecorator::new(HadamardProtocol::new(3), TokenEquals::new("abc")),
///     TokenLength::new(3),
/// );
///
/// let result = chain.run(&platform).unwrap();
/// let live = result.live().expect("both layers accept");
/// assert!(chain.validate(live));
/// assert_eq!(chain.depth(), 2);
/// ```
pub struct ValidationDecorator {
    base_protocol: Box<dyn QuantumProtocol>,
    validation_strategy: Arc<dyn ValidationStrategy>,
}

impl ValidationDecorator {
    /// Wraps `base_protocol` with one validation layer.
    pub fn new<P, S>(base_protocol: P, validation_strategy: S) -> Self
    where
        P: QuantumProtocol + 'static,
        S: ValidationStrategy + 'static,
    {
        Self::from_parts(Box::new(base_protocol), Arc::new(validation_strategy))
    }

    /// Wraps an already boxed chain with a strategy that may be shared with
    /// other decorators.
    pub fn from_parts(
        base_protocol: Box<dyn QuantumProtocol>,
        validation_strategy: Arc<dyn ValidationStrategy>,
    ) -> Self {
        Self {
            base_protocol,
            validation_strategy,
        }
    }

    /// Mutable access to the wrapped node.
    pub fn base_protocol_mut(&mut self) -> &mut dyn QuantumProtocol {
        self.base_protocol.as_mut()
    }

    /// Replaces the wrapped node, returning the previous one.
    pub fn set_base_protocol(
        &mut self,
        base_protocol: Box<dyn QuantumProtocol>,
    ) -> Box<dyn QuantumProtocol> {
        std::mem::replace(&mut self.base_protocol, base_protocol)
    }

    /// The strategy applied by this layer.
    pub fn validation_strategy(&self) -> &Arc<dyn ValidationStrategy> {
        &self.validation_strategy
    }

    fn validate_layer(&self, result: &LiveResult) -> bool {
        self.validation_strategy.validate(result.validation_token())
    }
}

impl QuantumProtocol for ValidationDecorator {
    fn run(&self, platform: &dyn Platform) -> Result<ExtractionResult, Error> {
        let result = self.base_protocol.run(platform)?;

        let live = match result {
            ExtractionResult::Live(live) => live,
            // An inner layer already rejected it: nothing left to check
            erased @ ExtractionResult::Erased(_) => return Ok(erased),
        };

        if self.validate_layer(&live) {
            tracing::debug!(target: "qrand", depth = self.depth(), "validation layer accepted");
            Ok(ExtractionResult::Live(live))
        } else {
            tracing::warn!(
                target: "qrand",
                depth = self.depth(),
                num_bits = live.num_bits(),
                "validation layer rejected result, erasing"
            );
            Ok(ExtractionResult::Erased(live.erase()))
        }
    }

    fn verify(&self) -> bool {
        self.base_protocol.verify()
    }

    fn validate(&self, result: &LiveResult) -> bool {
        let valid = self.validate_layer(result);
        if self.base_protocol.base_protocol().is_none() {
            return valid;
        }
        valid && self.base_protocol.validate(result)
    }

    fn base_protocol(&self) -> Option<&dyn QuantumProtocol> {
        Some(self.base_protocol.as_ref())
    }
}

impl std::fmt::Debug for ValidationDecorator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationDecorator")
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}
