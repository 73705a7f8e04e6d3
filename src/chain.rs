use std::sync::Arc;

use crate::{
    error::ConfigurationError,
    protocol::{ProtocolStrategy, QuantumProtocol, ValidationDecorator},
    validation::ValidationStrategy,
};

/// Builder for protocol chains.
///
/// `ChainBuilder` collects validation layers on top of one terminal
/// strategy and checks the terminal's configuration before handing out
/// the chain, so a misconfigured chain never reaches a platform.
///
/// Layers wrap in call order: the first `validate_with` is the innermost
/// decorator, the last one is outermost.
///
/// # Examples
///
/// ```
/// use qrand_core::{
///     ChainBuilder, HadamardProtocol, Measurement, MonobitFrequency, QuantumProtocol,
///     ReplayPlatform, TokenLength,
/// };
///
/// let chain = ChainBuilder::new(HadamardProtocol::new(8))
///     .validate_with(TokenLength::new(8))
///     .validate_with(MonobitFrequency::new())
///     .build()
///     .expect("8 qubits is a valid configuration");
///
/// assert_eq!(chain.depth(), 2);
///
/// let platform = ReplayPlatform::new(vec![Measurement::from_bitstring("10010110").unwrap()]);
/// let result = chain.run(&platform).unwrap();
/// assert!(result.is_live());
/// ```
pub struct ChainBuilder {
    terminal: Box<dyn QuantumProtocol>,
    terminal_check: Result<(), ConfigurationError>,
    layers: Vec<Arc<dyn ValidationStrategy>>,
}

impl ChainBuilder {
    /// Starts a chain from a terminal strategy.
    pub fn new<T>(terminal: T) -> Self
    where
        T: ProtocolStrategy + 'static,
    {
        Self {
            terminal_check: terminal.check(),
            terminal: Box::new(terminal),
            layers: Vec::new(),
        }
    }

    /// Adds a validation layer outside all layers added so far.
    pub fn validate_with<S>(self, strategy: S) -> Self
    where
        S: ValidationStrategy + 'static,
    {
        self.validate_with_shared(Arc::new(strategy))
    }

    /// Adds a validation layer using a strategy shared with other chains.
    pub fn validate_with_shared(mut self, strategy: Arc<dyn ValidationStrategy>) -> Self {
        self.layers.push(strategy);
        self
    }

    /// Number of layers added so far.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if no layer has been added.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Verifies the terminal and assembles the chain.
    ///
    /// With no layers the terminal itself is returned.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if the terminal fails its self-check.
    pub fn build(self) -> Result<Box<dyn QuantumProtocol>, ConfigurationError> {
        // 1. Configuration FIRST
        if let Err(e) = self.terminal_check {
            tracing::warn!(target: "qrand", error = %e, "refusing to build chain");
            return Err(e);
        }

        // 2. Wrap innermost-first
        let depth = self.layers.len();
        let chain = self
            .layers
            .into_iter()
            .fold(self.terminal, |inner, strategy| -> Box<dyn QuantumProtocol> {
                Box::new(ValidationDecorator::from_parts(inner, strategy))
            });

        tracing::debug!(target: "qrand", depth, "protocol chain built");
        Ok(chain)
    }
}

impl std::fmt::Debug for ChainBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainBuilder")
            .field("layers", &self.layers.len())
            .finish_non_exhaustive()
    }
}
