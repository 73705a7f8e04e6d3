//! Composable validation chains for quantum random number extraction.
//!
//! Random bits come from a [`Platform`] (a quantum backend, a simulator, a
//! recorded session). This crate decides whether those bits can be
//! trusted:
//!
//! - **Terminal strategies** ([`ProtocolStrategy`], e.g. [`HadamardProtocol`])
//!   run one extraction against a platform
//! - **Validation decorators** ([`ValidationDecorator`]) each add one
//!   independent [`ValidationStrategy`] check on top of a chain
//! - **Results** ([`ExtractionResult`]) come back live only if every layer
//!   accepted them; otherwise they are erased before the caller sees them
//!
//! # Core Types
//!
//! - [`QuantumProtocol`]: Uniform `run`/`verify`/`validate`/`base_protocol`
//!   interface shared by every chain node
//! - [`ChainBuilder`]: Verifies a terminal and stacks validation layers
//! - [`LiveResult`] / [`ErasedResult`]: Readable and destroyed outcomes
//! - [`numeral`]: Rendering extracted integers over arbitrary alphabets
//!
//! # Examples
//!
//! ```
//! use qrand_core::{
//!     ChainBuilder, HadamardProtocol, Measurement, QuantumProtocol, ReplayPlatform, TokenEquals,
//!     TokenLength,
//! };
//!
//! let platform = ReplayPlatform::new(vec![
//!     Measurement::from_bitstring("110").unwrap().with_validation_token("abc"),
//! ]);
//!
//! let chain = ChainBuilder::new(HadamardProtocol::new(3))
//!     .validate_with(TokenEquals::new("abc"))
//!     .validate_with(TokenLength::new(3))
//!     .build()
//!     .expect("valid configuration");
//!
//! let result = chain.run(&platform).expect("platform answered");
//! let live = result.live().expect("every layer accepted");
//!
//! assert_eq!(live.to_u128(), Some(6));
//! assert!(chain.validate(live));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chain;
mod error;
mod hadamard;
pub mod numeral;
mod platform;
mod protocol;
mod result;
mod validation;

pub use chain::ChainBuilder;
pub use error::{
    BackendError, BackendErrorKind, ConfigurationError, ConfigurationErrorKind, Error,
};
pub use hadamard::{HadamardProtocol, MAX_QUBITS};
pub use platform::{ExtractionRequest, Measurement, Platform, ReplayPlatform};
pub use protocol::{ProtocolStrategy, QuantumProtocol, ValidationDecorator};
pub use result::{ErasedResult, ExtractionResult, LiveResult};
pub use validation::{
    AcceptAll, MonobitFrequency, RejectAll, TokenEquals, TokenLength, ValidationStrategy,
    MONOBIT_DEFAULT_MAX_Z,
};
