use std::fmt;

/// Outcome of one `run` through a protocol chain.
///
/// A chain always hands back an `ExtractionResult` once the platform has
/// answered. Whether the bits can be trusted is encoded in the variant:
///
/// - [`Live`](Self::Live): every validation layer accepted the token
/// - [`Erased`](Self::Erased): some layer rejected it and the value was
///   destroyed before it left the chain
///
/// This keeps "extraction ran but failed validation" distinct from
/// "extraction failed", which is an `Err` from `run`.
///
/// # Examples
///
/// ```
/// use qrand_core::{
///     ChainBuilder, HadamardProtocol, Measurement, QuantumProtocol, ReplayPlatform, TokenLength,
/// };
///
/// let platform = ReplayPlatform::new(vec![Measurement::from_bitstring("1011").unwrap()]);
/// let chain = ChainBuilder::new(HadamardProtocol::new(4))
///     .validate_with(TokenLength::new(3))
///     .build()
///     .unwrap();
///
/// let result = chain.run(&platform).unwrap();
/// assert!(!result.is_live());
///
/// // Nothing left to read
/// assert!(result.live().is_none());
/// ```
#[derive(Debug)]
pub enum ExtractionResult {
    /// Accepted result whose value can be read
    Live(LiveResult),
    /// Rejected result; its value has been destroyed
    Erased(ErasedResult),
}

impl ExtractionResult {
    /// Returns `true` if the value is still readable.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    /// Borrows the live result, if any.
    pub fn live(&self) -> Option<&LiveResult> {
        match self {
            Self::Live(live) => Some(live),
            Self::Erased(_) => None,
        }
    }

    /// Consumes the result, returning the live value if there is one.
    pub fn into_live(self) -> Option<LiveResult> {
        match self {
            Self::Live(live) => Some(live),
            Self::Erased(_) => None,
        }
    }

    /// Returns the validation token while the result is live.
    pub fn validation_token(&self) -> Option<&str> {
        self.live().map(LiveResult::validation_token)
    }

    /// Destroys the value. Erasing an already erased result is a no-op.
    pub fn erase(self) -> Self {
        match self {
            Self::Live(live) => Self::Erased(live.erase()),
            Self::Erased(erased) => Self::Erased(erased.erase()),
        }
    }
}

impl From<LiveResult> for ExtractionResult {
    fn from(live: LiveResult) -> Self {
        Self::Live(live)
    }
}

/// Readable outcome of an extraction: the measured bits and the token
/// validation strategies inspect.
///
/// Only a terminal protocol inside this crate can create one, from a
/// platform [`Measurement`](crate::Measurement). The token never changes
/// after creation.
///
/// The random bits are treated as key material: `Debug` output never shows
/// them or the token.
// Do NOT derive Clone: a duplicate would survive erasure of the original.
pub struct LiveResult {
    // One byte per measured bit, each 0 or 1, most significant first
    bits: Vec<u8>,
    validation_token: String,
}

impl LiveResult {
    /// Creates a live result from already checked bits.
    ///
    /// Callers must guarantee every element of `bits` is 0 or 1.
    pub(crate) fn new_unchecked(bits: Vec<u8>, validation_token: String) -> Self {
        Self {
            bits,
            validation_token,
        }
    }

    /// Number of measured bits.
    pub fn num_bits(&self) -> usize {
        self.bits.len()
    }

    /// Measured bits as a string of `'0'` and `'1'`, most significant first.
    pub fn bitstring(&self) -> String {
        self.bits
            .iter()
            .map(|&b| if b == 1 { '1' } else { '0' })
            .collect()
    }

    /// Token inspected by validation strategies.
    pub fn validation_token(&self) -> &str {
        &self.validation_token
    }

    /// The bits read as an unsigned big-endian integer, packed into bytes.
    ///
    /// The first byte is left-padded with zeros when the bit count is not a
    /// multiple of eight. An empty measurement yields an empty vector.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let pad = (8 - self.bits.len() % 8) % 8;
        let mut bytes = Vec::with_capacity((self.bits.len() + pad) / 8);
        let mut acc = 0u8;
        for (i, &bit) in std::iter::repeat(&0u8)
            .take(pad)
            .chain(self.bits.iter())
            .enumerate()
        {
            acc = (acc << 1) | bit;
            if i % 8 == 7 {
                bytes.push(acc);
                acc = 0;
            }
        }
        bytes
    }

    /// The bits read as an unsigned integer.
    ///
    /// Returns `None` when the value needs more than 128 bits.
    pub fn to_u128(&self) -> Option<u128> {
        let significant = self.bits.iter().skip_while(|&&b| b == 0);
        let mut value: u128 = 0;
        for &bit in significant {
            value = value.checked_mul(2)? | u128::from(bit);
        }
        Some(value)
    }

    /// Destroys the value, overwriting the bit buffer and the token.
    pub fn erase(mut self) -> ErasedResult {
        wipe(&mut self.bits);
        let mut token = std::mem::take(&mut self.validation_token).into_bytes();
        wipe(&mut token);
        ErasedResult { _private: () }
    }
}

fn wipe(buf: &mut Vec<u8>) {
    buf.iter_mut().for_each(|b| *b = 0);
    // Keep the writes from being elided as dead stores
    std::hint::black_box(&buf);
    buf.clear();
}

impl fmt::Debug for LiveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveResult")
            .field("num_bits", &self.bits.len())
            .field("bits", &"[REDACTED]")
            .field("validation_token", &"[REDACTED]")
            .finish()
    }
}

/// A result whose value has been destroyed.
///
/// Carries no value-bearing fields at all, so reading after erasure does
/// not compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErasedResult {
    _private: (),
}

impl ErasedResult {
    /// Erasure is idempotent: erasing again leaves the same state.
    pub fn erase(self) -> Self {
        self
    }
}
