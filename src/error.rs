use crate::common::IoPortValues;

/// Errors returned by the expander driver.
///
/// `E` is the error type of the [`Wire`][crate::Wire] transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus transport failed.
    Bus(E),
    /// A read returned more bytes than were requested.  The surplus was drained and discarded,
    /// `values` holds what was read before it.
    ExcessData {
        values: IoPortValues,
        requested: usize,
        received: usize,
    },
}

impl<E> Error<E> {
    /// The transport error, if this is one.
    pub fn bus_error(&self) -> Option<&E> {
        match self {
            Error::Bus(e) => Some(e),
            Error::ExcessData { .. } => None,
        }
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus error: {:?}", e),
            Error::ExcessData {
                requested,
                received,
                ..
            } => write!(
                f,
                "requested {} bytes but the bus delivered {}",
                requested, received
            ),
        }
    }
}
