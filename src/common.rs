/// Direction mask making every pin of a port an output.
pub const ALL_OUTPUT: u8 = 0x00;
/// Direction mask making every pin of a port an input.
pub const ALL_INPUT: u8 = 0xff;

/// Selects one of the two 8-bit ports of the expander.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    /// GP0
    Port0,
    /// GP1
    Port1,
}

impl Port {
    /// Number of bytes a read starting at GP0 needs to cover this port.
    pub(crate) fn read_len(self) -> usize {
        match self {
            Port::Port0 => 1,
            Port::Port1 => 2,
        }
    }
}

/// Direction configuration of both ports, as requested by
/// [`Driver::set_direction()`][crate::dev::mcp23016::Driver::set_direction].
///
/// Each bit is 1 for an input and 0 for an output.  This echoes the request and is never read back
/// from the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IoState {
    pub port0: u8,
    pub port1: u8,
}

/// Input polarity of both ports, as requested by
/// [`Driver::set_polarity()`][crate::dev::mcp23016::Driver::set_polarity].
///
/// A 1 bit inverts the value read from that pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IoPolarity {
    pub port0: u8,
    pub port1: u8,
}

/// Logic levels of both ports at the time of a single read.
///
/// `port1` is 0 when only GP0 was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IoPortValues {
    pub port0: u8,
    pub port1: u8,
}

impl IoPortValues {
    /// Both ports as one 16-bit value, GP1 in the upper byte.
    pub fn as_u16(&self) -> u16 {
        u16::from_le_bytes([self.port0, self.port1])
    }
}
