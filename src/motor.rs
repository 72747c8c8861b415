//! H-bridge direction bits on GP0.
//!
//! The motor driver inputs are wired to the upper nibble of GP0:
//!
//! | GP0 bit | H-bridge input |
//! | --- | --- |
//! | 7 | `AIN1` |
//! | 6 | `AIN2` |
//! | 5 | `BIN1` |
//! | 4 | `BIN2` |
//!
//! Bits 3..0 belong to other peripherals and are never changed by the helpers in this module.

const AIN1_BIT: u8 = 7;
const AIN2_BIT: u8 = 6;
const BIN1_BIT: u8 = 5;
const BIN2_BIT: u8 = 4;

/// Bits of GP0 not driven by the H-bridge.
pub const PRESERVED_BITS: u8 = 0x0f;

/// Drive mode of one H-bridge channel, as its `(IN1, IN2)` input pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Drive {
    /// Both inputs low, the motor spins freely.
    Coast,
    /// `IN1` high, `IN2` low.
    Forward,
    /// `IN1` low, `IN2` high.
    Reverse,
    /// Both inputs high, short brake.
    Brake,
}

impl Drive {
    fn inputs(self) -> (bool, bool) {
        match self {
            Drive::Coast => (false, false),
            Drive::Forward => (true, false),
            Drive::Reverse => (false, true),
            Drive::Brake => (true, true),
        }
    }
}

/// Desired levels of the four H-bridge inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorDirections {
    pub ain1: bool,
    pub ain2: bool,
    pub bin1: bool,
    pub bin2: bool,
}

/// The pair of masks used to merge the H-bridge bits into a GP0 value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorMasks {
    /// Bits of the current value that survive.
    pub keep: u8,
    /// Bits forced high.
    pub set: u8,
}

impl MotorDirections {
    pub fn new(ain1: bool, ain2: bool, bin1: bool, bin2: bool) -> Self {
        Self {
            ain1,
            ain2,
            bin1,
            bin2,
        }
    }

    /// Inputs for channel A driven as `a` and channel B driven as `b`.
    pub fn from_drive(a: Drive, b: Drive) -> Self {
        let (ain1, ain2) = a.inputs();
        let (bin1, bin2) = b.inputs();
        Self::new(ain1, ain2, bin1, bin2)
    }

    /// Build the keep and set masks.
    ///
    /// Every high input is OR-ed into both masks at its bit, so high inputs are kept and forced
    /// high while low inputs are cleared.
    pub fn masks(&self) -> MotorMasks {
        let mut keep = PRESERVED_BITS;
        let mut set = 0x00;
        for (level, bit) in [
            (self.ain1, AIN1_BIT),
            (self.ain2, AIN2_BIT),
            (self.bin1, BIN1_BIT),
            (self.bin2, BIN2_BIT),
        ] {
            keep |= (level as u8) << bit;
            set |= (level as u8) << bit;
        }
        MotorMasks { keep, set }
    }

    /// Merge the H-bridge bits into `current`, leaving [`PRESERVED_BITS`] untouched.
    pub fn apply(&self, current: u8) -> u8 {
        let MotorMasks { keep, set } = self.masks();
        (current & keep) | set
    }
}

#[cfg(test)]
mod tests {
    use super::{Drive, MotorDirections, MotorMasks, PRESERVED_BITS};

    #[test]
    fn masks_for_ain_high() {
        let dirs = MotorDirections::new(true, true, false, false);
        assert_eq!(
            dirs.masks(),
            MotorMasks {
                keep: 0b1100_1111,
                set: 0b1100_0000,
            }
        );
        assert_eq!(dirs.apply(0b1010_1010), 0b1100_1010);
    }

    #[test]
    fn bit_order() {
        assert_eq!(MotorDirections::new(true, false, false, false).masks().set, 0x80);
        assert_eq!(MotorDirections::new(false, true, false, false).masks().set, 0x40);
        assert_eq!(MotorDirections::new(false, false, true, false).masks().set, 0x20);
        assert_eq!(MotorDirections::new(false, false, false, true).masks().set, 0x10);
    }

    #[test]
    fn low_nibble_is_preserved() {
        for current in 0..=u8::MAX {
            for pattern in 0..16u8 {
                let dirs = MotorDirections::new(
                    pattern & 0b1000 != 0,
                    pattern & 0b0100 != 0,
                    pattern & 0b0010 != 0,
                    pattern & 0b0001 != 0,
                );
                let merged = dirs.apply(current);
                assert_eq!(merged & PRESERVED_BITS, current & PRESERVED_BITS);
                assert_eq!(merged >> 4, pattern);
            }
        }
    }

    #[test]
    fn apply_is_idempotent() {
        let dirs = MotorDirections::new(false, true, true, false);
        let once = dirs.apply(0x5a);
        assert_eq!(dirs.apply(once), once);
    }

    #[test]
    fn drive_modes() {
        assert_eq!(
            MotorDirections::from_drive(Drive::Forward, Drive::Reverse),
            MotorDirections::new(true, false, false, true)
        );
        assert_eq!(
            MotorDirections::from_drive(Drive::Brake, Drive::Coast),
            MotorDirections::new(true, true, false, false)
        );
        assert_eq!(
            MotorDirections::from_drive(Drive::Coast, Drive::Coast).apply(0xff),
            0x0f
        );
    }
}
