//! Driver for the MCP23016 16-bit I2C I/O expander.
//!
//! The expander is used on a two-motor drive train: GP0 bits 7..4 are wired to the inputs of an
//! H-bridge and the remaining pins are general purpose.
//!
//! ```
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[
//! #     embedded_hal_mock::eh1::i2c::Transaction::write(0x20, vec![0x06, 0x0f, 0x07, 0xff]),
//! #     embedded_hal_mock::eh1::i2c::Transaction::write_read(0x20, vec![0x00], vec![0x03]),
//! #     embedded_hal_mock::eh1::i2c::Transaction::write(0x20, vec![0x00, 0x93]),
//! # ]);
//! # let mut done = i2c.clone();
//! use mcp23016::{Drive, Mcp23016, MotorDirections, ALL_INPUT};
//!
//! let mcp = Mcp23016::new_i2c(i2c);
//! // H-bridge nibble as outputs, everything else as inputs
//! mcp.set_direction(0x0f, ALL_INPUT).unwrap();
//! mcp.set_motor_directions(MotorDirections::from_drive(Drive::Forward, Drive::Reverse))
//!     .unwrap();
//! # done.done();
//! ```
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[macro_use]
mod fmt;

mod bus;
mod common;
pub mod dev;
mod error;
pub mod motor;
mod mutex;

pub use bus::{HalWire, Wire, WireError, WIRE_BUFFER_LEN};
pub use common::{IoPolarity, IoPortValues, IoState, Port, ALL_INPUT, ALL_OUTPUT};
pub use error::Error;
pub use motor::{Drive, MotorDirections, MotorMasks};
pub use mutex::PortMutex;

pub use dev::mcp23016::{Driver, Mcp23016, ADDRESS};
