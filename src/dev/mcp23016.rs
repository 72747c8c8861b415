//! Support for the `MCP23016` "16-Bit I2C I/O Expander"
//!
//! The MCP23016 offers two eight-bit GPIO ports, GP0 and GP1.  The three address pins are tied
//! to ground on the target board, so the device always answers at [`ADDRESS`].
//!
//! GP0 bits 7..4 drive the H-bridge of the drive train, see [`crate::motor`].
use crate::bus::Wire;
use crate::common::{IoPolarity, IoPortValues, IoState, Port};
use crate::error::Error;
use crate::motor::MotorDirections;

/// I2C address of the expander: `0b0100_A2A1A0` with all address pins low.
pub const ADDRESS: u8 = 0x20;

/// Upper bound on bytes taken from the bus by a single read, whatever it reports as available.
const MAX_DRAIN: usize = crate::bus::WIRE_BUFFER_LEN;

/// `MCP23016` "16-Bit I2C I/O Expander", shared through a [`PortMutex`][crate::PortMutex]
pub struct Mcp23016<M>(M);

impl<W> Mcp23016<core::cell::RefCell<Driver<W>>>
where
    W: Wire,
{
    /// Start the bus and create a new instance.
    pub fn new(bus: W) -> Self {
        Self::with_mutex(bus)
    }
}

impl<I2C> Mcp23016<core::cell::RefCell<Driver<crate::HalWire<I2C>>>>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Create a new instance on top of an `embedded-hal` I2C bus.
    pub fn new_i2c(i2c: I2C) -> Self {
        Self::with_mutex(crate::HalWire::new(i2c))
    }
}

impl<W, M> Mcp23016<M>
where
    W: Wire,
    M: crate::PortMutex<Port = Driver<W>>,
{
    pub fn with_mutex(bus: W) -> Self {
        Self(crate::PortMutex::create(Driver::new(bus)))
    }

    /// See [`Driver::set_direction()`].
    pub fn set_direction(&self, port0: u8, port1: u8) -> Result<IoState, Error<W::Error>> {
        self.0.lock(|drv| drv.set_direction(port0, port1))
    }

    /// See [`Driver::set_polarity()`].
    pub fn set_polarity(&self, port0: u8, port1: u8) -> Result<IoPolarity, Error<W::Error>> {
        self.0.lock(|drv| drv.set_polarity(port0, port1))
    }

    /// See [`Driver::write_port()`].
    pub fn write_port(&self, port: Port, data: u8) -> Result<(), Error<W::Error>> {
        self.0.lock(|drv| drv.write_port(port, data))
    }

    /// See [`Driver::read_ports()`].
    pub fn read_ports(&self, port: Port) -> Result<IoPortValues, Error<W::Error>> {
        self.0.lock(|drv| drv.read_ports(port))
    }

    /// See [`Driver::set_motor_directions()`].
    ///
    /// The read and the write-back happen under the same lock, so no other user of this expander
    /// can write GP0 in between.
    pub fn set_motor_directions(
        &self,
        directions: MotorDirections,
    ) -> Result<u8, Error<W::Error>> {
        self.0.lock(|drv| drv.set_motor_directions(directions))
    }

    /// Run several operations under a single lock.
    pub fn with_driver<R, F: FnOnce(&mut Driver<W>) -> R>(&self, f: F) -> R {
        self.0.lock(f)
    }

    /// Destroy the expander and give back the bus.
    pub fn release(self) -> W {
        self.0.into_inner().release()
    }
}

/// Registers of the MCP23016 that this driver touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Regs {
    /// GP: port data, reading returns the pin levels, writing sets the output latches
    GP0 = 0x00,
    GP1 = 0x01,
    /// IPOL: input polarity: 0=register values match input pins; 1=opposite
    IPOL0 = 0x04,
    IPOL1 = 0x05,
    /// IODIR: input/output direction: 0=output; 1=input
    IODIR0 = 0x06,
    IODIR1 = 0x07,
}

impl Regs {
    fn data(port: Port) -> Self {
        match port {
            Port::Port0 => Regs::GP0,
            Port::Port1 => Regs::GP1,
        }
    }
}

impl From<Regs> for u8 {
    fn from(r: Regs) -> u8 {
        r as u8
    }
}

/// Register-level driver.
///
/// Every method performs a fresh bus session; no chip state is cached.
pub struct Driver<W> {
    bus: W,
}

impl<W: Wire> Driver<W> {
    /// Start the bus and take ownership of it.
    pub fn new(mut bus: W) -> Self {
        bus.begin();
        debug!("bus started for expander at {:#x}", ADDRESS);
        Self { bus }
    }

    /// Give back the bus.
    pub fn release(self) -> W {
        self.bus
    }

    /// Write `(register, value)` pairs in one session.
    fn write_regs(&mut self, writes: &[(Regs, u8)]) -> Result<(), Error<W::Error>> {
        self.bus.begin_transmission(ADDRESS);
        for &(reg, value) in writes {
            trace!("write {:#x} <- {:#x}", u8::from(reg), value);
            self.bus.write(reg.into()).map_err(Error::Bus)?;
            self.bus.write(value).map_err(Error::Bus)?;
        }
        self.bus.end_transmission(true).map_err(Error::Bus)
    }

    /// Configure the direction of both ports.  A 1 bit makes the pin an input, a 0 bit an output.
    ///
    /// The returned state echoes the request, it is not read back from the chip.
    pub fn set_direction(&mut self, port0: u8, port1: u8) -> Result<IoState, Error<W::Error>> {
        self.write_regs(&[(Regs::IODIR0, port0), (Regs::IODIR1, port1)])?;
        Ok(IoState { port0, port1 })
    }

    /// Invert the read value of every pin with a 1 bit.
    pub fn set_polarity(&mut self, port0: u8, port1: u8) -> Result<IoPolarity, Error<W::Error>> {
        self.write_regs(&[(Regs::IPOL0, port0), (Regs::IPOL1, port1)])?;
        Ok(IoPolarity { port0, port1 })
    }

    /// Write `data` to the output latches of `port`.
    pub fn write_port(&mut self, port: Port, data: u8) -> Result<(), Error<W::Error>> {
        self.write_regs(&[(Regs::data(port), data)])
    }

    /// Read the pin levels, starting at GP0.
    ///
    /// [`Port::Port0`] reads one byte and leaves `port1` at 0, [`Port::Port1`] reads both.  The
    /// bytes the bus reports are drained, at most [`crate::WIRE_BUFFER_LEN`] of them.  If there
    /// are more than requested the surplus is discarded and [`Error::ExcessData`] carries the
    /// values read before it.  A short read leaves missing ports at 0.
    pub fn read_ports(&mut self, port: Port) -> Result<IoPortValues, Error<W::Error>> {
        let requested = port.read_len();

        self.bus.begin_transmission(ADDRESS);
        self.bus.write(Regs::GP0.into()).map_err(Error::Bus)?;
        self.bus.end_transmission(false).map_err(Error::Bus)?;
        let reported = self
            .bus
            .request_from(ADDRESS, requested)
            .map_err(Error::Bus)?;
        trace!("requested {} bytes, bus reported {}", requested, reported);

        let mut buf = [0x00; 2];
        let mut received = 0;
        while received < MAX_DRAIN && self.bus.available() > 0 {
            let Some(byte) = self.bus.read() else {
                break;
            };
            if let Some(slot) = buf.get_mut(received) {
                *slot = byte;
            }
            received += 1;
        }

        let mut values = IoPortValues {
            port0: buf[0],
            port1: buf[1],
        };
        if received > requested {
            if self.bus.available() > 0 {
                warn!("bus still reports data after {} bytes", received);
            }
            warn!("read {} bytes, expected {}", received, requested);
            if port == Port::Port0 {
                values.port1 = 0;
            }
            return Err(Error::ExcessData {
                values,
                requested,
                received,
            });
        }
        if received < requested {
            warn!("short read: {} of {} bytes", received, requested);
        }

        Ok(values)
    }

    /// Drive the H-bridge inputs on GP0 bits 7..4, keeping bits 3..0 as they are.
    ///
    /// This reads GP0, merges the new bits and writes it back.  Returns the value written.
    pub fn set_motor_directions(
        &mut self,
        directions: MotorDirections,
    ) -> Result<u8, Error<W::Error>> {
        let current = self.read_ports(Port::Port0)?.port0;
        let value = directions.apply(current);
        debug!("motor bits {:#x} -> {:#x}", current, value);
        self.write_port(Port::Port0, value)?;
        Ok(value)
    }
}
