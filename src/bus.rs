use embedded_hal::i2c as hal_i2c;
use heapless::{Deque, Vec};

/// Byte-oriented two-wire bus transport.
///
/// This is the streaming interface the driver talks to: a transmission is opened for a device
/// address, bytes are queued with [`write()`][Wire::write] and the transmission is closed with
/// [`end_transmission()`][Wire::end_transmission].  Reads are requested up front and then drained
/// byte by byte while [`available()`][Wire::available] reports data.
///
/// [`HalWire`] implements this for any `embedded_hal::i2c::I2c`.  Tests and unusual platforms can
/// implement it directly.
pub trait Wire {
    type Error;

    /// One-time initialization of the bus peripheral.
    fn begin(&mut self);

    /// Start queueing a write to the device at `address`.
    ///
    /// Bytes of a transmission that was never ended, because a [`write()`][Wire::write] failed,
    /// must be discarded here.  The driver does not end a transmission it could not fill.
    fn begin_transmission(&mut self, address: u8);

    /// Queue one byte for the current transmission.
    fn write(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Finish the current transmission.
    ///
    /// With `stop == false` the bus is not released, so a following
    /// [`request_from()`][Wire::request_from] continues the same session with a repeated start.
    fn end_transmission(&mut self, stop: bool) -> Result<(), Self::Error>;

    /// Read `count` bytes from the device at `address`.  Returns how many bytes were received.
    fn request_from(&mut self, address: u8, count: usize) -> Result<usize, Self::Error>;

    /// Number of received bytes not yet consumed by [`read()`][Wire::read].
    fn available(&self) -> usize;

    /// Take the next received byte.
    fn read(&mut self) -> Option<u8>;
}

impl<W: Wire + ?Sized> Wire for &mut W {
    type Error = W::Error;

    fn begin(&mut self) {
        W::begin(self)
    }

    fn begin_transmission(&mut self, address: u8) {
        W::begin_transmission(self, address)
    }

    fn write(&mut self, byte: u8) -> Result<(), Self::Error> {
        W::write(self, byte)
    }

    fn end_transmission(&mut self, stop: bool) -> Result<(), Self::Error> {
        W::end_transmission(self, stop)
    }

    fn request_from(&mut self, address: u8, count: usize) -> Result<usize, Self::Error> {
        W::request_from(self, address, count)
    }

    fn available(&self) -> usize {
        W::available(self)
    }

    fn read(&mut self) -> Option<u8> {
        W::read(self)
    }
}

/// Size of the transmit and receive buffers of [`HalWire`].
pub const WIRE_BUFFER_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WireError<E> {
    /// The underlying I2C peripheral reported an error.
    I2c(E),
    /// More bytes were queued than fit into the transmit buffer.
    TxOverflow,
    /// More bytes were requested than fit into the receive buffer.
    RxOverflow,
}

/// [`Wire`] implementation on top of an `embedded_hal::i2c::I2c` bus.
///
/// Queued bytes are sent as a single I2C write when the transmission ends with a stop.  When it
/// ends without a stop, the bytes are held back and sent together with the next
/// [`request_from()`][Wire::request_from] as one `write_read`.
pub struct HalWire<I2C> {
    i2c: I2C,
    address: u8,
    tx: Vec<u8, WIRE_BUFFER_LEN>,
    rx: Deque<u8, WIRE_BUFFER_LEN>,
    overflow: bool,
    held: bool,
}

impl<I2C> HalWire<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: 0,
            tx: Vec::new(),
            rx: Deque::new(),
            overflow: false,
            held: false,
        }
    }

    /// Give back the wrapped I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: hal_i2c::I2c> Wire for HalWire<I2C> {
    type Error = WireError<I2C::Error>;

    fn begin(&mut self) {
        // The HAL peripheral is configured by whoever constructed it.
        self.tx.clear();
        self.rx.clear();
        self.overflow = false;
        self.held = false;
    }

    fn begin_transmission(&mut self, address: u8) {
        if self.held {
            warn!("dropping {} held bytes for {:#x}", self.tx.len(), self.address);
            self.held = false;
        }
        self.address = address;
        self.tx.clear();
        self.overflow = false;
    }

    fn write(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.tx.push(byte).map_err(|_| {
            self.overflow = true;
            WireError::TxOverflow
        })
    }

    fn end_transmission(&mut self, stop: bool) -> Result<(), Self::Error> {
        if self.overflow {
            self.tx.clear();
            self.overflow = false;
            return Err(WireError::TxOverflow);
        }
        if !stop {
            self.held = true;
            return Ok(());
        }
        let result = self.i2c.write(self.address, &self.tx).map_err(WireError::I2c);
        self.tx.clear();
        result
    }

    fn request_from(&mut self, address: u8, count: usize) -> Result<usize, Self::Error> {
        if count > WIRE_BUFFER_LEN {
            return Err(WireError::RxOverflow);
        }
        self.rx.clear();

        let mut buf = [0x00; WIRE_BUFFER_LEN];
        let buf = &mut buf[..count];
        let result = if self.held && self.address == address {
            self.i2c.write_read(address, &self.tx, buf)
        } else {
            self.i2c.read(address, buf)
        };
        self.held = false;
        self.tx.clear();
        result.map_err(WireError::I2c)?;

        for &byte in buf.iter() {
            // Cannot fail, `count` was checked against the capacity above.
            let _ = self.rx.push_back(byte);
        }
        Ok(self.rx.len())
    }

    fn available(&self) -> usize {
        self.rx.len()
    }

    fn read(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::{HalWire, Wire, WireError, WIRE_BUFFER_LEN};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c as mock_i2c;

    #[test]
    fn write_is_sent_on_stop() {
        let expectations = [mock_i2c::Transaction::write(0x20, vec![0x06, 0xf0])];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut wire = HalWire::new(bus.clone());
        wire.begin();
        wire.begin_transmission(0x20);
        wire.write(0x06).unwrap();
        wire.write(0xf0).unwrap();
        wire.end_transmission(true).unwrap();

        bus.done();
    }

    #[test]
    fn repeated_start_becomes_write_read() {
        let expectations = [mock_i2c::Transaction::write_read(
            0x20,
            vec![0x00],
            vec![0x12, 0x34],
        )];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut wire = HalWire::new(bus.clone());
        wire.begin_transmission(0x20);
        wire.write(0x00).unwrap();
        wire.end_transmission(false).unwrap();
        assert_eq!(wire.request_from(0x20, 2).unwrap(), 2);

        assert_eq!(wire.available(), 2);
        assert_eq!(wire.read(), Some(0x12));
        assert_eq!(wire.available(), 1);
        assert_eq!(wire.read(), Some(0x34));
        assert_eq!(wire.available(), 0);
        assert_eq!(wire.read(), None);

        bus.done();
    }

    #[test]
    fn plain_read_without_held_bytes() {
        let expectations = [mock_i2c::Transaction::read(0x20, vec![0xaa])];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut wire = HalWire::new(bus.clone());
        assert_eq!(wire.request_from(0x20, 1).unwrap(), 1);
        assert_eq!(wire.read(), Some(0xaa));

        bus.done();
    }

    #[test]
    fn tx_overflow_is_reported_and_nothing_is_sent() {
        let mut bus = mock_i2c::Mock::new(&[]);

        let mut wire = HalWire::new(bus.clone());
        wire.begin_transmission(0x20);
        for i in 0..WIRE_BUFFER_LEN {
            wire.write(i as u8).unwrap();
        }
        assert_eq!(wire.write(0xff), Err(WireError::TxOverflow));
        assert_eq!(wire.end_transmission(true), Err(WireError::TxOverflow));

        bus.done();
    }

    #[test]
    fn unfinished_transmission_is_discarded() {
        let expectations = [mock_i2c::Transaction::write(0x20, vec![0x01, 0x3c])];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut wire = HalWire::new(bus.clone());
        wire.begin_transmission(0x20);
        for _ in 0..=WIRE_BUFFER_LEN {
            let _ = wire.write(0xee);
        }
        // never ended, the next transmission starts clean
        wire.begin_transmission(0x20);
        wire.write(0x01).unwrap();
        wire.write(0x3c).unwrap();
        wire.end_transmission(true).unwrap();

        bus.done();
    }

    #[test]
    fn oversized_request_is_rejected() {
        let mut bus = mock_i2c::Mock::new(&[]);

        let mut wire = HalWire::new(bus.clone());
        assert_eq!(
            wire.request_from(0x20, WIRE_BUFFER_LEN + 1),
            Err(WireError::RxOverflow)
        );
        assert_eq!(wire.available(), 0);

        bus.done();
    }

    #[test]
    fn nack_is_forwarded() {
        let expectations = [mock_i2c::Transaction::write(0x20, vec![0x00, 0x55])
            .with_error(ErrorKind::Other)];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut wire = HalWire::new(bus.clone());
        wire.begin_transmission(0x20);
        wire.write(0x00).unwrap();
        wire.write(0x55).unwrap();
        assert_eq!(
            wire.end_transmission(true),
            Err(WireError::I2c(ErrorKind::Other))
        );

        bus.done();
    }
}
