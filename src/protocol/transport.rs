//! Byte channel underneath the packet link.
//!
//! [`FramedLink`](crate::adapters::packet_link::FramedLink) polls the
//! transport from the main loop between acquisition ticks, so a read must
//! never wait for the host.  Packets have no header or checksum: the link
//! counts bytes until 64 have arrived, and any byte lost or duplicated by
//! the transport shifts every later packet.

use core::convert::Infallible;

/// A byte stream to the host.
///
/// Contract relied on by the packet link:
/// - `read` returns immediately with the bytes already buffered, never
///   more than `buf.len()`.  `Ok(0)` means nothing is pending right now,
///   not end of stream.
/// - `write` may take only a prefix of `data`.  `Ok(0)` means the channel
///   accepted nothing and the caller should give up on this packet.
/// - `flush` returns once every accepted byte has left the device, so a
///   reply is on the wire before the next command is polled.
pub trait Transport {
    type Error: core::fmt::Debug;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// No host attached: reads stay empty and writes are swallowed whole.
/// Counts what it swallowed so host runs can see output was produced.
#[derive(Debug, Default)]
pub struct NullTransport {
    discarded: usize,
}

impl NullTransport {
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}

impl Transport for NullTransport {
    type Error = Infallible;

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Infallible> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Infallible> {
        self.discarded += data.len();
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}
