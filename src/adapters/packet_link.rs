//! Packet link adapter: fixed 64-byte framing over any [`Transport`].
//!
//! ```text
//!   host ──bytes──▶ Transport ──▶ FramedLink::poll_packet ──▶ Packet
//!   Packet ──▶ PacketLink::send_* ──▶ FramedLink::write_packet ──▶ host
//! ```
//!
//! The stream carries whole packets back to back with no header, so the
//! only framing state is how many bytes of the current packet have arrived.
//! Reads never ask for more than the remainder of the current packet.

use log::{trace, warn};

use crate::app::ports::PacketLink;
use crate::error::LinkError;
use crate::geometry::{RawSample, RotatedSample};
use crate::protocol::codec;
use crate::protocol::packet::{self, PACKET_LEN, Packet};
use crate::protocol::transport::Transport;

/// Bidirectional packet link on top of a byte transport.
pub struct FramedLink<T: Transport> {
    transport: T,
    rx: Packet,
    filled: usize,
}

impl<T: Transport> FramedLink<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            rx: packet::empty(),
            filled: 0,
        }
    }

    /// Drain whatever the transport has buffered.  Returns `Ok(true)` and
    /// fills `out` once a whole packet has arrived; a partial packet stays
    /// buffered for the next call.
    pub fn poll_packet(&mut self, out: &mut Packet) -> Result<bool, LinkError> {
        loop {
            let n = self
                .transport
                .read(&mut self.rx[self.filled..])
                .map_err(|e| {
                    warn!("link: read failed: {:?}", e);
                    LinkError::Transport
                })?;
            if n == 0 {
                return Ok(false);
            }
            self.filled += n;
            if self.filled == PACKET_LEN {
                *out = self.rx;
                self.rx = packet::empty();
                self.filled = 0;
                trace!("link: packet in, tag=0x{:02x}", out[0]);
                return Ok(true);
            }
        }
    }

    /// Bytes of the next packet received so far.
    pub fn pending(&self) -> usize {
        self.filled
    }

    /// Drop a partially received packet, e.g. after the host reconnects.
    pub fn resync(&mut self) {
        self.rx = packet::empty();
        self.filled = 0;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    fn write_packet(&mut self, packet: &Packet) -> Result<(), LinkError> {
        let mut sent = 0;
        while sent < PACKET_LEN {
            let n = self.transport.write(&packet[sent..]).map_err(|e| {
                warn!("link: write failed: {:?}", e);
                LinkError::Transport
            })?;
            if n == 0 {
                return Err(LinkError::ShortWrite);
            }
            sent += n;
        }
        self.transport.flush().map_err(|e| {
            warn!("link: flush failed: {:?}", e);
            LinkError::Transport
        })
    }
}

impl<T: Transport> PacketLink for FramedLink<T> {
    fn send_raw_packet(&mut self, packet: &Packet) -> Result<(), LinkError> {
        self.write_packet(packet)
    }

    fn send_rotated_sample(&mut self, sample: &RotatedSample) -> Result<(), LinkError> {
        self.write_packet(&codec::encode_rotated_sample(sample))
    }

    fn send_raw_sample(
        &mut self,
        group_a: u8,
        group_b: u8,
        sample: &RawSample,
    ) -> Result<(), LinkError> {
        self.write_packet(&codec::encode_raw_sample(group_a, group_b, sample))
    }
}
