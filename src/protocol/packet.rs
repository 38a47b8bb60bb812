//! Fixed-width packet buffer and field accessors.
//!
//! Multi-byte fields are big-endian.  Floats are IEEE-754 single precision.

/// Size of every command and response packet.
pub const PACKET_LEN: usize = 64;

/// One command or response packet.
pub type Packet = [u8; PACKET_LEN];

/// A zeroed packet.
pub const fn empty() -> Packet {
    [0; PACKET_LEN]
}

/// Read a big-endian `f32` at `offset`.
pub fn read_f32_be(packet: &Packet, offset: usize) -> f32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&packet[offset..offset + 4]);
    f32::from_be_bytes(raw)
}

/// Write a big-endian `f32` at `offset`.
pub fn write_f32_be(packet: &mut Packet, offset: usize, value: f32) {
    packet[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

/// Read a signed byte at `offset`.
pub fn read_i8(packet: &Packet, offset: usize) -> i8 {
    packet[offset] as i8
}

/// Write a big-endian `u16` at `offset`.
pub fn write_u16_be(packet: &mut Packet, offset: usize, value: u16) {
    packet[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

/// Read a big-endian `u16` at `offset`.
pub fn read_u16_be(packet: &Packet, offset: usize) -> u16 {
    u16::from_be_bytes([packet[offset], packet[offset + 1]])
}
