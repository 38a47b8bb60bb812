//! Host protocol: fixed-width binary packets over any byte transport.
//!
//! ```text
//! ┌───────────┐   ┌──────────────────┐   ┌──────────────────────┐
//! │ Transport │──▶│ FramedLink       │──▶│ codec::decode_command│──▶ Dispatcher
//! │ (trait)   │   │ (64-byte packets)│   │ (tag → Command)      │
//! └───────────┘   └──────────────────┘   └──────────────────────┘
//!       ▲                                           │
//!       └────────────── codec::encode_* ◀───────────┘
//! ```
//!
//! There is no framing beyond the fixed packet width: every packet is
//! exactly [`PACKET_LEN`](packet::PACKET_LEN) bytes.

pub mod codec;
pub mod packet;
pub mod transport;
