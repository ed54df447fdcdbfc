//! Upload waveform samples to MARM DDS signal generators.
//!
//! marmdds encodes a block of samples into the device's upload frame and
//! sends it over TCP. The device plays the samples back on its DAC.
//!
//! # Crate Structure
//!
//! - [`transport`] — TCP connection to the device
//! - [`frame`] — Frame encoder, frame writer and reply reader

/// Re-export transport types.
pub mod transport {
    pub use marmdds_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use marmdds_frame::*;
}
