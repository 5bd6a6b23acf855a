//! Audio alert module
//!
//! This module contains the warning alert dispatcher, the fallback tone
//! synthesis and the device audio backends.

pub mod alert;
pub mod device;
pub mod tone;

// Re-export main types
pub use alert::{
    create_alert_channel, AlertDispatcher, AlertOutcome, AlertRequest, AlertSender, AlertService,
    AudioCue, ToneEngine,
};
pub use device::{DeviceTone, FileCue};
pub use tone::{Envelope, TonePulse, ToneSpec, Waveform};
