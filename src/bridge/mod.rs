//! Bridge to the browser-automation driver
//!
//! Prompt composition, dispatch rate limiting, the driver process
//! protocol, and the image side channel.

pub mod backend;
pub mod error;
pub mod invoker;
pub mod rate_gate;
pub mod side_channel;

pub use backend::{AutomationBackend, DriverProcess, InvokeRequest};
pub use error::{BridgeError, SideChannelError};
pub use invoker::BridgeInvoker;
pub use rate_gate::RateGate;
pub use side_channel::{ClipboardSideChannel, ImageSideChannel, NoopSideChannel};
