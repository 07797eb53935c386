pub mod guard;
pub mod port;

pub use guard::{ChannelGuard, MutexSerial};
pub use port::{Channel, PortSettings, SerialDevice, COMMON_BAUD_RATES};
