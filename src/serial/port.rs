use std::io::{Read, Write};
use std::time::Duration;

use log::{debug, error, info};
pub use serialport::{
    available_ports, DataBits, FlowControl, Parity, SerialPort, SerialPortInfo, StopBits,
};

use crate::error::{RemoteSerialError, Result};

/// serial port baud rate
pub const COMMON_BAUD_RATES: &[u32] = &[
    4800, 9600, 19200, 38400, 57600, 115200, 230400, 460800, 500000, 576000, 921600, 1000000,
    1500000, 2000000,
];

/// serial port settings
#[derive(Clone, Debug)]
pub struct PortSettings {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
    pub flow_control: FlowControl,
    pub timeout: Duration,
}

/// serial port settings implementation
impl PortSettings {
    /// settings for `port_name` at `baud_rate`, 8N1 with no flow control
    pub fn new(port_name: impl Into<String>, baud_rate: u32) -> Self {
        PortSettings {
            port_name: port_name.into(),
            baud_rate,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
            flow_control: FlowControl::None,
            timeout: Duration::from_millis(500),
        }
    }

    /// set read/write timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Communication endpoint placed behind [`MutexSerial`].
///
/// `close` must be a no-op on an already-closed channel; it is invoked on
/// every release of the guard, including failure paths.
///
/// [`MutexSerial`]: crate::serial::guard::MutexSerial
#[cfg_attr(test, mockall::automock)]
pub trait Channel: Send {
    /// Open the channel using its stored configuration.
    fn open(&mut self) -> Result<()>;

    /// Close the channel. No-op when already closed.
    fn close(&mut self);

    /// Whether the channel is currently open.
    fn is_open(&self) -> bool;

    /// Write `data` to the channel, returning the number of bytes sent.
    fn send(&mut self, data: &[u8]) -> Result<usize>;

    /// Read from the channel into `buf`, returning the number of bytes read.
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// Serial device bound to a port/baud configuration. The device connection
/// itself is opened and closed through the [`Channel`] operations.
pub struct SerialDevice {
    settings: PortSettings,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialDevice {
    /// device for `settings`, initially closed
    pub fn new(settings: PortSettings) -> Self {
        SerialDevice {
            settings,
            port: None,
        }
    }

    /// get port settings
    pub fn settings(&self) -> &PortSettings {
        &self.settings
    }
}

impl Channel for SerialDevice {
    fn open(&mut self) -> Result<()> {
        if self.port.is_some() {
            return Ok(());
        }
        match serialport::new(self.settings.port_name.as_str(), self.settings.baud_rate)
            .data_bits(self.settings.data_bits)
            .stop_bits(self.settings.stop_bits)
            .parity(self.settings.parity)
            .flow_control(self.settings.flow_control)
            .timeout(self.settings.timeout)
            .open()
        {
            Ok(port) => {
                info!(
                    "opened serial port {} at {} baud",
                    self.settings.port_name, self.settings.baud_rate
                );
                self.port = Some(port);
                Ok(())
            }
            Err(e) => {
                error!("cannot open serial port {}: {}", self.settings.port_name, e);
                Err(RemoteSerialError::port_open(
                    self.settings.port_name.as_str(),
                    e.to_string(),
                ))
            }
        }
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            info!("closed serial port {}", self.settings.port_name);
        }
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn send(&mut self, data: &[u8]) -> Result<usize> {
        let port = self
            .port
            .as_mut()
            .ok_or_else(|| RemoteSerialError::port_write("port is not open"))?;
        debug!("tx {}", hex::encode(data));
        port.write_all(data)
            .map_err(|e| RemoteSerialError::port_write(e.to_string()))?;
        port.flush()
            .map_err(|e| RemoteSerialError::port_write(e.to_string()))?;
        Ok(data.len())
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        let port = self
            .port
            .as_mut()
            .ok_or_else(|| RemoteSerialError::port_read("port is not open"))?;
        let read = port
            .read(buf)
            .map_err(|e| RemoteSerialError::port_read(e.to_string()))?;
        debug!("rx {}", hex::encode(&buf[..read]));
        Ok(read)
    }
}

/// List the names of the serial ports currently available on the system.
pub fn list_port_names() -> Vec<String> {
    match available_ports() {
        Ok(ports) => ports.into_iter().map(|p| p.port_name).collect(),
        Err(e) => {
            info!("Error listing ports: {e}");
            Vec::new()
        }
    }
}
