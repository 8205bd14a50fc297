//! Machine configuration to port set

mod port;
mod registry;

pub use port::{Calibration, Port, PortId, PortKey};
pub use registry::{Machine, PortRegistry, input_ports_of, ports_of};
