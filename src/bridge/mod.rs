// Serial bridge core
//
// Provides:
// - ASCII line protocol codec (telemetry decode, command encode)
// - latest-known sensor snapshot with cumulative odometry
// - setpoint clamping and proportional drive-command derivation
// - the Bridge driver tying them to a serial transport

pub mod control;
mod driver;
pub mod protocol;
pub mod serial;
pub mod state;

pub use control::{clamp, Limits, MotorCommand, VelocitySetpoint};
pub use driver::Bridge;
pub use serial::{BridgeError, SerialTransport, Transport};
pub use state::SensorState;
