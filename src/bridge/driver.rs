// Bridge state and the fixed-cadence control cycle
//
// Owns every piece of mutable state. The runtime serializes all handler and
// tick invocations onto one task, so nothing here needs a lock. One tick is
// poll_telemetry, publication of the returned snapshot, send_drive_command.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use super::control::{Limits, MotorCommand, VelocitySetpoint};
use super::protocol::{self, LineAssembler, Parsed};
use super::serial::Transport;
use super::state::SensorState;

pub struct Bridge {
    limits: Limits,
    setpoint: VelocitySetpoint,
    state: SensorState,
    assembler: LineAssembler,
    mode: u8,
}

impl Bridge {
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            setpoint: VelocitySetpoint::default(),
            state: SensorState::new(),
            assembler: LineAssembler::new(),
            mode: 0,
        }
    }

    /// Latest decoded sensor snapshot.
    pub fn state(&self) -> &SensorState {
        &self.state
    }

    /// Stored drive setpoint, already clamped.
    pub fn setpoint(&self) -> &VelocitySetpoint {
        &self.setpoint
    }

    /// Currently selected operating mode. Stored for mode-dependent control
    /// logic; nothing in the cycle consumes it yet.
    pub fn mode(&self) -> u8 {
        self.mode
    }

    /// Replace the drive setpoint, clamping each axis to its limit. The
    /// sender is not told whether clamping occurred.
    pub fn on_drive_command(&mut self, linear_x: f64, angular_z: f64) {
        self.setpoint = VelocitySetpoint::clamped(linear_x, angular_z, &self.limits);
        debug!(
            "drive setpoint: linear_x={:.3} angular_z={:.3}",
            self.setpoint.linear_x, self.setpoint.angular_z
        );
    }

    /// Encode and send a finger angle command immediately, off-cycle.
    pub fn on_finger_angle<T: Transport>(&mut self, transport: &mut T, angle: f64) {
        self.send(transport, &protocol::encode_finger(angle));
    }

    /// Encode and send a wrist angle command immediately, off-cycle.
    pub fn on_wrist_angle<T: Transport>(&mut self, transport: &mut T, angle: f64) {
        self.send(transport, &protocol::encode_wrist(angle));
    }

    pub fn on_mode(&mut self, mode: u8) {
        self.mode = mode;
        debug!("mode selected: {}", mode);
    }

    /// Poll the microcontroller, drain whatever bytes are buffered, and
    /// decode them into the snapshot. A tick that decodes nothing is a
    /// valid outcome and leaves the snapshot untouched.
    pub fn poll_telemetry<T: Transport>(&mut self, transport: &mut T) -> &SensorState {
        self.send(transport, protocol::POLL_LINE);

        let chunk = match transport.read_available() {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!("telemetry read failed, keeping stale state: {}", e);
                String::new()
            }
        };

        let stamp = now_unix();
        for sentence in self.assembler.push(&chunk) {
            if let Parsed::Decoded(reading) = protocol::parse_sentence(&sentence) {
                self.state.apply(reading, stamp);
            }
        }

        &self.state
    }

    /// Derive the drive command from current odometry feedback and the
    /// stored setpoint, then send it. Runs every tick whether or not the
    /// command changed.
    pub fn send_drive_command<T: Transport>(&mut self, transport: &mut T) -> MotorCommand {
        let command = MotorCommand::derive(&self.state.odom, &self.setpoint);
        if command.magnitude() > self.limits.max_motor_cmd {
            warn!(
                "motor command {}/{} exceeds ceiling {}",
                command.left, command.right, self.limits.max_motor_cmd
            );
        }
        self.send(transport, &protocol::encode_drive(command.left, command.right));
        command
    }

    // A failed write costs one command; the next cycle sends a fresh one.
    fn send<T: Transport>(&self, transport: &mut T, line: &str) {
        if let Err(e) = transport.send_line(line) {
            warn!("serial write failed: {}", e);
        }
    }
}

/// Wall-clock stamp in unix seconds.
fn now_unix() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
