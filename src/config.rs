// Serial link, control cadence, safety limits, and topic layout
use std::time::Duration;

use clap::Parser;

use crate::bridge::Limits;

/// Heartbeat publication interval
pub const HEARTBEAT_PERIOD: Duration = Duration::from_secs(2);

// Topic suffixes under the robot-name prefix
pub const TOPIC_CMD_VEL: &str = "cmd/vel";
pub const TOPIC_CMD_FINGER: &str = "cmd/finger";
pub const TOPIC_CMD_WRIST: &str = "cmd/wrist";
pub const TOPIC_CMD_MODE: &str = "cmd/mode";
pub const TOPIC_TELEM_FINGER: &str = "telemetry/finger";
pub const TOPIC_TELEM_WRIST: &str = "telemetry/wrist";
pub const TOPIC_TELEM_IMU: &str = "telemetry/imu";
pub const TOPIC_TELEM_ODOM: &str = "telemetry/odom";
pub const TOPIC_TELEM_SONAR_LEFT: &str = "telemetry/sonar/left";
pub const TOPIC_TELEM_SONAR_CENTER: &str = "telemetry/sonar/center";
pub const TOPIC_TELEM_SONAR_RIGHT: &str = "telemetry/sonar/right";
pub const TOPIC_HEARTBEAT: &str = "state/heartbeat";

#[derive(Debug, Clone, Parser)]
#[command(name = "rover-zenoh-bridge", about = "Zenoh <-> serial bridge for the rover microcontroller")]
pub struct BridgeConfig {
    /// Serial device the microcontroller is attached to
    #[arg(long, default_value = "/dev/ttyUSB0")]
    pub device: String,

    /// Serial baud rate
    #[arg(long, default_value_t = 115_200)]
    pub baud: u32,

    /// Control cycle period, milliseconds
    #[arg(long, default_value_t = 100)]
    pub cycle_ms: u64,

    /// Maximum linear velocity setpoint magnitude, m/s
    #[arg(long, default_value_t = 0.3)]
    pub max_linear_vel: f64,

    /// Maximum angular velocity setpoint magnitude, rad/s
    #[arg(long, default_value_t = 0.5)]
    pub max_angular_vel: f64,

    /// Motor effort magnitude above which overruns are logged
    #[arg(long, default_value_t = 120)]
    pub max_motor_cmd: i32,

    /// Robot name, used as the topic prefix
    #[arg(long, default_value = "rover")]
    pub name: String,
}

impl BridgeConfig {
    pub fn cycle_period(&self) -> Duration {
        Duration::from_millis(self.cycle_ms)
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_linear_vel: self.max_linear_vel,
            max_angular_vel: self.max_angular_vel,
            max_motor_cmd: self.max_motor_cmd,
        }
    }

    /// Full topic name under this robot's prefix.
    pub fn topic(&self, suffix: &str) -> String {
        format!("{}/{}", self.name, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let config = BridgeConfig::parse_from(["rover-zenoh-bridge"]);
        assert_eq!(config.device, "/dev/ttyUSB0");
        assert_eq!(config.baud, 115_200);
        assert_eq!(config.cycle_period(), Duration::from_millis(100));
        assert_eq!(config.limits().max_motor_cmd, 120);
        assert_eq!(config.topic(TOPIC_CMD_VEL), "rover/cmd/vel");
    }

    #[test]
    fn flags_override_defaults() {
        let config = BridgeConfig::parse_from([
            "rover-zenoh-bridge",
            "--device",
            "/dev/ttyACM1",
            "--cycle-ms",
            "50",
            "--name",
            "scout",
        ]);
        assert_eq!(config.device, "/dev/ttyACM1");
        assert_eq!(config.cycle_period(), Duration::from_millis(50));
        assert_eq!(config.topic(TOPIC_HEARTBEAT), "scout/state/heartbeat");
    }
}
