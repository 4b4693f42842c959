// Message types carried over zenoh (JSON payloads)

use serde::{Deserialize, Serialize};

use crate::bridge::state::{ImuChannel, JointChannel, OdomChannel, RangeChannel};

// Drive setpoint from teleop/autonomy -> bridge
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TwistCommand {
    pub linear_x: f64,
    pub angular_z: f64,
}

// Gripper joint setpoint, radians. Fire-and-forget: encoded and sent to the
// microcontroller the moment it arrives.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AngleCommand {
    pub angle: f64,
}

/// Operating mode selector
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModeCommand {
    pub mode: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

impl Quaternion {
    /// Quaternion from intrinsic ZYX (yaw-pitch-roll) Euler angles, radians.
    pub fn from_rpy(roll: f64, pitch: f64, yaw: f64) -> Self {
        let (sr, cr) = (roll * 0.5).sin_cos();
        let (sp, cp) = (pitch * 0.5).sin_cos();
        let (sy, cy) = (yaw * 0.5).sin_cos();
        Self {
            x: sr * cp * cy - cr * sp * sy,
            y: cr * sp * cy + sr * cp * sy,
            z: cr * cp * sy - sr * sp * cy,
            w: cr * cp * cy + sr * sp * sy,
        }
    }

    pub fn from_yaw(yaw: f64) -> Self {
        Self::from_rpy(0.0, 0.0, yaw)
    }
}

// Telemetry from bridge -> consumers. Stamps are unix seconds of the decode
// that produced the value; 0 until the first telemetry arrives.

/// Gripper joint angle republished as an orientation about the roll axis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct JointAngleMessage {
    pub stamp: f64,
    pub quaternion: Quaternion,
}

impl From<&JointChannel> for JointAngleMessage {
    fn from(channel: &JointChannel) -> Self {
        Self {
            stamp: channel.stamp,
            quaternion: Quaternion::from_rpy(channel.roll, 0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ImuMessage {
    pub stamp: f64,
    pub linear_acceleration: Vector3,
    pub angular_velocity: Vector3,
    pub orientation: Quaternion,
}

impl From<&ImuChannel> for ImuMessage {
    fn from(channel: &ImuChannel) -> Self {
        let s = &channel.sample;
        Self {
            stamp: channel.stamp,
            linear_acceleration: Vector3::new(s.accel[0], s.accel[1], s.accel[2]),
            angular_velocity: Vector3::new(s.gyro[0], s.gyro[1], s.gyro[2]),
            orientation: Quaternion::from_rpy(s.rpy[0], s.rpy[1], s.rpy[2]),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct OdometryMessage {
    pub stamp: f64,
    pub position: Vector3,
    pub orientation: Quaternion,
    pub twist_linear: Vector3,
    pub twist_angular: Vector3,
}

impl From<&OdomChannel> for OdometryMessage {
    fn from(channel: &OdomChannel) -> Self {
        Self {
            stamp: channel.stamp,
            position: Vector3::new(channel.x, channel.y, 0.0),
            orientation: Quaternion::from_yaw(channel.yaw),
            twist_linear: Vector3::new(channel.vx, channel.vy, 0.0),
            twist_angular: Vector3::new(0.0, 0.0, channel.wz),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct RangeMessage {
    pub stamp: f64,
    pub range: f64,
}

impl From<&RangeChannel> for RangeMessage {
    fn from(channel: &RangeChannel) -> Self {
        Self {
            stamp: channel.stamp,
            range: channel.range,
        }
    }
}
