// Latest-known sensor snapshot, one channel per telemetry source
//
// Channels start zeroed with stamp 0 and are published as such until the
// first telemetry arrives, matching the microcontroller's own power-on state.

use super::protocol::{ImuSample, Reading};

/// Gripper joint channel: roll angle in radians
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointChannel {
    pub roll: f64,
    pub stamp: f64,
}

/// IMU channel
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImuChannel {
    pub sample: ImuSample,
    pub stamp: f64,
}

/// Odometry channel. Position accumulates decoded deltas; yaw and twist
/// are replaced on every update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OdomChannel {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
    pub vx: f64,
    pub vy: f64,
    pub wz: f64,
    pub stamp: f64,
}

/// Ultrasonic range channel, meters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RangeChannel {
    pub range: f64,
    pub stamp: f64,
}

/// Aggregate of the latest complete reading per channel. A decode only
/// touches its own channel, so a garbled sentence on one sensor never
/// disturbs another.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorState {
    pub finger: JointChannel,
    pub wrist: JointChannel,
    pub imu: ImuChannel,
    pub odom: OdomChannel,
    pub sonar_left: RangeChannel,
    pub sonar_center: RangeChannel,
    pub sonar_right: RangeChannel,
}

impl SensorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one decoded reading, stamping the touched channel.
    pub fn apply(&mut self, reading: Reading, stamp: f64) {
        match reading {
            Reading::FingerAngle(roll) => self.finger = JointChannel { roll, stamp },
            Reading::WristAngle(roll) => self.wrist = JointChannel { roll, stamp },
            Reading::Imu(sample) => self.imu = ImuChannel { sample, stamp },
            Reading::Odometry(sample) => {
                self.odom.x += sample.delta_x;
                self.odom.y += sample.delta_y;
                self.odom.yaw = sample.yaw;
                self.odom.vx = sample.vx;
                self.odom.vy = sample.vy;
                self.odom.wz = sample.wz;
                self.odom.stamp = stamp;
            }
            Reading::SonarLeft(range) => self.sonar_left = RangeChannel { range, stamp },
            Reading::SonarCenter(range) => self.sonar_center = RangeChannel { range, stamp },
            Reading::SonarRight(range) => self.sonar_right = RangeChannel { range, stamp },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::protocol::OdometrySample;

    #[test]
    fn odometry_position_accumulates() {
        let mut state = SensorState::new();
        let sample = OdometrySample {
            delta_x: 0.1,
            vx: 0.05,
            ..Default::default()
        };

        state.apply(Reading::Odometry(sample), 1.0);
        state.apply(Reading::Odometry(sample), 2.0);

        assert!((state.odom.x - 0.2).abs() < 1e-9);
        assert_eq!(state.odom.vx, 0.05);
        assert_eq!(state.odom.stamp, 2.0);
    }

    #[test]
    fn odometry_twist_and_yaw_are_replaced() {
        let mut state = SensorState::new();
        state.apply(
            Reading::Odometry(OdometrySample {
                yaw: 1.0,
                vx: 0.2,
                wz: 0.3,
                ..Default::default()
            }),
            1.0,
        );
        state.apply(
            Reading::Odometry(OdometrySample {
                yaw: -1.0,
                vx: 0.1,
                wz: 0.0,
                ..Default::default()
            }),
            2.0,
        );

        assert_eq!(state.odom.yaw, -1.0);
        assert_eq!(state.odom.vx, 0.1);
        assert_eq!(state.odom.wz, 0.0);
    }

    #[test]
    fn channels_update_independently() {
        let mut state = SensorState::new();
        state.apply(Reading::SonarLeft(2.5), 1.0);
        state.apply(Reading::FingerAngle(0.7), 2.0);

        assert_eq!(state.sonar_left.range, 2.5);
        assert_eq!(state.finger.roll, 0.7);
        assert_eq!(state.sonar_center, RangeChannel::default());
        assert_eq!(state.wrist, JointChannel::default());
    }

    #[test]
    fn stamps_advance_per_channel() {
        let mut state = SensorState::new();
        state.apply(Reading::WristAngle(0.1), 5.0);
        assert_eq!(state.wrist.stamp, 5.0);
        assert_eq!(state.finger.stamp, 0.0);
    }
}
