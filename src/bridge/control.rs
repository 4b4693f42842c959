// Setpoint clamping and proportional drive-command derivation

use super::state::OdomChannel;

/// Proportional gain on the velocity error
const KP: f64 = 10.0;

/// Symmetric saturation to [-limit, limit].
pub fn clamp(value: f64, limit: f64) -> f64 {
    if value > limit {
        limit
    } else if value < -limit {
        -limit
    } else {
        value
    }
}

/// Velocity clamp limits and the motor command ceiling, per configuration
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Maximum linear setpoint magnitude, m/s
    pub max_linear_vel: f64,
    /// Maximum angular setpoint magnitude, rad/s
    pub max_angular_vel: f64,
    /// Wheel effort magnitude above which the hardware is known to fail;
    /// commands are not altered, overruns are logged by the driver.
    pub max_motor_cmd: i32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_linear_vel: 0.3,
            max_angular_vel: 0.5,
            max_motor_cmd: 120,
        }
    }
}

/// Stored drive setpoint, always the most recent command, already clamped
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VelocitySetpoint {
    pub linear_x: f64,
    pub angular_z: f64,
}

impl VelocitySetpoint {
    /// Build a setpoint with each axis clamped to its own limit.
    pub fn clamped(linear_x: f64, angular_z: f64, limits: &Limits) -> Self {
        Self {
            linear_x: clamp(linear_x, limits.max_linear_vel),
            angular_z: clamp(angular_z, limits.max_angular_vel),
        }
    }
}

/// Per-wheel drive effort, recomputed every control cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorCommand {
    pub left: i32,
    pub right: i32,
}

impl MotorCommand {
    /// Proportional control on the error between measured twist and the
    /// setpoint. Error-times-gain truncates toward zero.
    pub fn derive(odom: &OdomChannel, setpoint: &VelocitySetpoint) -> Self {
        let err_linear = odom.vx - setpoint.linear_x;
        let err_angular = odom.wz - setpoint.angular_z;
        let vx = (err_linear * KP).trunc() as i32;
        let vz = (err_angular * KP).trunc() as i32;
        Self {
            left: vx - vz,
            right: vx + vz,
        }
    }

    /// Largest wheel effort magnitude, compared against the ceiling.
    pub fn magnitude(&self) -> i32 {
        self.left.abs().max(self.right.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_saturates_symmetrically() {
        assert_eq!(clamp(0.5, 0.3), 0.3);
        assert_eq!(clamp(-0.5, 0.3), -0.3);
        assert_eq!(clamp(0.2, 0.3), 0.2);
        assert_eq!(clamp(0.3, 0.3), 0.3);
    }

    #[test]
    fn clamp_is_idempotent() {
        for v in [-1.0, -0.3, 0.0, 0.25, 2.0] {
            let once = clamp(v, 0.3);
            assert_eq!(clamp(once, 0.3), once);
            assert!((-0.3..=0.3).contains(&once));
        }
    }

    #[test]
    fn setpoint_clamps_each_axis_with_its_own_limit() {
        let limits = Limits::default();
        let sp = VelocitySetpoint::clamped(0.5, 0.4, &limits);
        assert_eq!(sp.linear_x, 0.3);
        assert_eq!(sp.angular_z, 0.4);

        let sp = VelocitySetpoint::clamped(-1.0, -1.0, &limits);
        assert_eq!(sp.linear_x, -0.3);
        assert_eq!(sp.angular_z, -0.5);
    }

    #[test]
    fn derivation_sum_and_difference_properties() {
        // left + right == 2*vx and left - right == -2*vz for any input
        let cases = [
            (0.0, 0.0, 0.3, 0.0),
            (0.12, -0.4, -0.3, 0.5),
            (-0.05, 0.2, 0.1, -0.5),
            (1.0, 1.0, -1.0, -1.0),
        ];
        for (vx_meas, wz_meas, lin_sp, ang_sp) in cases {
            let odom = OdomChannel {
                vx: vx_meas,
                wz: wz_meas,
                ..Default::default()
            };
            let sp = VelocitySetpoint {
                linear_x: lin_sp,
                angular_z: ang_sp,
            };
            let cmd = MotorCommand::derive(&odom, &sp);
            let vx = ((vx_meas - lin_sp) * 10.0).trunc() as i32;
            let vz = ((wz_meas - ang_sp) * 10.0).trunc() as i32;
            assert_eq!(cmd.left + cmd.right, 2 * vx);
            assert_eq!(cmd.left - cmd.right, -2 * vz);
        }
    }

    #[test]
    fn error_truncates_toward_zero() {
        let odom = OdomChannel {
            vx: 0.0,
            ..Default::default()
        };
        // err = -0.19, * 10 = -1.9, truncates to -1 (not -2)
        let sp = VelocitySetpoint {
            linear_x: 0.19,
            angular_z: 0.0,
        };
        let cmd = MotorCommand::derive(&odom, &sp);
        assert_eq!(cmd.left, -1);
        assert_eq!(cmd.right, -1);
    }

    #[test]
    fn stationary_rover_tracking_setpoint() {
        // Clamped setpoint 0.3 m/s, zero measured twist: both wheels get
        // trunc(-0.3 * 10) = -3.
        let limits = Limits::default();
        let sp = VelocitySetpoint::clamped(0.5, 0.0, &limits);
        let cmd = MotorCommand::derive(&OdomChannel::default(), &sp);
        assert_eq!(cmd.left, -3);
        assert_eq!(cmd.right, -3);
    }

    #[test]
    fn magnitude_takes_larger_wheel() {
        let cmd = MotorCommand {
            left: -130,
            right: 20,
        };
        assert_eq!(cmd.magnitude(), 130);
    }
}
