// ASCII line protocol spoken by the rover microcontroller
//
// Telemetry sentences: <TAG>,<0|1>,<payload...>\n
// Commands: d (poll), v,<left>,<right> (drive), f,<num> / w,<num> (gripper)

/// Poll request line; the microcontroller answers with buffered telemetry.
pub const POLL_LINE: &str = "d\n";

/// Validity flag a sentence must carry to be honored
const VALID_FLAG: &str = "1";

/// Angle magnitudes below this encode as a literal `0`; the firmware parser
/// cannot handle exponent notation.
const ANGLE_EPSILON: f64 = 0.01;

/// Significant digits in encoded angle commands
const ANGLE_DIGITS: i32 = 4;

/// One decoded telemetry reading. Ranges and positions arrive in
/// centimeters on the wire and are converted to meters here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    FingerAngle(f64),
    WristAngle(f64),
    Imu(ImuSample),
    Odometry(OdometrySample),
    SonarLeft(f64),
    SonarCenter(f64),
    SonarRight(f64),
}

/// IMU sample: accelerometer, gyro (rad/s), orientation as roll/pitch/yaw.
/// The accelerometer y axis is not reported by the firmware and reads 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImuSample {
    pub accel: [f64; 3],
    pub gyro: [f64; 3],
    pub rpy: [f64; 3],
}

/// Odometry sample: position delta in meters, absolute yaw in radians,
/// body twist in m/s and rad/s.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OdometrySample {
    pub delta_x: f64,
    pub delta_y: f64,
    pub yaw: f64,
    pub vx: f64,
    pub vy: f64,
    pub wz: f64,
}

/// Outcome of parsing one sentence. `Ignored` is not a failure: garbled
/// lines are expected on a byte-oriented channel and carry no signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parsed {
    Decoded(Reading),
    Ignored,
}

/// Splits a byte stream into complete newline-terminated sentences. A
/// trailing fragment is held back and prepended to the next chunk.
#[derive(Debug, Default)]
pub struct LineAssembler {
    pending: String,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, returning the complete sentences it closes off.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.pending.push_str(chunk);
        let mut sentences = Vec::new();
        while let Some(pos) = self.pending.find('\n') {
            let rest = self.pending.split_off(pos + 1);
            let mut sentence = std::mem::replace(&mut self.pending, rest);
            sentence.pop();
            sentences.push(sentence);
        }
        sentences
    }
}

/// Parse one comma-separated sentence. Short lines, a validity flag other
/// than `1`, unknown tags, and tags with too few fields are all ignored.
pub fn parse_sentence(sentence: &str) -> Parsed {
    let fields: Vec<&str> = sentence.trim_end_matches('\r').split(',').collect();
    if fields.len() < 3 || fields[1] != VALID_FLAG {
        return Parsed::Ignored;
    }

    match fields[0] {
        "GRF" => Parsed::Decoded(Reading::FingerAngle(num(&fields, 2))),
        "GRW" => Parsed::Decoded(Reading::WristAngle(num(&fields, 2))),
        "IMU" if fields.len() >= 11 => Parsed::Decoded(Reading::Imu(ImuSample {
            accel: [num(&fields, 2), 0.0, num(&fields, 4)],
            gyro: [num(&fields, 5), num(&fields, 6), num(&fields, 7)],
            rpy: [num(&fields, 8), num(&fields, 9), num(&fields, 10)],
        })),
        "ODOM" if fields.len() >= 8 => Parsed::Decoded(Reading::Odometry(OdometrySample {
            delta_x: num(&fields, 2) / 100.0,
            delta_y: num(&fields, 3) / 100.0,
            yaw: num(&fields, 4),
            vx: num(&fields, 5) / 100.0,
            vy: num(&fields, 6) / 100.0,
            wz: num(&fields, 7),
        })),
        "USL" => Parsed::Decoded(Reading::SonarLeft(num(&fields, 2) / 100.0)),
        "USC" => Parsed::Decoded(Reading::SonarCenter(num(&fields, 2) / 100.0)),
        "USR" => Parsed::Decoded(Reading::SonarRight(num(&fields, 2) / 100.0)),
        _ => Parsed::Ignored,
    }
}

/// Best-effort field parse: unparseable numbers read as zero.
fn num(fields: &[&str], index: usize) -> f64 {
    fields
        .get(index)
        .and_then(|f| f.trim().parse().ok())
        .unwrap_or(0.0)
}

/// Drive command line with signed integer wheel efforts.
pub fn encode_drive(left: i32, right: i32) -> String {
    format!("v,{},{}\n", left, right)
}

/// Finger angle command, radians.
pub fn encode_finger(angle: f64) -> String {
    format!("f,{}\n", format_angle(angle))
}

/// Wrist angle command, radians.
pub fn encode_wrist(angle: f64) -> String {
    format!("w,{}\n", format_angle(angle))
}

/// Format an angle with four significant digits, trailing zeros trimmed.
fn format_angle(angle: f64) -> String {
    if angle.abs() < ANGLE_EPSILON {
        return "0".to_string();
    }
    let magnitude = angle.abs().log10().floor() as i32;
    let decimals = (ANGLE_DIGITS - 1 - magnitude).max(0) as usize;
    let formatted = format!("{:.*}", decimals, angle);
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finger_sentence_decodes_roll() {
        let parsed = parse_sentence("GRF,1,0.52");
        assert_eq!(parsed, Parsed::Decoded(Reading::FingerAngle(0.52)));
    }

    #[test]
    fn invalid_flag_is_ignored() {
        assert_eq!(parse_sentence("USL,0,250"), Parsed::Ignored);
    }

    #[test]
    fn short_sentence_is_ignored() {
        assert_eq!(parse_sentence("GRW,1"), Parsed::Ignored);
        assert_eq!(parse_sentence(""), Parsed::Ignored);
    }

    #[test]
    fn unknown_tag_is_ignored() {
        assert_eq!(parse_sentence("XYZ,1,42"), Parsed::Ignored);
    }

    #[test]
    fn imu_needs_all_eleven_fields() {
        assert_eq!(parse_sentence("IMU,1,0.1,0,9.8"), Parsed::Ignored);

        let parsed = parse_sentence("IMU,1,0.1,0.7,9.8,0.01,0.02,0.03,0.1,0.2,0.3");
        match parsed {
            Parsed::Decoded(Reading::Imu(sample)) => {
                assert_eq!(sample.accel, [0.1, 0.0, 9.8]);
                assert_eq!(sample.gyro, [0.01, 0.02, 0.03]);
                assert_eq!(sample.rpy, [0.1, 0.2, 0.3]);
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn odometry_converts_centimeters() {
        let parsed = parse_sentence("ODOM,1,10,0,0,5,0,0");
        match parsed {
            Parsed::Decoded(Reading::Odometry(sample)) => {
                assert_eq!(sample.delta_x, 0.1);
                assert_eq!(sample.delta_y, 0.0);
                assert_eq!(sample.vx, 0.05);
                assert_eq!(sample.wz, 0.0);
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn sonar_converts_centimeters() {
        assert_eq!(
            parse_sentence("USC,1,250"),
            Parsed::Decoded(Reading::SonarCenter(2.5))
        );
    }

    #[test]
    fn unparseable_field_reads_zero() {
        assert_eq!(
            parse_sentence("USR,1,garbage"),
            Parsed::Decoded(Reading::SonarRight(0.0))
        );
    }

    #[test]
    fn assembler_carries_partial_sentence() {
        let mut assembler = LineAssembler::new();
        assert_eq!(assembler.push("USL,1,10\nUSC,1"), vec!["USL,1,10"]);
        assert_eq!(assembler.push(",20\n"), vec!["USC,1,20"]);
        assert!(assembler.push("").is_empty());
    }

    #[test]
    fn assembler_splits_multiple_sentences() {
        let mut assembler = LineAssembler::new();
        let sentences = assembler.push("GRF,1,0.1\nGRW,1,0.2\n");
        assert_eq!(sentences, vec!["GRF,1,0.1", "GRW,1,0.2"]);
    }

    #[test]
    fn drive_encoding() {
        assert_eq!(encode_drive(-3, 7), "v,-3,7\n");
        assert_eq!(encode_drive(0, 0), "v,0,0\n");
    }

    #[test]
    fn small_angles_encode_as_zero() {
        assert_eq!(encode_finger(0.004), "f,0\n");
        assert_eq!(encode_wrist(-0.004), "w,0\n");
        assert_eq!(encode_finger(0.0), "f,0\n");
    }

    #[test]
    fn angles_encode_with_four_significant_digits() {
        assert_eq!(encode_finger(1.2345), "f,1.234\n");
        assert_eq!(encode_wrist(0.5), "w,0.5\n");
        assert_eq!(encode_finger(0.01234), "f,0.01234\n");
        assert_eq!(encode_wrist(-1.5), "w,-1.5\n");
    }
}
