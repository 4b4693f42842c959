// Single-task bridge runtime: zenoh on one side, the serial link on the other
//
// The select loop serializes the periodic cycle and every subscriber arm
// onto one task; no handler and no tick ever overlap, so the bridge state
// needs no locks. Gripper angle commands are written to the serial link from
// their arms directly, bypassing the tick.

use tokio::time::interval;
use tracing::{info, warn};

use crate::bridge::{Bridge, SerialTransport};
use crate::config::{self, BridgeConfig};
use crate::messages::{
    AngleCommand, ImuMessage, JointAngleMessage, ModeCommand, OdometryMessage, RangeMessage,
    TwistCommand,
};

pub async fn run(config: BridgeConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut transport = SerialTransport::open(&config.device, config.baud)?;

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers and subscribers...");
    let sub_vel = session
        .declare_subscriber(config.topic(config::TOPIC_CMD_VEL))
        .await?;
    let sub_finger = session
        .declare_subscriber(config.topic(config::TOPIC_CMD_FINGER))
        .await?;
    let sub_wrist = session
        .declare_subscriber(config.topic(config::TOPIC_CMD_WRIST))
        .await?;
    let sub_mode = session
        .declare_subscriber(config.topic(config::TOPIC_CMD_MODE))
        .await?;

    let pub_finger = session
        .declare_publisher(config.topic(config::TOPIC_TELEM_FINGER))
        .await?;
    let pub_wrist = session
        .declare_publisher(config.topic(config::TOPIC_TELEM_WRIST))
        .await?;
    let pub_imu = session
        .declare_publisher(config.topic(config::TOPIC_TELEM_IMU))
        .await?;
    let pub_odom = session
        .declare_publisher(config.topic(config::TOPIC_TELEM_ODOM))
        .await?;
    let pub_sonar_left = session
        .declare_publisher(config.topic(config::TOPIC_TELEM_SONAR_LEFT))
        .await?;
    let pub_sonar_center = session
        .declare_publisher(config.topic(config::TOPIC_TELEM_SONAR_CENTER))
        .await?;
    let pub_sonar_right = session
        .declare_publisher(config.topic(config::TOPIC_TELEM_SONAR_RIGHT))
        .await?;
    let pub_heartbeat = session
        .declare_publisher(config.topic(config::TOPIC_HEARTBEAT))
        .await?;

    let mut bridge = Bridge::new(config.limits());
    let mut tick = interval(config.cycle_period());
    let mut heartbeat = interval(config::HEARTBEAT_PERIOD);

    info!(
        "Bridge started: {}ms cycle, clamp {:.2} m/s / {:.2} rad/s, ceiling {}",
        config.cycle_ms, config.max_linear_vel, config.max_angular_vel, config.max_motor_cmd
    );
    info!("Subscribed to: {}/cmd/*", config.name);
    info!("Publishing to: {}/telemetry/*", config.name);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                let state = *bridge.poll_telemetry(&mut transport);

                pub_finger
                    .put(serde_json::to_string(&JointAngleMessage::from(&state.finger))?)
                    .await?;
                pub_wrist
                    .put(serde_json::to_string(&JointAngleMessage::from(&state.wrist))?)
                    .await?;
                pub_imu
                    .put(serde_json::to_string(&ImuMessage::from(&state.imu))?)
                    .await?;
                pub_odom
                    .put(serde_json::to_string(&OdometryMessage::from(&state.odom))?)
                    .await?;
                pub_sonar_left
                    .put(serde_json::to_string(&RangeMessage::from(&state.sonar_left))?)
                    .await?;
                pub_sonar_center
                    .put(serde_json::to_string(&RangeMessage::from(&state.sonar_center))?)
                    .await?;
                pub_sonar_right
                    .put(serde_json::to_string(&RangeMessage::from(&state.sonar_right))?)
                    .await?;

                bridge.send_drive_command(&mut transport);
            }
            sample = sub_vel.recv_async() => {
                if let Ok(sample) = sample {
                    let payload = sample.payload().to_bytes();
                    match serde_json::from_slice::<TwistCommand>(&payload) {
                        Ok(cmd) => bridge.on_drive_command(cmd.linear_x, cmd.angular_z),
                        Err(e) => warn!("Failed to parse drive command: {}", e),
                    }
                }
            }
            sample = sub_finger.recv_async() => {
                if let Ok(sample) = sample {
                    let payload = sample.payload().to_bytes();
                    match serde_json::from_slice::<AngleCommand>(&payload) {
                        Ok(cmd) => bridge.on_finger_angle(&mut transport, cmd.angle),
                        Err(e) => warn!("Failed to parse finger command: {}", e),
                    }
                }
            }
            sample = sub_wrist.recv_async() => {
                if let Ok(sample) = sample {
                    let payload = sample.payload().to_bytes();
                    match serde_json::from_slice::<AngleCommand>(&payload) {
                        Ok(cmd) => bridge.on_wrist_angle(&mut transport, cmd.angle),
                        Err(e) => warn!("Failed to parse wrist command: {}", e),
                    }
                }
            }
            sample = sub_mode.recv_async() => {
                if let Ok(sample) = sample {
                    let payload = sample.payload().to_bytes();
                    match serde_json::from_slice::<ModeCommand>(&payload) {
                        Ok(cmd) => bridge.on_mode(cmd.mode),
                        Err(e) => warn!("Failed to parse mode command: {}", e),
                    }
                }
            }
            _ = heartbeat.tick() => {
                pub_heartbeat.put("").await?;
            }
        }
    }
}
