// Keyboard teleop: W/S drive, A/D turn, O/P finger, K/L wrist, R/F speed, Q quit
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::info;

const SPEEDS: [f64; 3] = [0.1, 0.2, 0.3]; // m/s
const TURN_SPEEDS: [f64; 3] = [0.2, 0.35, 0.5]; // rad/s
const FINGER_STEP: f64 = 0.25; // radians per press
const WRIST_STEP: f64 = 0.25; // radians per press
const INPUT_TIMEOUT_MS: u64 = 100; // Reset velocities after this much time with no input

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let pub_vel = session.declare_publisher("rover/cmd/vel").await?;
    let pub_finger = session.declare_publisher("rover/cmd/finger").await?;
    let pub_wrist = session.declare_publisher("rover/cmd/wrist").await?;

    info!("Controls: W/S=drive, A/D=turn, O/P=finger, K/L=wrist, R/F=speed, Q=quit");
    info!("Speed: LOW");

    enable_raw_mode()?;
    let result = run_teleop(&pub_vel, &pub_finger, &pub_wrist).await;
    disable_raw_mode()?;

    result
}

async fn run_teleop(
    pub_vel: &zenoh::pubsub::Publisher<'_>,
    pub_finger: &zenoh::pubsub::Publisher<'_>,
    pub_wrist: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut speed_idx: usize = 0;

    // Persistent command state
    let mut linear_x = 0.0;
    let mut angular_z = 0.0;
    let mut finger = 0.0f64;
    let mut wrist = 0.0f64;
    let mut last_movement_input = Instant::now();

    loop {
        // Poll for key with 20ms timeout (50Hz effective rate)
        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;

                match code {
                    // Drive - update velocity and refresh timestamp
                    KeyCode::Char('w') if pressed => {
                        linear_x = SPEEDS[speed_idx];
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('s') if pressed => {
                        linear_x = -SPEEDS[speed_idx];
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('a') if pressed => {
                        angular_z = TURN_SPEEDS[speed_idx];
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('d') if pressed => {
                        angular_z = -TURN_SPEEDS[speed_idx];
                        last_movement_input = Instant::now();
                    }

                    // Gripper - each press sends one angle command
                    KeyCode::Char('o') if pressed => {
                        finger = (finger + FINGER_STEP).min(2.0);
                        pub_finger.put(json!({ "angle": finger }).to_string()).await?;
                        info!("Finger: {:.2} rad", finger);
                    }
                    KeyCode::Char('p') if pressed => {
                        finger = (finger - FINGER_STEP).max(0.0);
                        pub_finger.put(json!({ "angle": finger }).to_string()).await?;
                        info!("Finger: {:.2} rad", finger);
                    }
                    KeyCode::Char('k') if pressed => {
                        wrist = (wrist + WRIST_STEP).min(1.5);
                        pub_wrist.put(json!({ "angle": wrist }).to_string()).await?;
                        info!("Wrist: {:.2} rad", wrist);
                    }
                    KeyCode::Char('l') if pressed => {
                        wrist = (wrist - WRIST_STEP).max(-1.5);
                        pub_wrist.put(json!({ "angle": wrist }).to_string()).await?;
                        info!("Wrist: {:.2} rad", wrist);
                    }

                    // Speed control
                    KeyCode::Char('r') if pressed => {
                        speed_idx = (speed_idx + 1).min(2);
                        print_speed(speed_idx);
                    }
                    KeyCode::Char('f') if pressed => {
                        speed_idx = speed_idx.saturating_sub(1);
                        print_speed(speed_idx);
                    }

                    // Quit
                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => {}
                }
            }
        }

        // Reset velocities if no movement input for INPUT_TIMEOUT_MS
        if last_movement_input.elapsed() > Duration::from_millis(INPUT_TIMEOUT_MS) {
            linear_x = 0.0;
            angular_z = 0.0;
        }

        // Always publish the drive setpoint at ~50Hz
        let cmd = json!({
            "linear_x": linear_x,
            "angular_z": angular_z
        });
        pub_vel.put(cmd.to_string()).await?;
    }

    Ok(())
}

fn print_speed(idx: usize) {
    let label = ["LOW", "MED", "HIGH"][idx];
    info!("Speed: {}", label);
}
