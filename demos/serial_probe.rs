// Serial probe: passive check of the microcontroller link
//
// Sends only poll requests and prints every telemetry sentence alongside its
// decoded form. Nothing that moves the rover is written.
//
// Usage: cargo run --example serial_probe -- [device]
// Example: cargo run --example serial_probe -- /dev/ttyUSB0

use std::thread::sleep;
use std::time::Duration;

use rover_zenoh_bridge::bridge::protocol::{self, LineAssembler, Parsed};
use rover_zenoh_bridge::bridge::{SerialTransport, Transport};

const BAUD: u32 = 115_200;
const POLL_PERIOD: Duration = Duration::from_millis(100);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("debug".parse().unwrap()),
        )
        .init();

    // Get device from args or use default
    let device = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyUSB0".to_string());

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║             Rover Serial Probe (POLL-ONLY)                   ║");
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║  This tool only polls telemetry - no drive, no gripper       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Serial device: {}", device);
    println!("Press Ctrl+C to stop.");
    println!();

    let mut transport = match SerialTransport::open(&device, BAUD) {
        Ok(transport) => {
            println!("  ✓ Serial device opened successfully");
            transport
        }
        Err(e) => {
            println!("  ✗ Failed to open serial device: {}", e);
            println!();
            println!("Troubleshooting:");
            println!("  - Check the device path is correct");
            println!("  - Verify the USB cable is connected");
            println!("  - Check you are in the dialout group (Linux)");
            return Err(e.into());
        }
    };
    println!();

    let mut assembler = LineAssembler::new();

    loop {
        transport.send_line(protocol::POLL_LINE)?;
        sleep(POLL_PERIOD);

        let chunk = transport.read_available()?;
        for sentence in assembler.push(&chunk) {
            match protocol::parse_sentence(&sentence) {
                Parsed::Decoded(reading) => println!("  {:24} -> {:?}", sentence, reading),
                Parsed::Ignored => println!("  {:24} -> (ignored)", sentence),
            }
        }
    }
}
