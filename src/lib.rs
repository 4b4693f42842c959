// Zenoh <-> serial bridge for the rover microcontroller
//
// Subscribes to drive and gripper setpoints, speaks the microcontroller's
// ASCII line protocol over serial, and republishes the decoded telemetry.

pub mod bridge;
pub mod config;
pub mod messages;
pub mod runtime;
