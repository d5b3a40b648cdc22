pub mod camera;
pub mod color;
pub mod config;
pub mod events;
pub mod grid;
pub mod io;
pub mod pattern;
pub mod rule_set;
pub mod simulation;
pub mod world;

mod parse_util;

pub type ScreenSize = u16;
pub type WorldOffset = i64;
