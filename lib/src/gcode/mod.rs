//! G-code generation module.
//!
//! This module turns sliced layers into machine instructions:
//! - [`LayerPaths`] / [`ExtrusionPath`] - the per-layer traversal order
//! - [`ExtrusionAccountant`] - the running filament total along that order
//! - [`GCodeWriter`] - text emission with cumulative `E` values

mod accountant;
mod generator;
mod path;
mod writer;

pub use accountant::{accumulate, extrusion_multiplier, ExtrusionAccountant, FilamentStats};
pub use generator::{GCode, GCodeStats};
pub use path::{cross_section_area, ExtrusionPath, ExtrusionRole, LayerPaths};
pub use writer::GCodeWriter;

/// G-code command types.
#[derive(Clone, Debug, PartialEq)]
pub enum GCodeCommand {
    /// G0 - Rapid move (travel)
    RapidMove {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
        f: Option<f64>,
    },
    /// G1 - Linear move (extrusion)
    LinearMove {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
        e: Option<f64>,
        f: Option<f64>,
    },
    /// G28 - Home
    Home { x: bool, y: bool, z: bool },
    /// G90 - Absolute positioning
    AbsolutePositioning,
    /// G92 - Set position
    SetPosition {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
        e: Option<f64>,
    },
    /// M82 - Absolute extrusion
    AbsoluteExtrusion,
    /// M84 - Disable steppers
    DisableMotors,
    /// M104 - Set extruder temperature (no wait)
    SetExtruderTemp { s: u32 },
    /// M109 - Set extruder temperature and wait
    SetExtruderTempWait { s: u32 },
    /// M140 - Set bed temperature (no wait)
    SetBedTemp { s: u32 },
    /// M190 - Set bed temperature and wait
    SetBedTempWait { s: u32 },
    /// T - Select tool
    SelectTool { t: u32 },
    /// Comment
    Comment(String),
    /// Raw G-code line
    Raw(String),
}

fn push_axis(cmd: &mut String, axis: char, value: Option<f64>, precision: usize) {
    if let Some(v) = value {
        cmd.push_str(&format!(" {}{:.*}", axis, precision, v));
    }
}

impl GCodeCommand {
    /// Convert the command to a G-code string.
    pub fn to_gcode(&self) -> String {
        match self {
            GCodeCommand::RapidMove { x, y, z, f } => {
                let mut cmd = String::from("G0");
                push_axis(&mut cmd, 'X', *x, 3);
                push_axis(&mut cmd, 'Y', *y, 3);
                push_axis(&mut cmd, 'Z', *z, 3);
                push_axis(&mut cmd, 'F', *f, 0);
                cmd
            }
            GCodeCommand::LinearMove { x, y, z, e, f } => {
                let mut cmd = String::from("G1");
                push_axis(&mut cmd, 'X', *x, 3);
                push_axis(&mut cmd, 'Y', *y, 3);
                push_axis(&mut cmd, 'Z', *z, 3);
                push_axis(&mut cmd, 'E', *e, 5);
                push_axis(&mut cmd, 'F', *f, 0);
                cmd
            }
            GCodeCommand::Home { x, y, z } => {
                let mut cmd = String::from("G28");
                if *x {
                    cmd.push_str(" X");
                }
                if *y {
                    cmd.push_str(" Y");
                }
                if *z {
                    cmd.push_str(" Z");
                }
                cmd
            }
            GCodeCommand::AbsolutePositioning => "G90".to_string(),
            GCodeCommand::SetPosition { x, y, z, e } => {
                let mut cmd = String::from("G92");
                push_axis(&mut cmd, 'X', *x, 3);
                push_axis(&mut cmd, 'Y', *y, 3);
                push_axis(&mut cmd, 'Z', *z, 3);
                push_axis(&mut cmd, 'E', *e, 5);
                cmd
            }
            GCodeCommand::AbsoluteExtrusion => "M82".to_string(),
            GCodeCommand::DisableMotors => "M84".to_string(),
            GCodeCommand::SetExtruderTemp { s } => format!("M104 S{}", s),
            GCodeCommand::SetExtruderTempWait { s } => format!("M109 S{}", s),
            GCodeCommand::SetBedTemp { s } => format!("M140 S{}", s),
            GCodeCommand::SetBedTempWait { s } => format!("M190 S{}", s),
            GCodeCommand::SelectTool { t } => format!("T{}", t),
            GCodeCommand::Comment(text) if text.is_empty() => ";".to_string(),
            GCodeCommand::Comment(text) => format!("; {}", text),
            GCodeCommand::Raw(line) => line.clone(),
        }
    }
}
