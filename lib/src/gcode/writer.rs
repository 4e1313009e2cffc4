//! G-code writer.
//!
//! Emits a Marlin-style program in absolute extrusion mode (`M82`): every
//! `G1` carries the cumulative filament total from an
//! [`ExtrusionAccountant`], so the last `E` value in the file equals the
//! filament length of the whole print.

use super::{
    extrusion_multiplier, ExtrusionAccountant, ExtrusionPath, GCode, GCodeCommand, GCodeStats,
    LayerPaths,
};
use crate::config::PrintConfig;
use crate::geometry::Point2;
use crate::CoordF;

/// Streaming G-code writer.
#[derive(Debug, Clone)]
pub struct GCodeWriter {
    config: PrintConfig,
    content: String,
    accountant: ExtrusionAccountant,
    position: Option<Point2>,
    z: CoordF,
    feedrate: Option<CoordF>,
    stats: GCodeStats,
}

impl Default for GCodeWriter {
    fn default() -> Self {
        Self::with_config(PrintConfig::default())
    }
}

impl GCodeWriter {
    /// Create a writer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer for the given print settings.
    pub fn with_config(config: PrintConfig) -> Self {
        let multiplier = extrusion_multiplier(
            config.effective_extrusion_width(),
            config.first_layer_height,
            config.filament_diameter,
            config.extrusion_multiplier,
        );
        Self {
            config,
            content: String::new(),
            accountant: ExtrusionAccountant::new(multiplier),
            position: None,
            z: 0.0,
            feedrate: None,
            stats: GCodeStats::default(),
        }
    }

    /// Current absolute E value (mm of filament).
    pub fn e(&self) -> CoordF {
        self.accountant.total()
    }

    /// Current nozzle Z.
    pub fn z(&self) -> CoordF {
        self.z
    }

    /// Current XY position, if any move has been written.
    pub fn position(&self) -> Option<Point2> {
        self.position
    }

    /// Write a command.
    pub fn write(&mut self, cmd: &GCodeCommand) {
        self.content.push_str(&cmd.to_gcode());
        self.content.push('\n');
    }

    /// Write a comment line.
    pub fn write_comment(&mut self, text: &str) {
        self.write(&GCodeCommand::Comment(text.to_string()));
    }

    /// Write a raw line.
    pub fn write_raw(&mut self, line: &str) {
        self.write(&GCodeCommand::Raw(line.to_string()));
    }

    /// Write the start sequence: header comments, tool, heat up, home, reset E.
    pub fn write_preamble(&mut self) {
        let config = self.config.clone();
        self.write_comment(&format!("Generated by slicer {}", crate::VERSION));
        self.write_comment(&format!(
            "Layer height: {:.2}mm, First layer: {:.2}mm",
            config.layer_height, config.first_layer_height
        ));
        self.write_comment(&format!(
            "Nozzle: {:.2}mm, Filament: {:.2}mm",
            config.nozzle_diameter, config.filament_diameter
        ));
        self.write_comment("");

        self.write(&GCodeCommand::AbsolutePositioning);
        self.write(&GCodeCommand::AbsoluteExtrusion);
        self.write(&GCodeCommand::SelectTool {
            t: config.extruder,
        });
        self.set_bed_temperature(config.first_layer_bed_temperature, false);
        self.set_extruder_temperature(config.first_layer_extruder_temperature, false);
        self.home(true, true, true);
        self.set_bed_temperature(config.first_layer_bed_temperature, true);
        self.set_extruder_temperature(config.first_layer_extruder_temperature, true);
        self.reset_e();
    }

    /// Set extruder temperature, optionally waiting for it.
    pub fn set_extruder_temperature(&mut self, temperature: u32, wait: bool) {
        if wait {
            self.write(&GCodeCommand::SetExtruderTempWait { s: temperature });
        } else {
            self.write(&GCodeCommand::SetExtruderTemp { s: temperature });
        }
    }

    /// Set bed temperature, optionally waiting for it.
    pub fn set_bed_temperature(&mut self, temperature: u32, wait: bool) {
        if wait {
            self.write(&GCodeCommand::SetBedTempWait { s: temperature });
        } else {
            self.write(&GCodeCommand::SetBedTemp { s: temperature });
        }
    }

    /// Home the given axes.
    pub fn home(&mut self, x: bool, y: bool, z: bool) {
        self.write(&GCodeCommand::Home { x, y, z });
        self.position = None;
    }

    /// Declare the current filament position as zero.
    ///
    /// Only valid before any extrusion: the accountant total is what the
    /// program's E coordinate has to match.
    pub fn reset_e(&mut self) {
        self.write(&GCodeCommand::SetPosition {
            x: None,
            y: None,
            z: None,
            e: Some(0.0),
        });
    }

    /// Travel (no extrusion) to an XY position.
    pub fn travel_to(&mut self, x: CoordF, y: CoordF) {
        let f = self.travel_feedrate();
        self.write(&GCodeCommand::RapidMove {
            x: Some(x),
            y: Some(y),
            z: None,
            f,
        });
        self.position = Some(Point2::new(x, y));
        self.stats.travel_moves += 1;
    }

    /// Travel to a Z height.
    pub fn travel_to_z(&mut self, z: CoordF) {
        let f = self.travel_feedrate();
        self.write(&GCodeCommand::RapidMove {
            x: None,
            y: None,
            z: Some(z),
            f,
        });
        self.z = z;
        self.stats.travel_moves += 1;
    }

    /// Begin a layer: comments, temperature switch after the first layer,
    /// multiplier for this layer's height, and the Z move.
    pub fn start_layer(&mut self, layer: &LayerPaths) {
        self.write_comment(&format!("LAYER:{}", layer.layer_index));
        self.write_comment(&format!("Z:{:.3}", layer.z_height));

        if layer.layer_index == 1 {
            let (extruder, bed) = (
                self.config.extruder_temperature,
                self.config.bed_temperature,
            );
            self.set_extruder_temperature(extruder, false);
            self.set_bed_temperature(bed, false);
        }

        self.accountant.set_multiplier(extrusion_multiplier(
            self.config.effective_extrusion_width(),
            layer.layer_height,
            self.config.filament_diameter,
            self.config.extrusion_multiplier,
        ));
        self.travel_to_z(layer.z_height);
        self.stats.layers += 1;
    }

    /// Print one path, travelling to its start first if needed.
    pub fn write_path(&mut self, path: &ExtrusionPath, first_layer: bool) {
        let speed = if first_layer {
            self.config.first_layer_speed
        } else if path.role.is_infill() {
            self.config.infill_speed
        } else {
            self.config.print_speed
        };
        let feedrate = speed * 60.0;

        self.write_raw(&format!("; FEATURE: {}", path.role.feature_name()));
        for seg in &path.segments {
            if self.position != Some(seg.start) {
                self.travel_to(seg.start.x, seg.start.y);
            }
            let e = self.accountant.add(seg);
            let f = self.take_feedrate(feedrate);
            self.write(&GCodeCommand::LinearMove {
                x: Some(seg.end.x),
                y: Some(seg.end.y),
                z: None,
                e: Some(e),
                f,
            });
            self.position = Some(seg.end);
            self.stats.extrusion_moves += 1;
        }
    }

    /// Print a whole layer.
    pub fn write_layer(&mut self, layer: &LayerPaths) {
        self.start_layer(layer);
        for path in &layer.paths {
            self.write_path(path, layer.layer_index == 0);
        }
    }

    /// Write the end sequence: heaters off, lift, motors off.
    pub fn write_end(&mut self) {
        self.write_comment("");
        self.write_comment("End of print");
        self.set_extruder_temperature(0, false);
        self.set_bed_temperature(0, false);
        let z = self.z + 10.0;
        self.travel_to_z(z);
        self.write(&GCodeCommand::DisableMotors);

        let filament = self
            .accountant
            .stats(self.config.filament_diameter, self.config.filament_density);
        self.write_comment(&format!(
            "filament used [mm] = {:.2}",
            filament.filament_length_mm
        ));
        self.write_comment(&format!(
            "filament used [g] = {:.2}",
            filament.filament_weight_g
        ));
    }

    /// Finish and return the program.
    pub fn finish(mut self) -> GCode {
        self.stats.filament = self
            .accountant
            .stats(self.config.filament_diameter, self.config.filament_density);
        GCode::new(self.content, self.stats)
    }

    fn travel_feedrate(&mut self) -> Option<CoordF> {
        self.take_feedrate(self.config.travel_speed * 60.0)
    }

    /// Feedrate to emit, or `None` when it is already active.
    fn take_feedrate(&mut self, feedrate: CoordF) -> Option<CoordF> {
        if self.feedrate == Some(feedrate) {
            None
        } else {
            self.feedrate = Some(feedrate);
            Some(feedrate)
        }
    }
}
