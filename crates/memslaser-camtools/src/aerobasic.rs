//! AeroBasic program writer
//!
//! Writes the drilling order of a layout as an AeroBasic program for an
//! Aerotech stage with a pulsed laser. Every hole is a linear move followed by
//! a call to the `MAKEHOLE` subroutine, which fires a burst of pulses.

use crate::interfaces::NumericalControlWriter;
use memslaser_core::{ConfigError, LengthUnit, Point, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Stage precision is 200 nm, i.e. 4 decimals in mm; 2 more for safety
const COORD_NUM_DIGITS: usize = 6;

/// Length unit of AeroBasic coordinates (millimeters)
pub const AEROBASIC_LENGTH_UNIT: f64 = LengthUnit::Millimeter.meters();

/// Stage and laser parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AeroBasicParameters {
    /// Coordinated motion feedrate between holes
    pub transition_feedrate: f64,
    pub shape_feedrate: f64,
    /// Slow down long moves between holes
    pub transition_feedrate_reduction_enabled: bool,
    /// Minimum travel (mm) for which the feedrate is reduced
    pub transition_feedrate_reduction_distance_threshold_mm: f64,
    /// Divisor applied to the transition feedrate on long moves
    pub transition_feedrate_reduction_factor: f64,
    /// Laser pulses per hole
    pub pulse_num: u32,
    /// Laser pulse frequency (Hz)
    pub frequency_hz: u32,
}

impl Default for AeroBasicParameters {
    fn default() -> Self {
        Self {
            transition_feedrate: 0.2,
            shape_feedrate: 0.2,
            transition_feedrate_reduction_enabled: false,
            transition_feedrate_reduction_distance_threshold_mm: 0.3,
            transition_feedrate_reduction_factor: 3.0,
            pulse_num: 3,
            frequency_hz: 200_000,
        }
    }
}

impl AeroBasicParameters {
    /// Reject values the stage or laser cannot use
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let positive = [
            ("transition_feedrate", self.transition_feedrate),
            ("shape_feedrate", self.shape_feedrate),
            (
                "transition_feedrate_reduction_factor",
                self.transition_feedrate_reduction_factor,
            ),
            ("pulse_num", f64::from(self.pulse_num)),
            ("frequency_hz", f64::from(self.frequency_hz)),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidValue {
                    name: name.to_string(),
                    value,
                });
            }
        }
        let threshold = self.transition_feedrate_reduction_distance_threshold_mm;
        if !(threshold.is_finite() && threshold >= 0.0) {
            return Err(ConfigError::InvalidValue {
                name: "transition_feedrate_reduction_distance_threshold_mm".to_string(),
                value: threshold,
            });
        }
        Ok(())
    }
}

/// Writer for AeroBasic program files
#[derive(Debug, Clone)]
pub struct AeroBasicWriter {
    path: PathBuf,
    params: AeroBasicParameters,
    prev_hole: Point,
    hole_commands: String,
    num_holes: usize,
}

impl AeroBasicWriter {
    pub fn new(path: impl AsRef<Path>, params: AeroBasicParameters) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            params,
            prev_hole: Point::default(),
            hole_commands: String::new(),
            num_holes: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn params(&self) -> &AeroBasicParameters {
        &self.params
    }

    pub fn num_holes(&self) -> usize {
        self.num_holes
    }

    fn header(&self) -> String {
        let p = &self.params;
        [
            format!(
                "#define CoordinatedMotionTransitionFeedrate {}",
                p.transition_feedrate
            ),
            format!("#define ShapeFeedrate {}\n", p.shape_feedrate),
            "DVAR $FREQUENCY".to_string(),
            "DVAR $TOTtime".to_string(),
            "DVAR $ONtime".to_string(),
            "DVAR $PulseNum".to_string(),
            "DVAR $DWELLTIME\n".to_string(),
            "ABSOLUTE\n".to_string(),
            "POSOFFSET SET X 0 Y 0\n".to_string(),
            "'Default settings".to_string(),
            format!("$PulseNum = {}", p.pulse_num),
            format!("$FREQUENCY = {}\n", p.frequency_hz),
            "'Basics".to_string(),
            "$ONtime = 1/$FREQUENCY * 1000000".to_string(),
            "$TOTtime = $ONtime * 2\n".to_string(),
            "'Start of laser machining".to_string(),
            "$AO[0].X =5".to_string(),
        ]
        .join("\n")
    }

    fn footer() -> &'static str {
        "'End of laser machining\n\
         $AO[0].X =0\n\n\
         G1 X 0 Y 0\n\n\
         END PROGRAM\n\n\
         'Subroutine to make hole (must be defined after end of program)\n\
         DFS MAKEHOLE\n\
         \x20   PSOCONTROL X RESET\n\
         \x20   PSOPULSE X TIME $TOTtime, $ONtime CYCLES $PulseNum\n\
         \x20   PSOOUTPUT X PULSE\n\
         \x20   $DWELLTIME = $TOTtime/100000*$PulseNum\n\
         \x20   DWELL 0.08\n\
         \x20   PSOCONTROL X FIRE\n\
         \x20   DWELL $DWELLTIME\n\
         ENDDFS"
    }

    /// Full program text for the holes added so far
    pub fn render(&self) -> String {
        format!(
            "{}\n\n{}\n{}",
            self.header(),
            self.hole_commands,
            Self::footer()
        )
    }
}

impl NumericalControlWriter for AeroBasicWriter {
    fn length_unit(&self) -> f64 {
        AEROBASIC_LENGTH_UNIT
    }

    fn add_hole(&mut self, x: f64, y: f64) {
        let p = &self.params;
        let hole = Point::new(x, y);
        let reduce_feedrate = p.transition_feedrate_reduction_enabled
            && self.prev_hole.distance_to(&hole)
                >= p.transition_feedrate_reduction_distance_threshold_mm;

        let mut commands = Vec::with_capacity(4);
        if reduce_feedrate {
            commands.push(format!(
                "G63\nF {}",
                p.transition_feedrate / p.transition_feedrate_reduction_factor
            ));
        }
        // Stage axes are swapped relative to the layout
        commands.push(format!(
            "G1 X {:.prec$} Y {:.prec$}",
            -y,
            x,
            prec = COORD_NUM_DIGITS
        ));
        if reduce_feedrate {
            commands.push(format!("F {}\nG64", p.transition_feedrate));
        }
        commands.push("CALL MAKEHOLE".to_string());

        self.hole_commands.push_str(&commands.join("\n"));
        self.hole_commands.push('\n');
        self.prev_hole = hole;
        self.num_holes += 1;
    }

    fn finish(&mut self) -> Result<()> {
        fs::write(&self.path, self.render())?;
        info!(
            path = %self.path.display(),
            holes = self.num_holes,
            "Wrote AeroBasic program"
        );
        Ok(())
    }

    fn describe(&self) -> Vec<String> {
        let p = &self.params;
        vec![
            format!("File path/name: {}", self.path.display()),
            format!("Transition feedrate: {}", p.transition_feedrate),
            format!("Shape feedrate: {}", p.shape_feedrate),
            format!(
                "Transition feedrate reduction enabled: {}",
                p.transition_feedrate_reduction_enabled
            ),
            format!(
                "Transition feedrate reduction distance threshold (mm): {}",
                p.transition_feedrate_reduction_distance_threshold_mm
            ),
            format!(
                "Transition feedrate reduction factor: {}",
                p.transition_feedrate_reduction_factor
            ),
            format!("Pulse number: {}", p.pulse_num),
            format!("Frequency (Hz): {}", p.frequency_hz),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hole_block_swaps_axes() {
        let mut writer = AeroBasicWriter::new("out.pgm", AeroBasicParameters::default());
        writer.add_hole(1.5, 0.25);
        assert_eq!(
            writer.hole_commands,
            "G1 X -0.250000 Y 1.500000\nCALL MAKEHOLE\n"
        );
        assert_eq!(writer.num_holes(), 1);
    }

    #[test]
    fn test_feedrate_reduction_on_long_moves() {
        let params = AeroBasicParameters {
            transition_feedrate_reduction_enabled: true,
            ..Default::default()
        };
        let mut writer = AeroBasicWriter::new("out.pgm", params);
        writer.add_hole(1.0, 1.0);
        writer.add_hole(1.1, 1.0);
        assert_eq!(
            writer.hole_commands,
            "G63\nF 0.06666666666666667\nG1 X -1.000000 Y 1.000000\nF 0.2\nG64\nCALL MAKEHOLE\n\
             G1 X -1.000000 Y 1.100000\nCALL MAKEHOLE\n"
        );
    }

    #[test]
    fn test_render_layout() {
        let mut writer = AeroBasicWriter::new("out.pgm", AeroBasicParameters::default());
        writer.add_hole(0.5, 0.5);
        let program = writer.render();
        assert!(program.starts_with(
            "#define CoordinatedMotionTransitionFeedrate 0.2\n#define ShapeFeedrate 0.2\n\nDVAR $FREQUENCY\n"
        ));
        assert!(program.contains("$PulseNum = 3\n$FREQUENCY = 200000\n\n'Basics"));
        assert!(program.contains("$AO[0].X =5\n\nG1 X -0.500000 Y 0.500000\nCALL MAKEHOLE\n\n'End of laser machining"));
        assert!(program.contains("DFS MAKEHOLE\n    PSOCONTROL X RESET\n"));
        assert!(program.ends_with("    DWELL $DWELLTIME\nENDDFS"));
    }

    #[test]
    fn test_validate() {
        assert!(AeroBasicParameters::default().validate().is_ok());
        let params = AeroBasicParameters {
            pulse_num: 0,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigError::InvalidValue {
                name: "pulse_num".to_string(),
                value: 0.0,
            })
        );
    }

    #[test]
    fn test_parameters_deserialize_with_defaults() {
        let params: AeroBasicParameters =
            serde_json::from_str(r#"{"pulse_num": 5, "transition_feedrate_reduction_enabled": true}"#)
                .unwrap();
        assert_eq!(params.pulse_num, 5);
        assert!(params.transition_feedrate_reduction_enabled);
        assert_eq!(params.frequency_hz, 200_000);
    }
}
