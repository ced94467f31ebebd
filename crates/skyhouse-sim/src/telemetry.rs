//! Flight track telemetry.
//!
//! Writes one CSV row per tick for plotting and regression comparison.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use skyhouse_flight::{Controls, TickReport};

use crate::error::SimError;

/// Snapshot of one tick for telemetry logging.
pub struct TelemetrySnapshot<'a> {
    pub elapsed: f64,
    pub dt: f64,
    pub controls: Controls,
    pub report: &'a TickReport,
}

/// Macro to define the CSV schema and generate the header/row writers.
///
/// Generates `write_header()` and `write_row()` from a single schema
/// definition, keeping column names and formats in sync.
macro_rules! define_telemetry {
    (
        columns: { $( $name:ident : $fmt:literal ),* $(,)? },
        prelude: |$snapshot:ident| { $( $prelude:stmt );* $(;)? },
        row_values: { $( $val:expr ),* $(,)? }
    ) => {
        /// Write the CSV header line.
        fn write_header(out: &mut impl Write) -> io::Result<()> {
            const CSV_HEADER: &str = concat!( $( stringify!($name), "," ),* );
            writeln!(out, "{}", CSV_HEADER.strip_suffix(',').unwrap_or(CSV_HEADER))
        }

        /// Write one CSV row.
        fn write_row(out: &mut impl Write, $snapshot: &TelemetrySnapshot<'_>) -> io::Result<()> {
            // Execute prelude to compute derived values.
            $( $prelude )*

            // Generate row from schema, then drop the trailing comma only;
            // empty trailing columns must survive.
            let line = format!( concat!( $( $fmt, "," ),* ), $( $val ),* );
            writeln!(out, "{}", line.strip_suffix(',').unwrap_or(&line))
        }
    };
}

define_telemetry! {
    columns: {
        t: "{:.4}",
        dt: "{:.5}",
        steering: "{}",
        throttle: "{}",
        lon: "{:.7}",
        lat: "{:.7}",
        alt: "{:.2}",
        heading: "{:.3}",
        pitch: "{:.2}",
        bank: "{:.2}",
        speed: "{:.3}",
        vel_east: "{:.4}",
        vel_north: "{:.4}",
        reached: "{}",
        status: "{}",
    },
    prelude: |s| {
        let state = &s.report.sample.state;
        let fmt_axis = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"));
        let reached = s.report.reached.join(";");
        let status = s
            .report
            .status
            .as_ref()
            .map_or_else(String::new, ToString::to_string);
    },
    row_values: {
        s.elapsed,
        s.dt,
        fmt_axis(s.controls.steering),
        fmt_axis(s.controls.throttle),
        state.longitude,
        state.latitude,
        state.altitude,
        state.heading,
        state.pitch,
        s.report.sample.bank,
        s.report.sample.speed,
        state.velocity.x,
        state.velocity.y,
        reached,
        status,
    }
}

/// Buffered CSV telemetry sink.
pub struct TelemetryWriter<W: Write> {
    out: W,
}

/// Telemetry written to a file on disk.
pub type FileTelemetry = TelemetryWriter<BufWriter<File>>;

impl FileTelemetry {
    /// Create (or truncate) a telemetry file and write its header.
    pub fn create(path: &Path) -> Result<Self, SimError> {
        let io_err = |source| SimError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(io_err)?;
        Self::new(BufWriter::new(file)).map_err(io_err)
    }
}

impl<W: Write> TelemetryWriter<W> {
    /// Wrap a writer and emit the header.
    pub fn new(mut out: W) -> io::Result<Self> {
        write_header(&mut out)?;
        Ok(Self { out })
    }

    /// Append one tick.
    pub fn emit(&mut self, snapshot: &TelemetrySnapshot<'_>) -> io::Result<()> {
        write_row(&mut self.out, snapshot)
    }

    /// Flush buffered rows and return the writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use skyhouse_flight::{FlightParameters, FlightSession, TrackerConfig, VehicleState};

    use super::*;

    #[test]
    fn test_header_and_row() {
        let mut session = FlightSession::new(
            FlightParameters::default(),
            TrackerConfig::default(),
            VehicleState::at(-74.006, 40.7128, 500.0),
        )
        .unwrap();
        session.tracker_mut().add_waypoint("NYC", 40.7128, -74.006);

        let controls = Controls {
            steering: None,
            throttle: Some(0.5),
        };
        let report = session.tick(controls, 1.0);

        let mut writer = TelemetryWriter::new(Vec::new()).unwrap();
        writer
            .emit(&TelemetrySnapshot {
                elapsed: 1.0,
                dt: 1.0,
                controls,
                report: &report,
            })
            .unwrap();
        let bytes = writer.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("t,dt,steering,throttle,lon,lat,alt"));
        assert_eq!(header.split(',').count(), 15);

        let row: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(row.len(), 15);
        assert_eq!(row[2], "-");
        assert_eq!(row[3], "0.500");
        assert_eq!(row[6], "550.00");
        assert_eq!(row[13], "NYC");
        assert_eq!(row[14], "");
    }
}
