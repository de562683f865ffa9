//! Snapshot output. The solver hands its state to an [`OutputSink`] at fixed
//! intervals of simulated time; [`SnapshotWriter`] is the sink that persists
//! primitive fields to disk, one file per output time.

use crate::error::Error;
use crate::field::Field;
use crate::hydro::euler2d::Conserved;
use crate::mesh::Mesh;
use crate::setup::DisplayRanges;
use crossbeam_channel::Sender;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

/// A consumer of the solution state.
pub trait OutputSink {
    /// Receive the conserved field at time `time`, reached after `iteration`
    /// steps.
    fn write(
        &mut self,
        conserved: &Field,
        time: f64,
        iteration: u64,
        mesh: &Mesh,
        gamma_law_index: f64,
    ) -> Result<(), Error>;
}

/// A sink that discards everything.
pub struct NullSink;

impl OutputSink for NullSink {
    fn write(&mut self, _: &Field, _: f64, _: u64, _: &Mesh, _: f64) -> Result<(), Error> {
        Ok(())
    }
}

impl<S: OutputSink> OutputSink for Vec<S> {
    fn write(
        &mut self,
        conserved: &Field,
        time: f64,
        iteration: u64,
        mesh: &Mesh,
        gamma_law_index: f64,
    ) -> Result<(), Error> {
        for sink in self {
            sink.write(conserved, time, iteration, mesh, gamma_law_index)?;
        }
        Ok(())
    }
}

/// How color limits are chosen for the rendered fields.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColorScale {
    /// Limits follow the min and max of each field, frame by frame.
    AutoScale,
    /// The same limits for every frame, typically from the initial states.
    FixedScale(DisplayRanges),
}

/// On-disk encoding of a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Cbor,
    MessagePack,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Cbor => "cbor",
            Format::MessagePack => "msgpack",
        }
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cbor" => Ok(Format::Cbor),
            "msgpack" => Ok(Format::MessagePack),
            _ => Err(format!("unknown snapshot format '{}' (expected cbor or msgpack)", s)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]

/**
 * The primitive fields at one output time. Field arrays and the coordinate
 * matrices `grid_x`, `grid_y` are flattened in the same `(i, j)` row-major
 * order as the solver state; `x` and `y` are the cell-center axes.
 */
pub struct Snapshot {
    pub time: f64,
    pub iteration: u64,
    pub gamma_law_index: f64,
    pub size: (usize, usize),
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub grid_x: Vec<f64>,
    pub grid_y: Vec<f64>,
    pub mass_density: Vec<f64>,
    pub velocity_x: Vec<f64>,
    pub velocity_y: Vec<f64>,
    pub gas_pressure: Vec<f64>,
    pub ranges: DisplayRanges,
}

impl Snapshot {
    /// Derive the primitive fields from a conserved field, and resolve the
    /// color limits according to `scale`.
    pub fn new(
        conserved: &Field,
        time: f64,
        iteration: u64,
        mesh: &Mesh,
        gamma_law_index: f64,
        scale: ColorScale,
    ) -> Self {
        let n = conserved.len();
        let mut mass_density = Vec::with_capacity(n);
        let mut velocity_x = Vec::with_capacity(n);
        let mut velocity_y = Vec::with_capacity(n);
        let mut gas_pressure = Vec::with_capacity(n);

        for u in conserved.iter_data() {
            let p = Conserved::from_slice(u).recover_primitive(gamma_law_index);
            mass_density.push(p.mass_density());
            velocity_x.push(p.velocity_1());
            velocity_y.push(p.velocity_2());
            gas_pressure.push(p.gas_pressure());
        }

        let ranges = match scale {
            ColorScale::FixedScale(ranges) => ranges,
            ColorScale::AutoScale => DisplayRanges {
                mass_density: min_max(&mass_density),
                velocity_x: min_max(&velocity_x),
                velocity_y: min_max(&velocity_y),
                gas_pressure: min_max(&gas_pressure),
            },
        };

        let (grid_x, grid_y) = mesh.meshgrid();

        Self {
            time,
            iteration,
            gamma_law_index,
            size: conserved.dim(),
            x: mesh.cell_centers_x(),
            y: mesh.cell_centers_y(),
            grid_x,
            grid_y,
            mass_density,
            velocity_x,
            velocity_y,
            gas_pressure,
            ranges,
        }
    }

    /// The file name for this snapshot, keyed by the time to three decimals.
    pub fn file_name(&self, format: Format) -> String {
        format!("fields_t{:.3}.{}", self.time, format.extension())
    }

    pub fn write_to(&self, path: &Path, format: Format) -> Result<(), Error> {
        let mut buffer = BufWriter::new(File::create(path)?);

        match format {
            Format::Cbor => ciborium::ser::into_writer(self, &mut buffer).map_err(|e| Error::Encode(format!("{:?}", e)))?,
            Format::MessagePack => rmp_serde::encode::write(&mut buffer, self).map_err(|e| Error::Encode(e.to_string()))?,
        }
        buffer.flush()?;
        Ok(())
    }

    pub fn read_from(path: &Path, format: Format) -> Result<Self, Error> {
        let file = File::open(path)?;

        match format {
            Format::Cbor => ciborium::de::from_reader(file).map_err(|e| Error::Encode(format!("{:?}", e))),
            Format::MessagePack => rmp_serde::decode::from_read(file).map_err(|e| Error::Encode(e.to_string())),
        }
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

// ============================================================================
/**
 * Writes snapshots from a background thread. Primitive recovery happens on
 * the caller's thread; encoding and file I/O happen on the writer thread, fed
 * through a channel. Call `finish` to flush outstanding snapshots and collect
 * any error raised by the writer thread.
 */
pub struct SnapshotWriter {
    directory: PathBuf,
    scale: ColorScale,
    sender: Option<Sender<Snapshot>>,
    handle: Option<JoinHandle<Result<usize, Error>>>,
}

impl SnapshotWriter {
    pub fn new<P: AsRef<Path>>(directory: P, format: Format, scale: ColorScale) -> Result<Self, Error> {
        let directory = directory.as_ref().to_path_buf();
        std::fs::create_dir_all(&directory)?;

        let (sender, receiver) = crossbeam_channel::bounded::<Snapshot>(4);
        let target = directory.clone();

        let handle = std::thread::spawn(move || -> Result<usize, Error> {
            let mut count = 0;
            for snapshot in receiver {
                let path = target.join(snapshot.file_name(format));
                snapshot.write_to(&path, format)?;
                debug!("wrote {}", path.display());
                count += 1;
            }
            Ok(count)
        });

        Ok(Self {
            directory,
            scale,
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Close the channel, wait for the writer thread and return the number of
    /// snapshots it wrote.
    pub fn finish(&mut self) -> Result<usize, Error> {
        self.sender.take();

        match self.handle.take() {
            Some(handle) => {
                let count = handle
                    .join()
                    .map_err(|_| Error::Encode("snapshot writer thread panicked".to_string()))??;
                info!("{} snapshots written to {}", count, self.directory.display());
                Ok(count)
            }
            None => Ok(0),
        }
    }
}

impl OutputSink for SnapshotWriter {
    fn write(
        &mut self,
        conserved: &Field,
        time: f64,
        iteration: u64,
        mesh: &Mesh,
        gamma_law_index: f64,
    ) -> Result<(), Error> {
        let snapshot = Snapshot::new(conserved, time, iteration, mesh, gamma_law_index, self.scale);

        let sent = match &self.sender {
            Some(sender) => sender.send(snapshot).is_ok(),
            None => false,
        };
        if sent {
            Ok(())
        } else {
            // The writer thread has stopped; surface its error if it left one.
            self.finish()?;
            Err(Error::Encode("snapshot writer is closed".to_string()))
        }
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
