use crate::wavefield::Field3D;
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis normal to the sampled plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SliceAxis {
    X,
    Y,
    #[default]
    Z,
}

impl SliceAxis {
    pub fn index(self) -> usize {
        match self {
            SliceAxis::X => 0,
            SliceAxis::Y => 1,
            SliceAxis::Z => 2,
        }
    }

    /// Names of the two in-plane axes, in array order.
    pub fn plane_labels(self) -> (&'static str, &'static str) {
        match self {
            SliceAxis::X => ("y", "z"),
            SliceAxis::Y => ("x", "z"),
            SliceAxis::Z => ("x", "y"),
        }
    }
}

impl fmt::Display for SliceAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SliceAxis::X => "x",
            SliceAxis::Y => "y",
            SliceAxis::Z => "z",
        };
        write!(f, "{}", name)
    }
}

/// Copies a fixed plane out of the field.
#[derive(Debug, Clone, Copy)]
pub struct FrameSampler {
    pub axis: SliceAxis,
    pub index: usize,
}

impl FrameSampler {
    pub fn new(axis: SliceAxis, index: usize) -> Self {
        Self { axis, index }
    }

    /// Plane through the middle index `n / 2`.
    pub fn mid_plane(axis: SliceAxis, n: usize) -> Self {
        Self::new(axis, n / 2)
    }

    pub fn capture(&self, field: &Field3D) -> Array2<f64> {
        field.index_axis(Axis(self.axis.index()), self.index).to_owned()
    }
}

/// Ordered slices captured during a run. Frame `i` holds the state after
/// step `i + 1`, i.e. at t = (i + 1)·dt.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    frames: Vec<Array2<f64>>,
    axis: SliceAxis,
    index: usize,
    coordinate: f64, // Position of the plane along `axis`
    dt: f64,
}

impl FrameSequence {
    pub fn new(axis: SliceAxis, index: usize, coordinate: f64, dt: f64) -> Self {
        Self::with_capacity(axis, index, coordinate, dt, 0)
    }

    pub fn with_capacity(
        axis: SliceAxis,
        index: usize,
        coordinate: f64,
        dt: f64,
        capacity: usize,
    ) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
            axis,
            index,
            coordinate,
            dt,
        }
    }

    pub fn push(&mut self, frame: Array2<f64>) {
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Array2<f64>> {
        self.frames.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Array2<f64>> {
        self.frames.iter()
    }

    pub fn frames(&self) -> &[Array2<f64>] {
        &self.frames
    }

    pub fn axis(&self) -> SliceAxis {
        self.axis
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn coordinate(&self) -> f64 {
        self.coordinate
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn time(&self, i: usize) -> f64 {
        (i + 1) as f64 * self.dt
    }

    /// Largest |u| over every frame, for a shared colour scale.
    pub fn max_abs(&self) -> f64 {
        self.frames
            .iter()
            .flat_map(|frame| frame.iter())
            .fold(0.0_f64, |acc, &v| acc.max(v.abs()))
    }
}

impl<'a> IntoIterator for &'a FrameSequence {
    type Item = &'a Array2<f64>;
    type IntoIter = std::slice::Iter<'a, Array2<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
