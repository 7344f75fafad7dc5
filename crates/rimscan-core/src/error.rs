//! Error types shared by every rimscan stage.

use thiserror::Error;

/// Result type for rimscan stages.
pub type Result<T> = std::result::Result<T, RimError>;

/// Failures a cube can hit on its way through the pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RimError {
    /// A stage needs at least one point and got none.
    #[error("{stage}: point cloud is empty")]
    EmptyCloud {
        /// Stage that rejected the input.
        stage: &'static str,
    },

    /// A stage needs more points than it was given.
    #[error("{stage}: need at least {required} points, got {actual}")]
    InsufficientPoints {
        /// Stage that rejected the input.
        stage: &'static str,
        /// Minimum number of points.
        required: usize,
        /// Points provided.
        actual: usize,
    },

    /// Rasterizing a face produced a cell outside the grid.
    #[error("point ({u}, {v}) maps to cell [{row}, {col}] outside a {rows}x{cols} grid")]
    GridIndexOutOfRange {
        /// Horizontal coordinate of the offending point.
        u: f32,
        /// Vertical coordinate of the offending point.
        v: f32,
        /// Computed row.
        row: i64,
        /// Computed column.
        col: i64,
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        cols: usize,
    },

    /// None of the candidate orientations shows the rim notch.
    #[error("no orientation among {tried} candidates exhibits the required rim pattern")]
    PatternNotFound {
        /// Number of orientations examined.
        tried: usize,
    },

    /// The fitted plane is (nearly) vertical, so heights over x/y are undefined.
    #[error("fitted plane is vertical (normal z = {normal_z:.3e})")]
    DegeneratePlane {
        /// Z component of the fitted normal.
        normal_z: f64,
    },

    /// A configuration value is unusable.
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// What is wrong with it.
        reason: String,
    },
}
