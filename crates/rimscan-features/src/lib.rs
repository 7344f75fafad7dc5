pub mod heatmap;
pub mod plane;

pub use heatmap::{heatmap, Heatmap, HeatmapCfg, HeatmapScale};
pub use plane::{fit_plane, Plane};
