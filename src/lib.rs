//! Enhancement and pad localization for photographs of chemical test strips.
//!
//! A strip photo goes through five enhancement stages ([`enhance`]), then an
//! adaptive-threshold segmentation finds pad-shaped regions ([`detect`]) and
//! each region is reduced to its mean color ([`sample_color`]). [`analyze`]
//! chains the three; [`process_file`] adds decoding and encoding around it.

pub mod annotate;
pub mod config;
pub mod detect;
pub mod enhance;
pub mod error;
pub mod histogram;
pub mod image_io;
pub mod kornia;
pub mod pipeline;
pub mod region;
pub mod sampler;
pub mod test_image_gen;

pub use config::PipelineConfig;
pub use detect::detect;
pub use enhance::enhance;
pub use error::{Result, StripError};
pub use pipeline::{Analysis, PipelineReport, analyze, process_file};
pub use region::{ColorSample, Region};
pub use sampler::sample_color;
