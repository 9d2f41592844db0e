pub mod greyscale;
pub use greyscale::luma;
