pub mod image;
pub mod synth;

pub use image::PatchImage;
pub use synth::{gabor_patch, generate, to_intensity, PatchParams};
