//! Geometric transforms: fit-to-view mapping and cropping.
//!
//! # Coordinate System
//!
//! - [`Transform`] maps image pixels to viewport coordinates
//! - Cropping operates on whole image pixels
//! - Origin is top-left corner

mod crop;
mod fit;

pub use crop::crop_pixels;
pub use fit::Transform;
