//! Etch-profile prediction by frequency-domain morphing of precomputed
//! boundary curves.

pub mod common;
pub mod domain;
pub mod geometry;
pub mod modules;
pub mod numerics;
