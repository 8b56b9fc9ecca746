//! WebGPU rendering module
//!
//! Uses SDF (Signed Distance Fields) for all rendering in the fragment shader.
//! The renderer only ever sees a [`crate::sim::Snapshot`].

pub mod sdf_pipeline;

pub use sdf_pipeline::SdfRenderState;
