//! Fixed-function GPU command interface.
//!
//! This module is responsible for:
//! - the [`Gpu`] trait, the command surface a render target drives
//! - hardware-side enumerations and binding descriptors
//! - [`CommandRecorder`], a headless implementation that records every command

mod gpu;
mod recorder;

pub use gpu::{
    Gpu, GpuBlend, GpuBlendEquation, GpuBlendFactor, GpuPrimitive, GpuStateSnapshot,
    ProgramHandle, TextureBinding, VertexBinding,
};
pub use recorder::{CommandLog, CommandRecorder, GpuCommand, RecorderInit};
