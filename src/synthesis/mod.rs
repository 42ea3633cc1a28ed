//! Synthesis pipeline: quantize, resolve scale, assign targets, emit increments

/// Target count assignment with first-maximum anchoring
pub mod assign;
/// Ordered emission of increment events
pub mod emission;
/// Grayscale to intensity level quantization
pub mod quantize;
/// Minimal scale factor resolution
pub mod scale;
