//! Math operation nodes

pub mod float_math;

pub use float_math::FloatMathNode;
