pub mod float;
pub mod linear_algebra;
