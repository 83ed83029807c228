//! Mathematical building blocks: the signed gadget decomposition and the random samplers.

pub mod decomposition;
pub mod random;
