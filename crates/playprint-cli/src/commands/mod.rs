pub mod assemble;
pub mod compile;
pub mod dump;
