pub mod coerce;
pub mod environment;
pub mod interpreter;
pub mod ops;
pub mod pattern;
mod stack;
pub mod value;
