pub use channel::Channel;
pub use vm::{Computer, Flow, RunOptions, StopReason, VmError};

pub mod channel;
pub mod console;
pub mod debugger;
pub mod memory;
pub mod op;
pub mod vm;

/// A single memory cell. Programs may hold values well past 32 bits.
pub type Value = i64;
