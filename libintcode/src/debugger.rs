use log::trace;

use crate::op::Op;
use crate::vm::{Computer, Flow};

/// Observer invoked around every executed instruction.
pub trait Debugger {
    fn op_read(&mut self, vm: &Computer, op: &Op);
    fn op_executed(&mut self, vm: &Computer, op: &Op, flow: Flow);
}

/// Traces each instruction through the `log` facade at trace level.
pub struct LogDebugger;

impl Debugger for LogDebugger {
    fn op_read(&mut self, vm: &Computer, op: &Op) {
        let params = (1..=op.opcode.param_count())
            .map(|slot| vm.memory.peek(vm.pointer + slot).to_string())
            .collect::<Vec<_>>();
        trace!(
            "[{}] ({:>5}): {} {} {:?}",
            vm.name().unwrap_or("-"),
            vm.pointer,
            op.mnemonic(),
            params.join(","),
            &op.modes[..op.opcode.param_count()]
        );
    }

    fn op_executed(&mut self, vm: &Computer, _op: &Op, flow: Flow) {
        match flow {
            Flow::Jumped => trace!("  jumped to {}", vm.pointer),
            Flow::Suspended => trace!("  suspended, {} queued", vm.input_channel().len()),
            Flow::Advance(_) => {}
        }
    }
}
