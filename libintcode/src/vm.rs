use std::fmt::Debug;

use log::{debug, warn};
use thiserror::Error;

use crate::channel::Channel;
use crate::console::{Console, ConsoleError, LineConsole};
use crate::debugger::Debugger;
use crate::memory::Memory;
use crate::op::{DecodeError, Mode, Op, OpCode};
use crate::Value;

#[derive(Error, Debug)]
pub enum VmError {
    #[error("Invalid instruction at {pointer}")]
    Decode {
        pointer: usize,
        #[source]
        source: DecodeError,
    },
    #[error("Parameter {param} of the instruction at {pointer} is a destination in immediate mode")]
    ImmediateDestination { pointer: usize, param: usize },
    #[error("Negative address {address} resolved at {pointer}")]
    NegativeAddress { pointer: usize, address: Value },
    #[error("Arithmetic overflow at {pointer}")]
    Overflow { pointer: usize },
    #[error("Console failed at {pointer}")]
    Console {
        pointer: usize,
        #[source]
        source: ConsoleError,
    },
}

/// What an instruction did to the instruction pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Move past the instruction by this many cells.
    Advance(usize),
    /// The instruction set the pointer itself.
    Jumped,
    /// Input was needed and none was queued. Retry the same instruction.
    Suspended,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StopReason {
    Halted,
    AwaitingInput,
    CycleLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Send every output value to the console.
    pub logging: bool,
    /// Suspend on empty input instead of prompting the console.
    pub loop_mode: bool,
    /// Upper bound on instructions executed per `resume`.
    pub max_cycles: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            logging: true,
            loop_mode: false,
            max_cycles: None,
        }
    }
}

impl RunOptions {
    pub fn logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    pub fn loop_mode(mut self, loop_mode: bool) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    pub fn max_cycles(mut self, max_cycles: u64) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }
}

pub struct Computer {
    name: Option<String>,
    pub memory: Memory,
    pub pointer: usize,
    pub relative_base: Value,
    input: Channel,
    output: Vec<Value>,
    downstream: Option<Channel>,
    halted: bool,
    options: RunOptions,
    console: Box<dyn Console>,
    pub debugger: Option<Box<dyn Debugger>>,
}

impl Debug for Computer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Computer")
            .field("name", &self.name)
            .field("pointer", &self.pointer)
            .field("relative_base", &self.relative_base)
            .field("halted", &self.halted)
            .field("input", &self.input.snapshot())
            .field("output", &self.output)
            .finish()
    }
}

impl Default for Computer {
    fn default() -> Self {
        Self::new()
    }
}

impl Computer {
    pub fn new() -> Self {
        Self {
            name: None,
            memory: Memory::empty(),
            pointer: 0,
            relative_base: 0,
            input: Channel::new(),
            output: Vec::new(),
            downstream: None,
            halted: false,
            options: RunOptions::default(),
            console: Box::new(LineConsole::stdio()),
            debugger: None,
        }
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new()
        }
    }

    pub fn with_console(mut self, console: Box<dyn Console>) -> Self {
        self.console = console;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("computer")
    }

    pub fn output(&self) -> &[Value] {
        &self.output
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    pub fn options(&self) -> RunOptions {
        self.options
    }

    /// Handle to this computer's input queue. Values sent through it are
    /// consumed by the input instruction.
    pub fn input_channel(&self) -> Channel {
        self.input.clone()
    }

    /// Whether the upstream feeding this computer has finished.
    pub fn input_closed(&self) -> bool {
        self.input.is_closed()
    }

    /// Copy every future output into `channel` and close it on halt.
    pub fn link(&mut self, channel: Channel) -> Option<Channel> {
        self.downstream.replace(channel)
    }

    pub fn unlink(&mut self) -> Option<Channel> {
        self.downstream.take()
    }

    /// Reset execution state and seed memory and input for a new run.
    /// The input channel keeps its identity so existing links survive.
    pub fn load(&mut self, program: &[Value], input: &[Value], options: RunOptions) {
        self.memory = Memory::with_program(program);
        self.pointer = 0;
        self.relative_base = 0;
        self.output.clear();
        self.halted = false;
        self.input.reset(input);
        self.options = options;
    }

    /// Load `program` and execute it until it halts or, in loop mode, until
    /// it waits for input. Returns the outputs produced so far.
    pub fn run(
        &mut self,
        program: &[Value],
        input: &[Value],
        options: RunOptions,
    ) -> Result<Vec<Value>, VmError> {
        self.load(program, input, options);
        debug!(
            "{}: running {} cells with {} queued inputs",
            self.label(),
            program.len(),
            input.len()
        );
        self.resume()?;
        Ok(self.output.clone())
    }

    /// Continue from the current pointer.
    pub fn resume(&mut self) -> Result<StopReason, VmError> {
        let mut cycles = 0;
        while !self.halted {
            if let Some(max_cycles) = self.options.max_cycles {
                if cycles >= max_cycles {
                    debug!("{}: stopped after {} cycles", self.label(), cycles);
                    return Ok(StopReason::CycleLimit);
                }
            }
            let flow = match self.step() {
                Ok(flow) => flow,
                Err(e) => {
                    warn!("{}: {}", self.label(), e);
                    self.close_downstream();
                    return Err(e);
                }
            };
            cycles += 1;
            if flow == Flow::Suspended {
                debug!("{}: waiting for input at {}", self.label(), self.pointer);
                return Ok(StopReason::AwaitingInput);
            }
        }
        debug!("{}: halted with {} outputs", self.label(), self.output.len());
        self.close_downstream();
        Ok(StopReason::Halted)
    }

    fn close_downstream(&mut self) {
        if let Some(downstream) = &self.downstream {
            debug!("{}: closing downstream link", self.label());
            downstream.close();
        }
    }

    pub fn step(&mut self) -> Result<Flow, VmError> {
        let pointer = self.pointer;
        let op = Op::from_value(self.memory.read(pointer))
            .map_err(|source| VmError::Decode { pointer, source })?;

        if let Some(mut debugger) = self.debugger.take() {
            debugger.op_read(self, &op);
            self.debugger = Some(debugger);
        }

        let flow = self.run_op(op)?;
        if let Flow::Advance(len) = flow {
            self.pointer += len;
        }

        if let Some(mut debugger) = self.debugger.take() {
            debugger.op_executed(self, &op, flow);
            self.debugger = Some(debugger);
        }
        Ok(flow)
    }

    fn run_op(&mut self, op: Op) -> Result<Flow, VmError> {
        match op.opcode {
            OpCode::ADD => self.add(op.modes),
            OpCode::MUL => self.multiply(op.modes),
            OpCode::IN => self.input(op.modes),
            OpCode::OUT => self.output_op(op.modes),
            OpCode::JT => self.jump_if_true(op.modes),
            OpCode::JF => self.jump_if_false(op.modes),
            OpCode::LT => self.less_than(op.modes),
            OpCode::EQ => self.equal(op.modes),
            OpCode::ARB => self.adjust_relative_base(op.modes),
            OpCode::HLT => Ok(self.halt()),
        }
    }

    fn to_address(&self, value: Value) -> Result<usize, VmError> {
        usize::try_from(value).map_err(|_| VmError::NegativeAddress {
            pointer: self.pointer,
            address: value,
        })
    }

    fn overflow(&self) -> VmError {
        VmError::Overflow {
            pointer: self.pointer,
        }
    }

    /// Address named by parameter `slot` (1-based). Immediate parameters
    /// have no address.
    pub fn param_address(&mut self, slot: usize, mode: Mode) -> Result<usize, VmError> {
        let raw = self.memory.read(self.pointer + slot);
        let address = match mode {
            Mode::Position => raw,
            Mode::Relative => raw
                .checked_add(self.relative_base)
                .ok_or_else(|| self.overflow())?,
            Mode::Immediate => {
                return Err(VmError::ImmediateDestination {
                    pointer: self.pointer,
                    param: slot,
                })
            }
        };
        self.to_address(address)
    }

    pub fn param_value(&mut self, slot: usize, mode: Mode) -> Result<Value, VmError> {
        match mode {
            Mode::Immediate => Ok(self.memory.read(self.pointer + slot)),
            Mode::Position | Mode::Relative => {
                let address = self.param_address(slot, mode)?;
                Ok(self.memory.read(address))
            }
        }
    }

    fn store(&mut self, opcode: OpCode, modes: [Mode; 3], value: Value) -> Result<Flow, VmError> {
        let dest = self.param_address(3, modes[2])?;
        self.memory.write(dest, value);
        Ok(Flow::Advance(opcode.len()))
    }

    pub fn add(&mut self, modes: [Mode; 3]) -> Result<Flow, VmError> {
        let a = self.param_value(1, modes[0])?;
        let b = self.param_value(2, modes[1])?;
        let sum = a.checked_add(b).ok_or_else(|| self.overflow())?;
        self.store(OpCode::ADD, modes, sum)
    }

    pub fn multiply(&mut self, modes: [Mode; 3]) -> Result<Flow, VmError> {
        let a = self.param_value(1, modes[0])?;
        let b = self.param_value(2, modes[1])?;
        let product = a.checked_mul(b).ok_or_else(|| self.overflow())?;
        self.store(OpCode::MUL, modes, product)
    }

    pub fn input(&mut self, modes: [Mode; 3]) -> Result<Flow, VmError> {
        let dest = self.param_address(1, modes[0])?;
        let value = match self.input.recv() {
            Some(value) => value,
            None if self.options.loop_mode => return Ok(Flow::Suspended),
            None => {
                let pointer = self.pointer;
                self.console
                    .prompt()
                    .map_err(|source| VmError::Console { pointer, source })?
            }
        };
        self.memory.write(dest, value);
        Ok(Flow::Advance(OpCode::IN.len()))
    }

    pub fn output_op(&mut self, modes: [Mode; 3]) -> Result<Flow, VmError> {
        let value = self.param_value(1, modes[0])?;
        self.output.push(value);
        if self.options.logging {
            let pointer = self.pointer;
            self.console
                .emit(value)
                .map_err(|source| VmError::Console { pointer, source })?;
        }
        if let Some(downstream) = &self.downstream {
            downstream.send(value);
        }
        Ok(Flow::Advance(OpCode::OUT.len()))
    }

    fn jump(
        &mut self,
        opcode: OpCode,
        modes: [Mode; 3],
        when_nonzero: bool,
    ) -> Result<Flow, VmError> {
        let condition = self.param_value(1, modes[0])?;
        if (condition != 0) == when_nonzero {
            let target = self.param_value(2, modes[1])?;
            self.pointer = self.to_address(target)?;
            Ok(Flow::Jumped)
        } else {
            Ok(Flow::Advance(opcode.len()))
        }
    }

    pub fn jump_if_true(&mut self, modes: [Mode; 3]) -> Result<Flow, VmError> {
        self.jump(OpCode::JT, modes, true)
    }

    pub fn jump_if_false(&mut self, modes: [Mode; 3]) -> Result<Flow, VmError> {
        self.jump(OpCode::JF, modes, false)
    }

    pub fn less_than(&mut self, modes: [Mode; 3]) -> Result<Flow, VmError> {
        let a = self.param_value(1, modes[0])?;
        let b = self.param_value(2, modes[1])?;
        self.store(OpCode::LT, modes, (a < b) as Value)
    }

    pub fn equal(&mut self, modes: [Mode; 3]) -> Result<Flow, VmError> {
        let a = self.param_value(1, modes[0])?;
        let b = self.param_value(2, modes[1])?;
        self.store(OpCode::EQ, modes, (a == b) as Value)
    }

    pub fn adjust_relative_base(&mut self, modes: [Mode; 3]) -> Result<Flow, VmError> {
        let offset = self.param_value(1, modes[0])?;
        self.relative_base = self
            .relative_base
            .checked_add(offset)
            .ok_or_else(|| self.overflow())?;
        Ok(Flow::Advance(OpCode::ARB.len()))
    }

    pub fn halt(&mut self) -> Flow {
        self.halted = true;
        Flow::Advance(OpCode::HLT.len())
    }
}
