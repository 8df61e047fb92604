use std::{
    cell::RefCell,
    collections::VecDeque,
    io::{self, BufRead, BufReader, Stdin, Stdout, Write},
    num::ParseIntError,
    rc::Rc,
};

use thiserror::Error;

use crate::Value;

/// Interactive side of a computer: where blocking input comes from and
/// where logged output goes.
pub trait Console {
    /// Block until one integer is available.
    fn prompt(&mut self) -> Result<Value, ConsoleError>;
    fn emit(&mut self, value: Value) -> Result<(), ConsoleError>;
}

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Console I/O failed")]
    Io(#[from] io::Error),
    #[error("Expected an integer, got {line:?}")]
    Parse {
        line: String,
        #[source]
        source: ParseIntError,
    },
    #[error("Input closed while waiting for a value")]
    Closed,
}

/// Line-oriented console: prints `input: ` and reads one integer per line.
pub struct LineConsole<R, W> {
    reader: R,
    writer: W,
}

impl LineConsole<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn prompt(&mut self) -> Result<Value, ConsoleError> {
        write!(self.writer, "input: ")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ConsoleError::Closed);
        }
        let trimmed = line.trim();
        trimmed.parse().map_err(|source| ConsoleError::Parse {
            line: trimmed.to_owned(),
            source,
        })
    }

    fn emit(&mut self, value: Value) -> Result<(), ConsoleError> {
        writeln!(self.writer, "{}", value)?;
        Ok(())
    }
}

/// Scripted console for tests and embedding. Emitted values are captured in
/// a shared buffer handed back by [`MemoryConsole::new`].
pub struct MemoryConsole {
    inputs: VecDeque<Value>,
    buffer: Rc<RefCell<Vec<Value>>>,
}

impl MemoryConsole {
    pub fn new(inputs: &[Value]) -> (Rc<RefCell<Vec<Value>>>, Self) {
        let buffer = Rc::new(RefCell::new(Vec::new()));
        let console = Self {
            inputs: inputs.iter().copied().collect(),
            buffer: Rc::clone(&buffer),
        };
        (buffer, console)
    }
}

impl Console for MemoryConsole {
    fn prompt(&mut self) -> Result<Value, ConsoleError> {
        self.inputs.pop_front().ok_or(ConsoleError::Closed)
    }

    fn emit(&mut self, value: Value) -> Result<(), ConsoleError> {
        self.buffer.borrow_mut().push(value);
        Ok(())
    }
}
