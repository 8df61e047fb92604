use num_derive::FromPrimitive;
use strum::Display;
use strum_macros::FromRepr;
use thiserror::Error;

use crate::Value;

#[derive(FromPrimitive, Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    ADD = 1,
    MUL = 2,
    IN = 3,
    OUT = 4,
    JT = 5,
    JF = 6,
    LT = 7,
    EQ = 8,
    ARB = 9,
    HLT = 99,
}

impl OpCode {
    /// Instruction length in cells, opcode included.
    pub fn len(&self) -> usize {
        match self {
            OpCode::ADD | OpCode::MUL | OpCode::LT | OpCode::EQ => 4,
            OpCode::JT | OpCode::JF => 3,
            OpCode::IN | OpCode::OUT | OpCode::ARB => 2,
            OpCode::HLT => 1,
        }
    }

    pub fn param_count(&self) -> usize {
        self.len() - 1
    }
}

#[derive(FromRepr, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Position = 0,
    Immediate = 1,
    Relative = 2,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unknown opcode {0}")]
    UnknownOpcode(Value),
    #[error("Unknown addressing mode {mode} for parameter {param}")]
    UnknownMode { param: usize, mode: Value },
    #[error("Negative instruction {0}")]
    Negative(Value),
}

/// Split an instruction word into its opcode and three mode digits.
///
/// The opcode is the low two decimal digits; modes follow right to left,
/// so `1002` is opcode 2 with modes `[0, 1, 0]`. Missing digits are zero.
pub fn decode(value: Value) -> (Value, [Value; 3]) {
    let opcode = value % 100;
    let mode = |param: u32| (value / 10i64.pow(param + 1)) % 10;
    (opcode, [mode(1), mode(2), mode(3)])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Op {
    pub opcode: OpCode,
    pub modes: [Mode; 3],
}

impl Op {
    pub fn new(opcode: OpCode) -> Self {
        Self {
            opcode,
            modes: [Mode::Position; 3],
        }
    }

    pub fn with_modes(opcode: OpCode, modes: [Mode; 3]) -> Self {
        Self { opcode, modes }
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        if value < 0 {
            return Err(DecodeError::Negative(value));
        }
        let (opcode, raw_modes) = decode(value);
        let opcode: OpCode =
            num::FromPrimitive::from_i64(opcode).ok_or(DecodeError::UnknownOpcode(opcode))?;

        let mut modes = [Mode::Position; 3];
        for (param, (mode, raw)) in modes.iter_mut().zip(raw_modes).enumerate() {
            *mode = Mode::from_repr(raw as usize).ok_or(DecodeError::UnknownMode {
                param: param + 1,
                mode: raw,
            })?;
        }

        Ok(Self { opcode, modes })
    }

    pub fn len(&self) -> usize {
        self.opcode.len()
    }

    pub fn mnemonic(&self) -> String {
        self.opcode.to_string()
    }
}

impl From<Op> for Value {
    fn from(op: Op) -> Value {
        let [m1, m2, m3] = op.modes;
        op.opcode as Value + (m1 as Value) * 100 + (m2 as Value) * 1_000 + (m3 as Value) * 10_000
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decode_digits() {
        assert_eq!(decode(1002), (2, [0, 1, 0]));
        assert_eq!(decode(2), (2, [0, 0, 0]));
        assert_eq!(decode(21107), (7, [1, 1, 2]));
        assert_eq!(decode(99), (99, [0, 0, 0]));
    }

    #[test]
    fn from_value() {
        insta::assert_debug_snapshot!(Op::from_value(1002).unwrap(), @r###"
        Op {
            opcode: MUL,
            modes: [
                Position,
                Immediate,
                Position,
            ],
        }
        "###);

        let op = Op::from_value(2).unwrap();
        assert_eq!(op.opcode, OpCode::MUL);
        assert_eq!(op.modes, [Mode::Position; 3]);

        let op = Op::from_value(204).unwrap();
        assert_eq!(op.opcode, OpCode::OUT);
        assert_eq!(op.modes[0], Mode::Relative);
    }

    #[test]
    fn rejects_bad_words() {
        assert_eq!(Op::from_value(42), Err(DecodeError::UnknownOpcode(42)));
        assert_eq!(Op::from_value(0), Err(DecodeError::UnknownOpcode(0)));
        assert_eq!(
            Op::from_value(301),
            Err(DecodeError::UnknownMode { param: 1, mode: 3 })
        );
        assert_eq!(
            Op::from_value(90001),
            Err(DecodeError::UnknownMode { param: 3, mode: 9 })
        );
        assert_eq!(Op::from_value(-1), Err(DecodeError::Negative(-1)));
    }

    #[test]
    fn encode() {
        let op = Op::with_modes(
            OpCode::ADD,
            [Mode::Immediate, Mode::Relative, Mode::Relative],
        );
        let word: Value = op.into();
        assert_eq!(word, 22101);
        assert_eq!(Op::from_value(word).unwrap(), op);
        assert_eq!(Value::from(Op::new(OpCode::HLT)), 99);
    }

    #[test]
    fn lengths() {
        assert_eq!(OpCode::ADD.len(), 4);
        assert_eq!(OpCode::JF.len(), 3);
        assert_eq!(OpCode::ARB.param_count(), 1);
        assert_eq!(Op::new(OpCode::HLT).len(), 1);
        assert_eq!(Op::new(OpCode::EQ).mnemonic(), "EQ");
    }
}
