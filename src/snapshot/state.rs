//! Interpreter state snapshot decoding
//!
//! Unlike the program snapshot, state is re-decoded after every step and never
//! cached: the view must always reflect the engine's latest state.

use serde::Deserialize;

use crate::bridge::errors::DebugError;
use crate::snapshot::{NumKind, ProgramSnapshot};

/// The decoded dynamic state of the interpreter after a step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StateSnapshot {
    /// Opaque ordered coordinates of the active location. By the engine's
    /// convention index 0 is a call-depth marker, index 1 a function index
    /// and index 2 an instruction index, but nothing here depends on the
    /// exact arity.
    pub current_position: Vec<i64>,

    /// The value stack, bottom first.
    #[serde(default)]
    pub value_stack: Vec<StackValue>,
}

/// One tagged value from the engine's value stack.
///
/// Externally tagged on the wire: `{"I32": 5}`, `{"F64": 0.5}`, ...
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum StackValue {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl StackValue {
    pub fn kind(&self) -> NumKind {
        match self {
            StackValue::I32(_) => NumKind::I32,
            StackValue::I64(_) => NumKind::I64,
            StackValue::F32(_) => NumKind::F32,
            StackValue::F64(_) => NumKind::F64,
        }
    }

    pub fn display(&self) -> String {
        match self {
            StackValue::I32(v) => v.to_string(),
            StackValue::I64(v) => v.to_string(),
            StackValue::F32(v) => v.to_string(),
            StackValue::F64(v) => v.to_string(),
        }
    }
}

impl StateSnapshot {
    /// Match `current_position` against the program snapshot.
    ///
    /// Returns the `(function, instruction)` pair to highlight, or `None`
    /// when any coordinate is absent, negative, or out of range. The engine
    /// has no dedicated halt flag: a position that no longer locates inside
    /// the program is the halt signal.
    pub fn locate(&self, program: &ProgramSnapshot) -> Option<(usize, usize)> {
        let func = usize::try_from(*self.current_position.get(1)?).ok()?;
        let instr = usize::try_from(*self.current_position.get(2)?).ok()?;
        program.functions.get(func)?.instructions.get(instr)?;
        Some((func, instr))
    }

    /// The position rendered the way the engine's own harness shows it.
    pub fn position_display(&self) -> String {
        self.current_position
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Decode the engine's state snapshot JSON.
pub fn decode_state(text: &str) -> Result<StateSnapshot, DebugError> {
    serde_json::from_str(text).map_err(|e| DebugError::MalformedSnapshot {
        message: format!("state snapshot: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::decode_program;

    fn one_function_program(instructions: usize) -> ProgramSnapshot {
        let ops: Vec<String> = (0..instructions)
            .map(|_| r#"{"op":"Nop"}"#.to_string())
            .collect();
        let text = format!(
            r#"{{"sections":[{{"section_type":"Code","content":{{"code_blocks":[
                {{"locals":[],"instructions":[{}]}}
            ]}}}}]}}"#,
            ops.join(",")
        );
        decode_program(&text).unwrap()
    }

    #[test]
    fn decodes_all_four_value_kinds() {
        let state = decode_state(
            r#"{"current_position":[0,0,0],"value_stack":[
                {"I32":-7},{"I64":1},{"F32":0.5},{"F64":2.25}
            ]}"#,
        )
        .unwrap();
        let kinds: Vec<_> = state.value_stack.iter().map(|v| v.kind().label()).collect();
        assert_eq!(kinds, ["i32", "i64", "f32", "f64"]);
        assert_eq!(state.value_stack[0], StackValue::I32(-7));
    }

    #[test]
    fn empty_value_stack_is_allowed() {
        let state = decode_state(r#"{"current_position":[0,0,0]}"#).unwrap();
        assert!(state.value_stack.is_empty());
    }

    #[test]
    fn locate_in_range() {
        let program = one_function_program(3);
        let state = decode_state(r#"{"current_position":[0,0,2],"value_stack":[]}"#).unwrap();
        assert_eq!(state.locate(&program), Some((0, 2)));
    }

    #[test]
    fn out_of_range_instruction_does_not_locate() {
        let program = one_function_program(3);
        let state = decode_state(r#"{"current_position":[0,0,3],"value_stack":[]}"#).unwrap();
        assert_eq!(state.locate(&program), None);
    }

    #[test]
    fn short_or_negative_position_does_not_locate() {
        let program = one_function_program(3);
        let short = decode_state(r#"{"current_position":[0],"value_stack":[]}"#).unwrap();
        assert_eq!(short.locate(&program), None);
        let negative = decode_state(r#"{"current_position":[0,-1,0],"value_stack":[]}"#).unwrap();
        assert_eq!(negative.locate(&program), None);
    }

    #[test]
    fn malformed_state_is_rejected() {
        assert!(matches!(
            decode_state("{not json"),
            Err(DebugError::MalformedSnapshot { .. })
        ));
    }
}
