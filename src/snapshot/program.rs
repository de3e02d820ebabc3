//! Program snapshot decoding
//!
//! The engine serializes the guest program as an ordered list of sections,
//! each tagged with a `section_type` and carrying its payload under
//! `content`. Only two kinds matter here: `Code` (required) holds the
//! function blocks, `Export` (optional) names some of them by index. Every
//! other section kind is skipped untouched.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::bridge::errors::DebugError;
use crate::snapshot::NumKind;

/// The decoded static structure of a guest program. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramSnapshot {
    pub functions: Vec<FunctionBlock>,
}

/// One function block from the `Code` section.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBlock {
    /// Declared name from the `Export` section, if any export references
    /// this block's index.
    pub name: Option<String>,
    pub locals: Vec<Local>,
    pub instructions: Vec<Instruction>,
}

impl FunctionBlock {
    /// Name shown in the UI: the exported name, or "function {index}".
    pub fn display_name(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("function {}", index),
        }
    }
}

/// A run of same-typed locals, as declared in the function block header.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Local {
    pub count: u32,
    pub value_type: NumKind,
}

/// One decoded instruction: an operation name plus optional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub op: String,
    pub params: Vec<Param>,
}

/// A single instruction parameter.
///
/// The wire format mixes integers, floats, block labels and nested
/// expressions in one params array, so unrecognized shapes are preserved
/// rather than rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Param {
    pub fn display(&self) -> String {
        match self {
            Param::Int(v) => v.to_string(),
            Param::Float(v) => v.to_string(),
            Param::Text(v) => v.clone(),
            Param::Other(v) => v.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawProgram {
    sections: Vec<RawSection>,
}

#[derive(Deserialize)]
struct RawSection {
    section_type: String,
    #[serde(default)]
    content: serde_json::Value,
}

#[derive(Deserialize)]
struct RawExportContent {
    exports: Vec<RawExport>,
}

// Externally tagged on the wire: {"Function": {"index": 0, "name": "main"}}.
#[derive(Deserialize)]
enum RawExport {
    Function(RawExportRecord),
    Table(RawExportRecord),
    Memory(RawExportRecord),
    Global(RawExportRecord),
}

#[derive(Deserialize)]
struct RawExportRecord {
    name: String,
    index: usize,
}

#[derive(Deserialize)]
struct RawCodeContent {
    code_blocks: Vec<RawCodeBlock>,
}

#[derive(Deserialize)]
struct RawCodeBlock {
    #[serde(default)]
    locals: Vec<Local>,
    instructions: Vec<RawInstruction>,
}

#[derive(Deserialize)]
struct RawInstruction {
    op: String,
    #[serde(default)]
    params: Option<RawParams>,
}

// The engine serializes instructions as an adjacently tagged enum, so a
// single-payload operation carries a bare scalar ({"op":"I32Const",
// "params":41}) while multi-payload operations carry an array. Both
// normalize to a params list.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawParams {
    Many(Vec<Param>),
    One(Param),
}

impl RawParams {
    fn into_vec(self) -> Vec<Param> {
        match self {
            RawParams::Many(params) => params,
            RawParams::One(param) => vec![param],
        }
    }
}

/// Decode the engine's program snapshot JSON.
///
/// Fails with [`DebugError::MalformedSnapshot`] on a parse failure or when no
/// `Code` section is present. A missing `Export` section is fine - every
/// function simply renders anonymously.
pub fn decode_program(text: &str) -> Result<ProgramSnapshot, DebugError> {
    let raw: RawProgram = serde_json::from_str(text).map_err(|e| DebugError::MalformedSnapshot {
        message: format!("program snapshot: {}", e),
    })?;

    let mut names: FxHashMap<usize, String> = FxHashMap::default();
    let mut code: Option<RawCodeContent> = None;

    for section in raw.sections {
        match section.section_type.as_str() {
            "Export" => {
                let content: RawExportContent = serde_json::from_value(section.content)
                    .map_err(|e| DebugError::MalformedSnapshot {
                        message: format!("Export section: {}", e),
                    })?;
                for export in content.exports {
                    if let RawExport::Function(record) = export {
                        names.insert(record.index, record.name);
                    }
                }
            }
            "Code" => {
                let content: RawCodeContent = serde_json::from_value(section.content)
                    .map_err(|e| DebugError::MalformedSnapshot {
                        message: format!("Code section: {}", e),
                    })?;
                code = Some(content);
            }
            _ => {}
        }
    }

    let code = code.ok_or(DebugError::MalformedSnapshot {
        message: "no Code section".to_string(),
    })?;

    let functions = code
        .code_blocks
        .into_iter()
        .enumerate()
        .map(|(index, block)| FunctionBlock {
            name: names.remove(&index),
            locals: block.locals,
            instructions: block
                .instructions
                .into_iter()
                .map(|raw| Instruction {
                    op: raw.op,
                    params: raw.params.map(RawParams::into_vec).unwrap_or_default(),
                })
                .collect(),
        })
        .collect();

    Ok(ProgramSnapshot { functions })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sections_are_skipped() {
        let text = r#"{"sections":[
            {"section_type":"Type","content":{"types":[]}},
            {"section_type":"Code","content":{"code_blocks":[]}}
        ]}"#;
        let program = decode_program(text).unwrap();
        assert!(program.functions.is_empty());
    }

    #[test]
    fn missing_params_decode_empty() {
        let text = r#"{"sections":[{"section_type":"Code","content":{"code_blocks":[
            {"locals":[],"instructions":[{"op":"Nop"}]}
        ]}}]}"#;
        let program = decode_program(text).unwrap();
        assert_eq!(program.functions[0].instructions[0].op, "Nop");
        assert!(program.functions[0].instructions[0].params.is_empty());
    }

    #[test]
    fn scalar_params_decode_as_single_param() {
        let text = r#"{"sections":[{"section_type":"Code","content":{"code_blocks":[
            {"locals":[],"instructions":[
                {"op":"I32Const","params":41},
                {"op":"LocalGet","params":0},
                {"op":"F64Const","params":0.5}
            ]}
        ]}}]}"#;
        let program = decode_program(text).unwrap();
        let instructions = &program.functions[0].instructions;
        assert_eq!(instructions[0].params, vec![Param::Int(41)]);
        assert_eq!(instructions[1].params, vec![Param::Int(0)]);
        assert_eq!(instructions[2].params, vec![Param::Float(0.5)]);
    }

    #[test]
    fn mixed_params_survive_decoding() {
        let text = r#"{"sections":[{"section_type":"Code","content":{"code_blocks":[
            {"locals":[],"instructions":[{"op":"Loop","params":[64,[{"op":"Nop"}]]}]}
        ]}}]}"#;
        let program = decode_program(text).unwrap();
        let params = &program.functions[0].instructions[0].params;
        assert_eq!(params[0], Param::Int(64));
        assert!(matches!(params[1], Param::Other(_)));
    }

    #[test]
    fn non_function_exports_do_not_name_blocks() {
        let text = r#"{"sections":[
            {"section_type":"Export","content":{"exports":[
                {"Memory":{"index":0,"name":"memory"}}
            ]}},
            {"section_type":"Code","content":{"code_blocks":[
                {"locals":[],"instructions":[]}
            ]}}
        ]}"#;
        let program = decode_program(text).unwrap();
        assert_eq!(program.functions[0].name, None);
        assert_eq!(program.functions[0].display_name(0), "function 0");
    }
}
