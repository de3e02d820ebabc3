// Integration tests for the step controller, driven by a scripted engine

use wasmstep::bridge::{DebugError, Engine};
use wasmstep::session::{new_log_sink, DebugSession, SessionState, StepOutcome};

/// A scripted engine: serves a fixed program snapshot and one state snapshot
/// per step, and counts every entry-point call.
struct MockEngine {
    program_json: String,
    states: Vec<String>,
    cursor: usize,
    reject_load: bool,
    written: Vec<u8>,
    program_calls: usize,
    state_calls: usize,
    step_calls: usize,
}

impl MockEngine {
    fn new(program_json: &str, states: &[&str]) -> Self {
        MockEngine {
            program_json: program_json.to_string(),
            states: states.iter().map(|s| s.to_string()).collect(),
            cursor: 0,
            reject_load: false,
            written: Vec::new(),
            program_calls: 0,
            state_calls: 0,
            step_calls: 0,
        }
    }
}

impl Engine for MockEngine {
    fn allocate(&mut self, size: u32) -> Result<u32, DebugError> {
        self.written = vec![0; size as usize];
        Ok(16)
    }

    fn write_guest(&mut self, offset: u32, bytes: &[u8]) -> Result<(), DebugError> {
        assert_eq!(offset, 16);
        self.written = bytes.to_vec();
        Ok(())
    }

    fn load(&mut self, _offset: u32, _length: u32) -> Result<(), DebugError> {
        if self.reject_load {
            return Err(DebugError::Load {
                status: 1,
                message: "unsupported section".to_string(),
            });
        }
        Ok(())
    }

    fn step(&mut self) -> Result<(), DebugError> {
        self.step_calls += 1;
        self.cursor += 1;
        Ok(())
    }

    fn introspect_program(&mut self) -> Result<String, DebugError> {
        self.program_calls += 1;
        Ok(self.program_json.clone())
    }

    fn introspect_state(&mut self) -> Result<String, DebugError> {
        self.state_calls += 1;
        let index = self.cursor.min(self.states.len() - 1);
        Ok(self.states[index].clone())
    }
}

const PROGRAM: &str = r#"{"sections": [
    {"section_type": "Export", "content": {"exports": [
        {"Function": {"index": 0, "name": "main"}}
    ]}},
    {"section_type": "Code", "content": {"code_blocks": [
        {"locals": [], "instructions": [
            {"op": "I32Const", "params": 1},
            {"op": "I32Const", "params": 2},
            {"op": "I32Add"}
        ]}
    ]}}
]}"#;

fn running_states() -> Vec<&'static str> {
    vec![
        r#"{"current_position": [0, 0, 0], "value_stack": []}"#,
        r#"{"current_position": [0, 0, 1], "value_stack": [{"I32": 1}]}"#,
        r#"{"current_position": [0, 0, 2], "value_stack": [{"I32": 1}, {"I32": 2}]}"#,
        r#"{"current_position": [0], "value_stack": [{"I32": 3}]}"#,
    ]
}

#[test]
fn stepping_advances_monotonically_until_halt() {
    let engine = MockEngine::new(PROGRAM, &running_states());
    let mut session = DebugSession::new(engine, new_log_sink());

    session.load(b"\0asm").expect("load failed");
    assert_eq!(session.state(), SessionState::Loaded);
    assert_eq!(session.highlight(), Some((0, 0)));

    let mut last_instr = 0;
    loop {
        match session.step().expect("step failed") {
            StepOutcome::Stepped => {
                let (_, instr) = session.highlight().expect("running state must locate");
                assert!(instr >= last_instr, "instruction index went backwards");
                last_instr = instr;
            }
            StepOutcome::Halted => break,
        }
    }

    assert_eq!(session.state(), SessionState::Halted);
    assert_eq!(session.highlight(), None);
    // Final value stack survives the halt transition
    assert_eq!(session.latest_state().unwrap().value_stack.len(), 1);
}

#[test]
fn steps_after_halt_are_noops() {
    let engine = MockEngine::new(PROGRAM, &running_states());
    let mut session = DebugSession::new(engine, new_log_sink());
    session.load(b"\0asm").expect("load failed");

    while session.state() != SessionState::Halted {
        session.step().expect("step failed");
    }
    let steps_taken = session.steps();

    assert_eq!(session.step().expect("halted step"), StepOutcome::Halted);
    assert_eq!(session.step().expect("halted step"), StepOutcome::Halted);
    assert_eq!(session.steps(), steps_taken);
}

#[test]
fn program_snapshot_is_decoded_once() {
    let engine = MockEngine::new(PROGRAM, &running_states());
    let mut session = DebugSession::new(engine, new_log_sink());
    session.load(b"\0asm").expect("load failed");

    let first = session.program().expect("program missing").clone();
    let second = session.program().expect("program missing").clone();
    assert_eq!(first, second);

    session.step().expect("step failed");
    session.step().expect("step failed");

    // Only the initial load introspected the program; steps refresh state only
    assert_eq!(session.engine().program_calls, 1);
    assert!(session.engine().state_calls >= 3);
}

#[test]
fn step_before_load_is_not_loaded() {
    let engine = MockEngine::new(PROGRAM, &running_states());
    let mut session = DebugSession::new(engine, new_log_sink());

    assert!(matches!(session.step(), Err(DebugError::NotLoaded)));
    assert_eq!(session.engine().step_calls, 0);
}

#[test]
fn rejected_load_leaves_session_unloaded() {
    let mut engine = MockEngine::new(PROGRAM, &running_states());
    engine.reject_load = true;
    let log = new_log_sink();
    let mut session = DebugSession::new(engine, log.clone());

    assert!(matches!(
        session.load(b"\0asm"),
        Err(DebugError::Load { status: 1, .. })
    ));
    assert_eq!(session.state(), SessionState::Unloaded);
    assert!(session.program().is_none());
    assert!(session.latest_state().is_none());

    // The failure reached the diagnostic surface
    assert!(log.borrow().iter().any(|line| line.contains("rejected")));
}

#[test]
fn malformed_state_preserves_previous_view() {
    let states = vec![
        r#"{"current_position": [0, 0, 0], "value_stack": []}"#,
        r#"{"current_position": [0, 0, 1], "value_stack": [{"I32": 1}]}"#,
        r#"{"current_position": "#,
    ];
    let engine = MockEngine::new(PROGRAM, &states);
    let mut session = DebugSession::new(engine, new_log_sink());
    session.load(b"\0asm").expect("load failed");

    session.step().expect("first step failed");
    let before = session.latest_state().expect("state missing").clone();

    assert!(matches!(
        session.step(),
        Err(DebugError::MalformedSnapshot { .. })
    ));
    assert_eq!(session.latest_state().expect("state missing"), &before);
    assert_eq!(session.state(), SessionState::Failed);
}

#[test]
fn failed_session_never_reenters_the_engine() {
    let states = vec![
        r#"{"current_position": [0, 0, 0], "value_stack": []}"#,
        r#"{"current_position": "#,
    ];
    let engine = MockEngine::new(PROGRAM, &states);
    let mut session = DebugSession::new(engine, new_log_sink());
    session.load(b"\0asm").expect("load failed");

    assert!(session.step().is_err());
    assert_eq!(session.state(), SessionState::Failed);

    let step_calls = session.engine().step_calls;
    let state_calls = session.engine().state_calls;

    // Terminal state: further triggers are no-ops, no engine calls at all
    assert_eq!(session.step().expect("failed step"), StepOutcome::Halted);
    assert_eq!(session.step().expect("failed step"), StepOutcome::Halted);
    assert_eq!(session.engine().step_calls, step_calls);
    assert_eq!(session.engine().state_calls, state_calls);
}

#[test]
fn guest_bytes_reach_engine_memory() {
    let engine = MockEngine::new(PROGRAM, &running_states());
    let mut session = DebugSession::new(engine, new_log_sink());

    session.load(b"\0asm\x01\x00\x00\x00").expect("load failed");
    assert_eq!(session.engine().written, b"\0asm\x01\x00\x00\x00");
}
