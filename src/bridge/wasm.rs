//! wasmtime-backed implementation of the [`Engine`] trait
//!
//! The engine module's buffers for `get_program`/`get_interpreter` may be
//! reused or invalidated by the next exported call, so both introspection
//! methods copy the string out of engine memory before returning. Memory
//! views are likewise never held across calls: engine memory can grow (and
//! move) during any export, so the byte slice is re-acquired from the store
//! every time.

use wasmtime::{Caller, Extern, Linker, Memory, Module, Store, TypedFunc};

use crate::bridge::errors::DebugError;
use crate::bridge::{marshal, Engine};

/// Synchronous callback the engine may invoke (via `env::_log`) at any point
/// during any exported call. Must not call back into the engine and must not
/// block.
pub type LogCallback = Box<dyn FnMut(&str)>;

/// Host-side state carried in the wasmtime store.
struct HostState {
    log: LogCallback,
}

/// A live engine instance plus its typed entry points.
pub struct WasmEngine {
    store: Store<HostState>,
    memory: Memory,
    malloc: TypedFunc<u32, u32>,
    load: TypedFunc<(u32, u32), u32>,
    next_instruction: TypedFunc<(), ()>,
    get_program: TypedFunc<(), u32>,
    get_interpreter: TypedFunc<(), u32>,
}

impl WasmEngine {
    /// Instantiate the engine from its raw module bytes, registering
    /// `log_callback` as the `env::_log` import.
    pub fn instantiate(engine_bytes: &[u8], log_callback: LogCallback) -> Result<Self, DebugError> {
        let engine = wasmtime::Engine::default();

        let module = Module::new(&engine, engine_bytes).map_err(|e| DebugError::Instantiation {
            message: e.to_string(),
        })?;

        let mut store = Store::new(&engine, HostState { log: log_callback });

        let mut linker: Linker<HostState> = Linker::new(&engine);
        linker
            .func_wrap("env", "_log", |mut caller: Caller<'_, HostState>, ptr: u32| {
                // Silently drop messages we cannot marshal; a broken log line
                // must not trap the engine call that emitted it.
                let text = match caller.get_export("memory") {
                    Some(Extern::Memory(memory)) => {
                        let view = memory.data(&caller);
                        marshal::read_cstring(view, ptr as usize)
                            .ok()
                            .map(str::to_string)
                    }
                    _ => None,
                };
                if let Some(text) = text {
                    (caller.data_mut().log)(&text);
                }
            })
            .map_err(|e| DebugError::Instantiation {
                message: e.to_string(),
            })?;

        let instance =
            linker
                .instantiate(&mut store, &module)
                .map_err(|e| DebugError::Instantiation {
                    message: e.to_string(),
                })?;

        let memory =
            instance
                .get_memory(&mut store, "memory")
                .ok_or(DebugError::Instantiation {
                    message: "engine does not export a linear memory".to_string(),
                })?;

        let malloc = typed_export(&instance, &mut store, "malloc")?;
        let load = typed_export(&instance, &mut store, "load")?;
        let next_instruction = typed_export(&instance, &mut store, "next_instruction")?;
        let get_program = typed_export(&instance, &mut store, "get_program")?;
        let get_interpreter = typed_export(&instance, &mut store, "get_interpreter")?;

        Ok(WasmEngine {
            store,
            memory,
            malloc,
            load,
            next_instruction,
            get_program,
            get_interpreter,
        })
    }

    /// Marshal the null-terminated string at `offset` out of engine memory.
    fn read_engine_string(&mut self, offset: u32) -> Result<String, DebugError> {
        let view = self.memory.data(&self.store);
        marshal::read_cstring(view, offset as usize).map(str::to_string)
    }
}

fn typed_export<Params, Results>(
    instance: &wasmtime::Instance,
    store: &mut Store<HostState>,
    name: &str,
) -> Result<TypedFunc<Params, Results>, DebugError>
where
    Params: wasmtime::WasmParams,
    Results: wasmtime::WasmResults,
{
    instance
        .get_typed_func(&mut *store, name)
        .map_err(|e| DebugError::Instantiation {
            message: format!("missing or mistyped export '{}': {}", name, e),
        })
}

impl Engine for WasmEngine {
    fn allocate(&mut self, size: u32) -> Result<u32, DebugError> {
        self.malloc
            .call(&mut self.store, size)
            .map_err(|e| DebugError::Allocation {
                size,
                message: e.to_string(),
            })
    }

    fn write_guest(&mut self, offset: u32, bytes: &[u8]) -> Result<(), DebugError> {
        // Fresh view: the preceding malloc may have grown engine memory.
        let view = self.memory.data_mut(&mut self.store);
        marshal::write_bytes(view, offset as usize, bytes)
    }

    fn load(&mut self, offset: u32, length: u32) -> Result<(), DebugError> {
        let status = self
            .load
            .call(&mut self.store, (offset, length))
            .map_err(|e| DebugError::Load {
                status: 0,
                message: e.to_string(),
            })?;
        if status != 0 {
            return Err(DebugError::Load {
                status,
                message: String::new(),
            });
        }
        Ok(())
    }

    fn step(&mut self) -> Result<(), DebugError> {
        self.next_instruction
            .call(&mut self.store, ())
            .map_err(|e| DebugError::EngineCall {
                entry_point: "next_instruction",
                message: e.to_string(),
            })
    }

    fn introspect_program(&mut self) -> Result<String, DebugError> {
        let ptr = self
            .get_program
            .call(&mut self.store, ())
            .map_err(|e| DebugError::EngineCall {
                entry_point: "get_program",
                message: e.to_string(),
            })?;
        self.read_engine_string(ptr)
    }

    fn introspect_state(&mut self) -> Result<String, DebugError> {
        let ptr = self
            .get_interpreter
            .call(&mut self.store, ())
            .map_err(|e| DebugError::EngineCall {
                entry_point: "get_interpreter",
                message: e.to_string(),
            })?;
        self.read_engine_string(ptr)
    }
}
