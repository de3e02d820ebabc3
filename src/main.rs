// wasmstep: live step-debugger for guest programs in a sandboxed wasm engine

mod bridge;
mod fetch;
mod session;
mod snapshot;
mod ui;

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use bridge::WasmEngine;
use session::DebugSession;
use ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        let program_name = args.first().map(|s| s.as_str()).unwrap_or("wasmstep");
        eprintln!("Error: Missing arguments");
        eprintln!();
        eprintln!("Usage: {} <engine> <guest>", program_name);
        eprintln!();
        eprintln!("  <engine>  The interpreter engine wasm module (path or http(s) URL)");
        eprintln!("  <guest>   The guest program to debug (path or http(s) URL)");
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} simulator.wasm program.wasm", program_name);
        std::process::exit(1);
    }

    let engine_source = &args[1];
    let guest_source = &args[2];

    eprintln!("Fetching engine from {}...", engine_source);
    let engine_bytes = fetch::fetch(engine_source)?;
    eprintln!("Fetching guest program from {}...", guest_source);
    let guest_bytes = fetch::fetch(guest_source)?;

    // One log sink feeds the log pane: engine _log output and bridge errors
    let log = session::new_log_sink();

    let callback_log = log.clone();
    let engine = WasmEngine::instantiate(
        &engine_bytes,
        Box::new(move |msg| callback_log.borrow_mut().push(msg.to_string())),
    )?;

    let mut debug_session = DebugSession::new(engine, log.clone());

    // A rejected guest program is still shown: the session stays Unloaded and
    // the load failure is visible in the log pane.
    let load_status = match debug_session.load(&guest_bytes) {
        Ok(()) => "Guest program loaded - press → to step".to_string(),
        Err(e) => format!("Load failed: {}", e),
    };

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(debug_session, log);
    app.status_message = load_status;
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
