//! Vellum entrypoint: terminal setup, logging, and the synchronous key
//! loop. One key is decoded, fully dispatched, and one redisplay pass made
//! before the next key is read; the blocking read is the only suspension
//! point in the process.

use anyhow::Result;
use clap::Parser;
use core_actions::{BufferEntry, Editor};
use core_config::Config;
use core_input::{KeyDecoder, StdinBytes};
use core_render::{compose_status, format_status, Rect, StatusContext, Viewport, Writer};
use core_terminal::{CrosstermBackend, TerminalBackend, TerminalGuard};
use core_text::TextBuffer;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

const STATUS_ROWS: u16 = 1;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "vellum", version, about = "Vellum text editor")]
struct Args {
    /// Path to open at startup (UTF-8 text). Omitted: an unnamed empty
    /// buffer.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `vellum.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    /// File logging; the terminal is the UI, so nothing may write to it.
    fn configure_logging(&mut self) {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("vellum.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }
        let file_appender = tracing_appender::rolling::never(log_dir, "vellum.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn bootstrap_editor(args: &Args, config: &Config) -> Result<Editor> {
    let mut editor = match args.path.clone() {
        Some(path) => Editor::open(path)?,
        None => Editor::new(BufferEntry {
            buffer: TextBuffer::new("[No Name]"),
            path: None,
        }),
    };
    editor.buffer_mut().set_undo_capacity(config.undo.history_max);
    Ok(editor)
}

fn text_box(rows: u16, cols: u16) -> Rect {
    Rect::new(0, 0, rows.saturating_sub(STATUS_ROWS), cols)
}

fn run_loop(editor: &mut Editor, config: &Config, terminal: &TerminalGuard<'_>) -> Result<()> {
    let (mut rows, mut cols) = terminal.size()?;
    let new_viewport = |rows: u16, cols: u16| {
        Viewport::with_options(
            text_box(rows, cols),
            config.editor.tab_width,
            config.scroll.horizontal_stride,
        )
    };
    let mut viewports: Vec<Viewport> = (0..editor.buffers().len())
        .map(|_| new_viewport(rows, cols))
        .collect();
    let mut writer = Writer::new();
    let mut keys = KeyDecoder::new(StdinBytes::new());

    loop {
        // No event stream carries resizes here; the size is polled once per
        // turn and every view rebound when it moved.
        let (r, c) = terminal.size()?;
        if (r, c) != (rows, cols) {
            (rows, cols) = (r, c);
            for vp in &mut viewports {
                vp.rebind(text_box(rows, cols));
            }
            info!(target: "runtime", rows, cols, "terminal resized");
        }
        while viewports.len() < editor.buffers().len() {
            viewports.push(new_viewport(rows, cols));
        }

        let idx = editor.buffers().current_index();
        let buf = editor.buffer();
        let cursor = buf.cursor();
        let status = format_status(&compose_status(&StatusContext {
            name: &buf.name,
            dirty: buf.dirty,
            line: cursor.line,
            col: cursor.col,
            line_count: buf.line_count(),
            message: editor.message(),
        }));
        viewports[idx].refresh(buf, &status, &mut writer)?;

        let Some(key) = keys.next_key()? else {
            info!(target: "runtime", "input stream closed");
            return Ok(());
        };
        let page = viewports[idx].rect().height as usize;
        let out = editor.dispatch(key, page);
        if out.repaint {
            viewports[editor.buffers().current_index()].mark_dirty();
        }
        if out.switched {
            viewports[editor.buffers().current_index()].mark_dirty();
        }
        if out.quit {
            info!(target: "runtime", "shutdown requested");
            return Ok(());
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging();
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let config = core_config::load_from(args.config.clone())?;
    let mut editor = bootstrap_editor(&args, &config)?;

    startup.backend.set_title("Vellum")?;
    let guard = startup.backend.enter_guard()?;
    let result = run_loop(&mut editor, &config, &guard);
    drop(guard);
    if let Err(err) = &result {
        error!(target: "runtime", %err, "exited with error");
    }
    result
}
