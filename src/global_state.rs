use leptos::*;
use once_cell::sync::OnceCell;

/// Lines kept by the debug console
pub const MAX_LOG_LINES: usize = 100;

/// Text under the chart
#[derive(Clone, Debug, PartialEq)]
pub enum StatusLine {
    Info(String),
    Error(String),
}

impl StatusLine {
    pub fn text(&self) -> &str {
        match self {
            StatusLine::Info(text) | StatusLine::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatusLine::Error(_))
    }
}

pub struct Globals {
    pub log_lines: RwSignal<Vec<String>>,
    pub log_paused: RwSignal<bool>,
    pub status: RwSignal<StatusLine>,
    pub loading: RwSignal<bool>,
}

static GLOBALS: OnceCell<Globals> = OnceCell::new();

pub fn globals() -> &'static Globals {
    GLOBALS.get_or_init(|| Globals {
        log_lines: create_rw_signal(Vec::new()),
        log_paused: create_rw_signal(false),
        status: create_rw_signal(StatusLine::Info("Loading...".to_string())),
        loading: create_rw_signal(false),
    })
}

pub fn log_lines() -> RwSignal<Vec<String>> {
    globals().log_lines
}

pub fn log_paused() -> RwSignal<bool> {
    globals().log_paused
}

pub fn status_line() -> RwSignal<StatusLine> {
    globals().status
}

pub fn loading() -> RwSignal<bool> {
    globals().loading
}

/// Appends a console line unless paused, dropping the oldest past the cap
pub fn push_log_line(line: String) {
    if log_paused().get_untracked() {
        return;
    }
    log_lines().update(|lines| {
        lines.push(line);
        if lines.len() > MAX_LOG_LINES {
            let overflow = lines.len() - MAX_LOG_LINES;
            lines.drain(..overflow);
        }
    });
}
