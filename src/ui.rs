// UI layer: console rendering, the progress spinner and the token prompt.
// Handlers never write to stdout directly; they go through `Console` and
// `Progress` so tests can capture output and skip the animation.

use crate::error::{GitupError, Result};
use crossterm::style::{style, Color, Stylize};
use crossterm::tty::IsTty;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);
// The last char is shown once the spinner finishes.
const FRAMES: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ";

/// Progress feedback around a remote call.
pub trait Progress {
    fn start(&mut self, label: &str);
    fn stop(&mut self, final_message: Option<&str>);
}

/// Animated spinner on a terminal, one static line otherwise.
pub struct Spinner {
    bar: Option<ProgressBar>,
    interactive: bool,
    color: bool,
}

impl Spinner {
    /// indicatif draws on stderr, so that is the stream probed.
    pub fn new(color: bool) -> Self {
        Self::with_interactive(std::io::stderr().is_tty(), color)
    }

    pub fn with_interactive(interactive: bool, color: bool) -> Self {
        Spinner {
            bar: None,
            interactive,
            color,
        }
    }
}

impl Progress for Spinner {
    fn start(&mut self, label: &str) {
        tracing::debug!(label, "progress start");
        if !self.interactive {
            println!("{label}");
            return;
        }
        if self.bar.is_some() {
            return;
        }

        let template = if self.color {
            "{spinner:.cyan} {msg}"
        } else {
            "{spinner} {msg}"
        };
        let spinner_style = ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(FRAMES);

        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style);
        bar.set_message(label.to_string());
        bar.enable_steady_tick(TICK);
        self.bar = Some(bar);
    }

    fn stop(&mut self, final_message: Option<&str>) {
        tracing::debug!(?final_message, "progress stop");
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        if let Some(message) = final_message {
            println!("{message}");
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Progress reporter that shows nothing.
#[derive(Debug, Default)]
pub struct Silent;

impl Progress for Silent {
    fn start(&mut self, label: &str) {
        tracing::debug!(label, "progress start");
    }

    fn stop(&mut self, _final_message: Option<&str>) {}
}

enum Sink {
    Stdout,
    Buffer(Vec<u8>),
}

/// User-facing output, colored unless `NO_COLOR` is set or stdout is not
/// a terminal.
pub struct Console {
    sink: Sink,
    color: bool,
}

impl Console {
    pub fn stdout() -> Self {
        Console {
            sink: Sink::Stdout,
            color: color_enabled(),
        }
    }

    /// Keep output in memory, uncolored.
    pub fn capture() -> Self {
        Console {
            sink: Sink::Buffer(Vec::new()),
            color: false,
        }
    }

    /// Everything written so far to a capturing console.
    pub fn captured(&self) -> String {
        match &self.sink {
            Sink::Buffer(buf) => String::from_utf8_lossy(buf).into_owned(),
            Sink::Stdout => String::new(),
        }
    }

    pub fn color(&self) -> bool {
        self.color
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        if self.color {
            style(text).bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn plain(&mut self, text: &str) {
        match &mut self.sink {
            Sink::Stdout => println!("{text}"),
            // Writing to a Vec cannot fail.
            Sink::Buffer(buf) => {
                let _ = writeln!(buf, "{text}");
            }
        }
    }

    pub fn error(&mut self, message: &str) {
        let line = self.paint(&format!("gitup ERR! {message}"), Color::Red);
        self.plain(&line);
    }

    pub fn warn(&mut self, message: &str) {
        let line = self.paint(&format!("gitup WARN {message}"), Color::Yellow);
        self.plain(&line);
    }

    pub fn success(&mut self, message: &str) {
        let line = self.paint(message, Color::Green);
        self.plain(&line);
    }

    pub fn info(&mut self, message: &str) {
        let line = self.paint(message, Color::Cyan);
        self.plain(&line);
    }

    pub fn dim(&mut self, message: &str) {
        let line = if self.color {
            style(message).dim().to_string()
        } else {
            message.to_string()
        };
        self.plain(&line);
    }

    /// Print an error followed by its remediation hints.
    pub fn report(&mut self, err: &GitupError) {
        self.error(&err.to_string());
        for hint in err.hints() {
            self.plain(&hint);
        }
    }
}

/// `NO_COLOR` set to anything non-empty, or a non-terminal stdout, turns
/// colors off.
pub fn color_enabled() -> bool {
    color_enabled_from(std::env::var_os("NO_COLOR"), std::io::stdout().is_tty())
}

pub fn color_enabled_from(no_color: Option<OsString>, is_tty: bool) -> bool {
    let no_color = no_color.is_some_and(|v| !v.is_empty());
    !no_color && is_tty
}

/// Ask for a token. `None` means the user cancelled with Ctrl-C, which the
/// key-by-key prompt reports as an interrupted read.
///
/// Piped input is read as a plain line so the command can be scripted.
pub fn prompt_token() -> Result<Option<String>> {
    if !std::io::stdin().is_tty() {
        let mut line = String::new();
        let read = std::io::stdin()
            .read_line(&mut line)
            .map_err(|e| GitupError::io("<stdin>", e))?;
        return Ok((read > 0).then(|| line.trim().to_string()));
    }

    let answer: std::io::Result<String> = Input::new()
        .with_prompt("GitHub token")
        .allow_empty(true)
        .interact_text();
    match answer {
        Ok(token) => Ok(Some(token.trim().to_string())),
        Err(e) if e.kind() == ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(GitupError::io("<stdin>", e)),
    }
}
