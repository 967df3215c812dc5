//! Outside-world seams: dialogs, prompts, output location, "open file".
//!
//! The core only talks to these traits. The CLI implements them over the
//! terminal; tests script them.

use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

use crate::models::{HexColor, LabelType};

/// Chooses the files for one "select" action.
pub trait FilePicker {
    fn pick_files(&mut self, label_type: LabelType) -> Vec<PathBuf>;
}

/// Asks for an order's color. `None` leaves the order uncolored.
pub trait ColorPicker {
    fn pick_color(&mut self, order_name: &str, current: Option<HexColor>) -> Option<HexColor>;
}

/// Asks the operator to classify a file whose name carries no marker.
/// `None` means "none": the file is skipped.
pub trait TypePrompt {
    fn classify(&mut self, file_name: &str) -> Option<LabelType>;
}

/// Decides where finished documents go.
pub trait OutputDirResolver {
    fn output_dir(&self) -> io::Result<PathBuf>;
}

/// Shows a finished document to the operator.
pub trait FileOpener {
    fn open(&self, path: &Path) -> io::Result<()>;
}

/// Always the same directory (settings or `--out`).
#[derive(Debug, Clone)]
pub struct FixedDir(pub PathBuf);

impl OutputDirResolver for FixedDir {
    fn output_dir(&self) -> io::Result<PathBuf> {
        Ok(self.0.clone())
    }
}

/// Hands the file to the desktop's default viewer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl FileOpener for SystemOpener {
    fn open(&self, path: &Path) -> io::Result<()> {
        #[cfg(target_os = "windows")]
        {
            std::process::Command::new("explorer").arg(path).spawn()?;
        }
        #[cfg(target_os = "macos")]
        {
            std::process::Command::new("open").arg(path).spawn()?;
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            std::process::Command::new("xdg-open").arg(path).spawn()?;
        }
        tracing::debug!(path = %path.display(), "Opened document");
        Ok(())
    }
}

/// Files given up front, e.g. on the command line.
#[derive(Debug, Clone, Default)]
pub struct PresetFiles {
    pub envelopes: Vec<PathBuf>,
    pub letters: Vec<PathBuf>,
}

impl FilePicker for PresetFiles {
    fn pick_files(&mut self, label_type: LabelType) -> Vec<PathBuf> {
        match label_type {
            LabelType::Envelope => std::mem::take(&mut self.envelopes),
            LabelType::Card => std::mem::take(&mut self.letters),
        }
    }
}

/// Stdin, pulled one line at a time. Several prompts can each hold one
/// without a prompt buffering lines meant for another.
#[derive(Debug, Default)]
pub struct StdinLines {
    line: Vec<u8>,
    pos: usize,
}

impl Read for StdinLines {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let n = {
            let available = self.fill_buf()?;
            let n = available.len().min(out.len());
            out[..n].copy_from_slice(&available[..n]);
            n
        };
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for StdinLines {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.line.len() {
            let mut line = String::new();
            io::stdin().read_line(&mut line)?;
            self.line = line.into_bytes();
            self.pos = 0;
        }
        Ok(&self.line[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.line.len());
    }
}

/// Line-based prompts over any reader/writer pair (stdin/stderr in the CLI).
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<StdinLines, io::Stderr> {
    /// Ask on stderr, read answers from stdin.
    pub fn stdio() -> Self {
        Self::new(StdinLines::default(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// `None` on EOF or a broken terminal.
    fn ask(&mut self, question: &str) -> Option<String> {
        write!(self.output, "{question}").ok()?;
        self.output.flush().ok()?;
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl<R: BufRead, W: Write> TypePrompt for TerminalPrompt<R, W> {
    fn classify(&mut self, file_name: &str) -> Option<LabelType> {
        let question = format!("Is '{file_name}' Envelopes or Letters? [envelopes/letters/none]: ");
        loop {
            let answer = self.ask(&question)?;
            if answer.eq_ignore_ascii_case("none") || answer.is_empty() {
                return None;
            }
            if let Some(label_type) = LabelType::from_answer(&answer) {
                return Some(label_type);
            }
            // Unrecognised answers are asked again.
        }
    }
}

impl<R: BufRead, W: Write> ColorPicker for TerminalPrompt<R, W> {
    fn pick_color(&mut self, order_name: &str, current: Option<HexColor>) -> Option<HexColor> {
        let hint = current.map(|c| format!(" (current {c})")).unwrap_or_default();
        let question = format!("Color for '{order_name}'{hint} as RRGGBB, blank to skip: ");
        loop {
            let answer = self.ask(&question)?;
            if answer.is_empty() {
                return None;
            }
            match answer.parse::<HexColor>() {
                Ok(color) => return Some(color),
                Err(e) => {
                    let _ = writeln!(self.output, "{e}");
                }
            }
        }
    }
}
