//! Interactive one-image-at-a-time menu.
//!
//! ```text
//! Options:
//!   'd' to display an image
//!   't' to generate a thumbnail
//!   'r' to rotate an image
//!   'q' to quit
//! ```
//!
//! Every action launches its child and returns to the menu straight away;
//! the menu never blocks on a viewer or a conversion. Conversions that have
//! finished are reaped (and failures reported) each time the menu is shown.
//! Quitting, or closing the input, terminates open viewers and waits for
//! conversions that are still running.

use crate::prompt::{LinePrompter, PromptError};
use crate::tools::{ImageTool, Job, ResizeParams, RotateParams, Rotation, Scale};
use std::io::{BufRead, Write};
use std::path::PathBuf;

const MENU: &str = "Options:
  'd' to display an image
  't' to generate a thumbnail
  'r' to rotate an image
  'q' to quit";

/// Children launched from the menu.
#[derive(Default)]
pub struct MenuSession {
    viewers: Vec<Job>,
    conversions: Vec<Job>,
    failures: usize,
}

impl MenuSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_viewers(&self) -> usize {
        self.viewers.len()
    }

    pub fn running_conversions(&self) -> usize {
        self.conversions.len()
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Reap conversions that have exited, returning a message per failure.
    fn reap(&mut self) -> Vec<String> {
        let mut messages = Vec::new();
        let mut still_running = Vec::new();
        for mut job in self.conversions.drain(..) {
            match job.try_wait() {
                Ok(Some(status)) if status.success() => {
                    log::debug!("{} finished", job.label());
                }
                Ok(Some(status)) => {
                    self.failures += 1;
                    messages.push(format!("{} failed ({status})", job.label()));
                }
                Ok(None) => still_running.push(job),
                Err(e) => {
                    self.failures += 1;
                    messages.push(e.to_string());
                }
            }
        }
        self.conversions = still_running;
        messages
    }

    /// Terminate viewers and wait for conversions.
    fn close(&mut self) -> Vec<String> {
        let mut messages = Vec::new();
        for viewer in self.viewers.drain(..) {
            if let Err(e) = viewer.terminate() {
                messages.push(e.to_string());
            }
        }
        for job in self.conversions.drain(..) {
            if let Err(e) = job.wait() {
                self.failures += 1;
                messages.push(e.to_string());
            }
        }
        messages
    }
}

/// Run the menu until `q` or end of input.
pub fn run<T, R, W>(
    tool: &T,
    prompter: &mut LinePrompter<R, W>,
    thumbnail_scale: Scale,
) -> Result<MenuSession, PromptError>
where
    T: ImageTool + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut session = MenuSession::new();
    let result = menu_loop(tool, prompter, thumbnail_scale, &mut session);
    for message in session.close() {
        prompter.say(&message)?;
    }
    result.map(|()| session)
}

fn menu_loop<T, R, W>(
    tool: &T,
    prompter: &mut LinePrompter<R, W>,
    thumbnail_scale: Scale,
    session: &mut MenuSession,
) -> Result<(), PromptError>
where
    T: ImageTool + ?Sized,
    R: BufRead,
    W: Write,
{
    loop {
        for message in session.reap() {
            prompter.say(&message)?;
        }
        prompter.say(MENU)?;
        let choice = match prompter.ask(">>>") {
            Ok(choice) => choice,
            Err(PromptError::Closed) => return Ok(()),
            Err(e) => return Err(e),
        };

        match choice.trim().chars().next() {
            Some('d') => {
                let image = prompter.ask("which image would you like to display")?;
                match tool.display(&PathBuf::from(image)).spawn("display") {
                    Ok(job) => session.viewers.push(job),
                    Err(e) => prompter.say(&e.to_string())?,
                }
            }
            Some('t') => {
                let source = prompter.ask("which image would you like to generate a thumbnail for")?;
                let output = prompter.ask("where would you like the thumbnail stored")?;
                let invocation = tool.resize(&ResizeParams {
                    source: source.into(),
                    output: output.into(),
                    scale: thumbnail_scale,
                });
                match invocation.spawn("thumbnail") {
                    Ok(job) => session.conversions.push(job),
                    Err(e) => prompter.say(&e.to_string())?,
                }
            }
            Some('r') => {
                let source = prompter.ask("which photo would you like to rotate")?;
                let direction = prompter.ask("which direction would you like to rotate the image [l/r]")?;
                let output = prompter.ask("where would you like the rotated image stored")?;
                let invocation = tool.rotate(&RotateParams {
                    source: source.into(),
                    output: output.into(),
                    rotation: Rotation::from_answer(&direction).unwrap_or(Rotation::Right),
                });
                match invocation.spawn("rotate") {
                    Ok(job) => session.conversions.push(job),
                    Err(e) => prompter.say(&e.to_string())?,
                }
            }
            Some('q') => {
                prompter.say("Leaving album program")?;
                return Ok(());
            }
            _ => prompter.say("unknown option")?,
        }
    }
}
