//! Real OS backend: process launch plus input simulation through `enigo`.

use std::process::{Command, Stdio};

use enigo::{Axis, Direction, Enigo, InputError, Key, Keyboard, Mouse, Settings};
use handkeys_core::dispatch::{MediaKey, OsActions, ZoomDirection};
use handkeys_core::{HandkeysError, Result};

pub struct SystemActions {
    enigo: Enigo,
}

impl SystemActions {
    pub fn new() -> anyhow::Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| anyhow::anyhow!("failed to connect to the input backend: {e}"))?;
        Ok(Self { enigo })
    }
}

fn input_err(e: InputError) -> HandkeysError {
    HandkeysError::Dispatch(e.to_string())
}

impl OsActions for SystemActions {
    fn spawn_detached(&mut self, path: &str) -> Result<()> {
        // Launched apps outlive us; their exit status is never collected.
        Command::new(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|e| HandkeysError::Dispatch(format!("failed to launch '{path}': {e}")))
    }

    fn media_key(&mut self, key: MediaKey) -> Result<()> {
        let key = match key {
            MediaKey::VolumeUp => Key::VolumeUp,
            MediaKey::VolumeDown => Key::VolumeDown,
        };
        self.enigo.key(key, Direction::Click).map_err(input_err)
    }

    fn zoom(&mut self, direction: ZoomDirection) -> Result<()> {
        let ch = match direction {
            ZoomDirection::In => '+',
            ZoomDirection::Out => '-',
        };
        self.enigo
            .key(Key::Control, Direction::Press)
            .map_err(input_err)?;
        let clicked = self.enigo.key(Key::Unicode(ch), Direction::Click);
        // Always let go of Ctrl, even if the click failed.
        let released = self.enigo.key(Key::Control, Direction::Release);
        clicked.and(released).map_err(input_err)
    }

    fn scroll(&mut self, delta: i32) -> Result<()> {
        // enigo scrolls down for positive lengths.
        self.enigo.scroll(-delta, Axis::Vertical).map_err(input_err)
    }
}
