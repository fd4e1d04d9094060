//! Frame pacing
//!
//! The loop runs exactly one simulation tick per frame and then waits for the
//! next frame boundary. Time comes from a `Clock` so tests can swap in a
//! `VirtualClock` and never sleep.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::consts::{MENU_FPS, MINIGAME_FPS};

/// Millisecond time source
pub trait Clock {
    fn now_ms(&self) -> u64;
    /// Block for `ms` milliseconds
    fn sleep_ms(&mut self, ms: u64);
}

/// Wall clock, measured from construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn sleep_ms(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

/// Manually advanced clock. Clones share the same time, so a test can keep a
/// handle while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: Rc<Cell<u64>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    /// Sleeping just moves time forward
    fn sleep_ms(&mut self, ms: u64) {
        self.advance(ms);
    }
}

/// Which frame rate applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockMode {
    /// Menus and text screens
    Menu,
    /// Bonus round physics
    MiniGame,
}

impl ClockMode {
    pub fn target_fps(self) -> u32 {
        match self {
            ClockMode::Menu => MENU_FPS,
            ClockMode::MiniGame => MINIGAME_FPS,
        }
    }

    /// Frame length in microseconds
    pub fn frame_us(self) -> u64 {
        1_000_000 / self.target_fps() as u64
    }
}

/// Fixed-tick frame driver
#[derive(Debug, Clone)]
pub struct SimulationClock {
    mode: ClockMode,
    frame: u64,
    /// Next frame boundary in microseconds
    next_due_us: Option<u64>,
}

impl SimulationClock {
    pub fn new(mode: ClockMode) -> Self {
        Self {
            mode,
            frame: 0,
            next_due_us: None,
        }
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ClockMode) {
        if mode != self.mode {
            log::debug!("Frame rate {} -> {} fps", self.mode.target_fps(), mode.target_fps());
            self.mode = mode;
        }
    }

    /// Frames advanced so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Count one simulated frame
    pub fn advance(&mut self) -> u64 {
        self.frame += 1;
        self.frame
    }

    /// Block until the next frame boundary for the current mode. A late frame
    /// does not sleep and does not try to catch up.
    ///
    /// Boundaries are kept in microseconds so 60 fps stays 60 fps even though
    /// the clock only sleeps in whole milliseconds.
    pub fn wait_for_next_tick(&mut self, clock: &mut dyn Clock) {
        let now_us = clock.now_ms() * 1000;
        let frame_us = self.mode.frame_us();
        let next = match self.next_due_us {
            Some(due) if now_us < due => {
                clock.sleep_ms((due - now_us).div_ceil(1000));
                due + frame_us
            }
            Some(due) => {
                if now_us > due {
                    log::trace!("Frame late by {} us", now_us - due);
                }
                now_us + frame_us
            }
            None => now_us + frame_us,
        };
        self.next_due_us = Some(next);
    }
}
