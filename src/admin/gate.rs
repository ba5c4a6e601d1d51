//! Hidden keystroke gate for the admin sign-in form.
//!
//! The admin page shows nothing until the configured sequence is typed. The
//! gate keeps the last `window` characters typed (lowercased), drops them
//! after `idle_reset` without input, and clears them on any named key such
//! as `Enter` or `Tab`. Once open it stays open and ignores further input.
//!
//! This hides the form from casual visitors; it is not access control.

use crate::config::SiteConfig;
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

/// A key event as delivered by the input source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A printable character
    Char(char),
    /// Any key with a multi-character name (`Enter`, `Shift`, `ArrowUp`...)
    Named(String),
}

#[derive(Debug, Clone)]
pub struct AdminGate {
    sequence: String,
    window: usize,
    idle_reset: Duration,
    typed: VecDeque<char>,
    last_press: Option<Instant>,
    open: bool,
}

impl AdminGate {
    pub fn new(sequence: &str, window: usize, idle_reset: Duration) -> Self {
        Self {
            sequence: sequence.to_lowercase(),
            window,
            idle_reset,
            typed: VecDeque::with_capacity(window),
            last_press: None,
            open: false,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        let admin = &config.admin;
        Self::new(
            &admin.sequence,
            admin.window,
            Duration::from_millis(admin.idle_reset_ms),
        )
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Characters currently remembered.
    pub fn typed(&self) -> String {
        self.typed.iter().collect()
    }

    /// Feed one key pressed at `now`. Returns whether the gate is open.
    pub fn press(&mut self, key: Key, now: Instant) -> bool {
        if self.open {
            return true;
        }

        if let Some(last) = self.last_press
            && now.saturating_duration_since(last) >= self.idle_reset
        {
            self.typed.clear();
        }

        let ch = match key {
            Key::Char(ch) => ch,
            Key::Named(_) => {
                self.typed.clear();
                self.last_press = None;
                return false;
            }
        };

        for lower in ch.to_lowercase() {
            if self.typed.len() == self.window {
                self.typed.pop_front();
            }
            self.typed.push_back(lower);
        }
        self.last_press = Some(now);

        // The whole window must equal the sequence, not just end with it
        self.open = self.typed.iter().copied().eq(self.sequence.chars());
        self.open
    }
}

impl Default for AdminGate {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}
