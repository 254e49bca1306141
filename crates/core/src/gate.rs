//! Action gate - turns held input channels into discrete, rate-limited actions
//!
//! Four independent channels (horizontal, down, rotate, hard drop) each own a
//! countdown timer that starts at the channel's interval. Every tick each
//! timer loses `dt`; when it drops below zero it is rearmed to its interval
//! and the channel's current input is sampled. A held key therefore repeats
//! once per interval, and a tap between samples is missed.

use arrayvec::ArrayVec;
use tetr_types::{GateIntervals, InputSnapshot, PieceAction};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelTimer {
    remaining: f32,
    interval: f32,
}

impl ChannelTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            remaining: interval,
            interval,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Count down; true when the timer fired (and was rearmed) this tick
    #[inline]
    pub fn advance(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        if self.remaining < 0.0 {
            self.remaining = self.interval;
            true
        } else {
            false
        }
    }

    pub fn rearm(&mut self) {
        self.remaining = self.interval;
    }
}

/// Discrete actions released by the gate for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GatedActions {
    /// -1 left, 1 right, 0 none
    pub horizontal: i32,
    pub soft_drop: bool,
    pub rotate: bool,
    pub hard_drop: bool,
}

impl GatedActions {
    pub fn is_empty(&self) -> bool {
        self.horizontal == 0 && !self.soft_drop && !self.rotate && !self.hard_drop
    }

    /// Actions in the order the engine applies them
    pub fn actions(&self) -> ArrayVec<PieceAction, 4> {
        let mut out = ArrayVec::new();
        if self.rotate {
            out.push(PieceAction::Rotate);
        }
        match self.horizontal.signum() {
            -1 => out.push(PieceAction::MoveLeft),
            1 => out.push(PieceAction::MoveRight),
            _ => {}
        }
        if self.soft_drop {
            out.push(PieceAction::SoftDrop);
        }
        if self.hard_drop {
            out.push(PieceAction::HardDrop);
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct ActionGate {
    horizontal: ChannelTimer,
    down: ChannelTimer,
    rotate: ChannelTimer,
    hard_drop: ChannelTimer,
}

impl ActionGate {
    pub fn new(intervals: GateIntervals) -> Self {
        Self {
            horizontal: ChannelTimer::new(intervals.horizontal),
            down: ChannelTimer::new(intervals.down),
            rotate: ChannelTimer::new(intervals.rotate),
            hard_drop: ChannelTimer::new(intervals.hard_drop),
        }
    }

    pub fn horizontal(&self) -> &ChannelTimer {
        &self.horizontal
    }

    pub fn down(&self) -> &ChannelTimer {
        &self.down
    }

    pub fn rotate(&self) -> &ChannelTimer {
        &self.rotate
    }

    pub fn hard_drop(&self) -> &ChannelTimer {
        &self.hard_drop
    }

    /// Advance every channel by `dt` and sample the ones that fired
    pub fn update(&mut self, dt: f32, input: &InputSnapshot) -> GatedActions {
        let mut out = GatedActions::default();

        if self.horizontal.advance(dt) {
            let right = input.is_active(PieceAction::MoveRight) as i32;
            let left = input.is_active(PieceAction::MoveLeft) as i32;
            out.horizontal = right - left;
        }
        if self.down.advance(dt) {
            out.soft_drop = input.is_active(PieceAction::SoftDrop);
        }
        if self.rotate.advance(dt) {
            out.rotate = input.is_active(PieceAction::Rotate);
        }
        if self.hard_drop.advance(dt) {
            out.hard_drop = input.is_active(PieceAction::HardDrop);
        }

        out
    }

    /// Rearm every channel to its full interval
    pub fn reset(&mut self) {
        self.horizontal.rearm();
        self.down.rearm();
        self.rotate.rearm();
        self.hard_drop.rearm();
    }
}
