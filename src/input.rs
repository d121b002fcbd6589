// src/input.rs
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use crate::types::{ButtonEdge, StepCounters};

/// Encoder counters and button edges as seen by the acquisition loop.
pub trait ControlInputs {
    fn counters(&self) -> StepCounters;
    /// Edges since the last call, oldest first.
    fn drain_edges(&mut self) -> Vec<ButtonEdge>;
    fn zero_primary(&mut self);
}

/// Counters and an edge queue shared between input devices (writers) and
/// the acquisition loop (single reader).
#[derive(Clone, Default)]
pub struct SharedInputs {
    primary: Arc<AtomicI64>,
    scale: Arc<AtomicI64>,
    cursor: Arc<AtomicI64>,
    edges: Arc<Mutex<VecDeque<ButtonEdge>>>,
}

impl SharedInputs {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn step_primary(&self, delta: i64) {
        self.primary.fetch_add(delta, Ordering::Relaxed);
    }
    pub fn step_scale(&self, delta: i64) {
        self.scale.fetch_add(delta, Ordering::Relaxed);
    }
    pub fn step_cursor(&self, delta: i64) {
        self.cursor.fetch_add(delta, Ordering::Relaxed);
    }
    pub fn press(&self, edge: ButtonEdge) {
        let mut queue = self.edges.lock().unwrap_or_else(|e| e.into_inner());
        queue.push_back(edge);
    }
    /// Maps one key of the console front panel onto the device surface.
    /// Returns false for keys that mean nothing.
    pub fn apply_key(&self, key: char) -> bool {
        match key {
            'm' => self.press(ButtonEdge::ModeAdvance),
            's' => self.press(ButtonEdge::ScaleAxisToggle),
            'c' => self.press(ButtonEdge::CursorToggle),
            '+' => self.step_primary(1),
            '-' => self.step_primary(-1),
            '>' => self.step_scale(1),
            '<' => self.step_scale(-1),
            ']' => self.step_cursor(1),
            '[' => self.step_cursor(-1),
            _ => return false,
        }
        true
    }
}

impl ControlInputs for SharedInputs {
    fn counters(&self) -> StepCounters {
        StepCounters {
            primary: self.primary.load(Ordering::Relaxed),
            scale: self.scale.load(Ordering::Relaxed),
            cursor: self.cursor.load(Ordering::Relaxed),
        }
    }
    fn drain_edges(&mut self) -> Vec<ButtonEdge> {
        let mut queue = self.edges.lock().unwrap_or_else(|e| e.into_inner());
        queue.drain(..).collect()
    }
    fn zero_primary(&mut self) {
        self.primary.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_drive_counters_and_edges() {
        let mut inputs = SharedInputs::new();
        let panel = inputs.clone();
        for key in "++-m>>]c[[s?".chars() {
            panel.apply_key(key);
        }
        assert_eq!(
            inputs.counters(),
            StepCounters { primary: 1, scale: 2, cursor: -1 }
        );
        assert_eq!(
            inputs.drain_edges(),
            vec![ButtonEdge::ModeAdvance, ButtonEdge::CursorToggle, ButtonEdge::ScaleAxisToggle]
        );
        assert!(inputs.drain_edges().is_empty());
        assert!(!panel.apply_key('?'));
    }

    #[test]
    fn zero_primary_leaves_other_counters() {
        let mut inputs = SharedInputs::new();
        inputs.step_primary(7);
        inputs.step_scale(3);
        inputs.zero_primary();
        assert_eq!(inputs.counters().primary, 0);
        assert_eq!(inputs.counters().scale, 3);
    }
}
