//! Scripted random source
//!
//! Replays fixed sequences of draws so that engine behaviour can be checked
//! event by event. Each queue repeats its last value once exhausted; an
//! empty queue yields `0.5`, `1.0` and `1.0` respectively.

use crate::application::RandomSource;
use std::collections::VecDeque;

#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    uniforms: VecDeque<f64>,
    exponentials: VecDeque<f64>,
    gammas: VecDeque<f64>,
    last: [Option<f64>; 3],
    draws: usize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uniforms(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.uniforms.extend(values);
        self
    }

    /// Holding times returned regardless of the requested rate
    pub fn with_exponentials(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.exponentials.extend(values);
        self
    }

    /// Gamma draws returned regardless of shape and scale
    pub fn with_gammas(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.gammas.extend(values);
        self
    }

    /// Total number of draws served
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Uniform draws still queued
    pub fn remaining_uniforms(&self) -> usize {
        self.uniforms.len()
    }

    fn next(&mut self, queue: usize, fallback: f64) -> f64 {
        self.draws += 1;
        let value = match queue {
            0 => self.uniforms.pop_front(),
            1 => self.exponentials.pop_front(),
            _ => self.gammas.pop_front(),
        };
        match value {
            Some(v) => {
                self.last[queue] = Some(v);
                v
            }
            None => self.last[queue].unwrap_or(fallback),
        }
    }
}

impl RandomSource for ScriptedSource {
    fn uniform(&mut self) -> f64 {
        self.next(0, 0.5)
    }

    fn exponential(&mut self, _rate: f64) -> f64 {
        self.next(1, 1.0)
    }

    fn gamma(&mut self, _shape: f64, _scale: f64) -> f64 {
        self.next(2, 1.0)
    }
}
