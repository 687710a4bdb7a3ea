use std::collections::VecDeque;

use anyhow::{anyhow, Result};

use crate::detect::detector::{Detection, Detector};
use crate::detect::extractor::{LineExtractor, RawLine};
use crate::frame::Frame;

enum Step<T> {
    Emit(T),
    Fail(String),
}

/// Deterministic detector fake: replays queued per-tick outputs in order.
/// Once the script runs dry, every further call returns an empty scene.
#[derive(Default)]
pub struct ScriptedDetector {
    script: VecDeque<Step<Vec<Detection>>>,
    calls: u64,
}

impl ScriptedDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one tick's worth of detections.
    pub fn push_frame(&mut self, detections: Vec<Detection>) {
        self.script.push_back(Step::Emit(detections));
    }

    /// Queue a failing tick.
    pub fn push_failure(&mut self, message: impl Into<String>) {
        self.script.push_back(Step::Fail(message.into()));
    }

    /// Number of times `detect` has been invoked.
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl Detector for ScriptedDetector {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>> {
        self.calls += 1;
        match self.script.pop_front() {
            Some(Step::Emit(detections)) => Ok(detections),
            Some(Step::Fail(message)) => Err(anyhow!("{message}")),
            None => Ok(vec![]),
        }
    }
}

/// Deterministic extractor fake, same replay contract as [`ScriptedDetector`].
#[derive(Default)]
pub struct ScriptedExtractor {
    script: VecDeque<Step<Vec<RawLine>>>,
    calls: u64,
}

impl ScriptedExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_frame(&mut self, lines: Vec<RawLine>) {
        self.script.push_back(Step::Emit(lines));
    }

    pub fn push_failure(&mut self, message: impl Into<String>) {
        self.script.push_back(Step::Fail(message.into()));
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl LineExtractor for ScriptedExtractor {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn extract_lines(&mut self, _frame: &Frame) -> Result<Vec<RawLine>> {
        self.calls += 1;
        match self.script.pop_front() {
            Some(Step::Emit(lines)) => Ok(lines),
            Some(Step::Fail(message)) => Err(anyhow!("{message}")),
            None => Ok(vec![]),
        }
    }
}
