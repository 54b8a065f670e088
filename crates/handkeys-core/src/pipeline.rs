//! The per-frame acquisition loop.
//!
//! Each frame runs to completion before the next is requested:
//! capture → detect → classify → table lookup → debounce → dispatch → render.
//! Dispatch produces audit records; the ring buffer that keeps them for
//! display belongs to the render side of the loop.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::audit::{AuditLog, AuditRecord};
use crate::classifier::Classifier;
use crate::config::Config;
use crate::dispatch::{Dispatcher, OsActions};
use crate::gesture::GestureName;
use crate::landmark::Hand;
use crate::source::{CapturedFrame, FrameSource, LandmarkDetector};
use crate::store::GestureTable;
use crate::trigger::{self, TriggerState};

// ---------------------------------------------------------------------------
// Render boundary
// ---------------------------------------------------------------------------

/// What happened on one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    /// 1-based frame counter.
    pub frame: u64,
    pub timestamp: f64,
    pub hands: usize,
    /// The configured gesture selected this frame, fired or not.
    pub gesture: Option<GestureName>,
    /// Present when the debounce gate let the gesture through.
    pub record: Option<AuditRecord>,
}

pub trait Overlay {
    fn render(&mut self, report: &FrameReport, log: &AuditLog);
}

/// Renders nothing.
pub struct NoOverlay;

impl Overlay for NoOverlay {
    fn render(&mut self, _report: &FrameReport, _log: &AuditLog) {}
}

// ---------------------------------------------------------------------------
// RunSummary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StopReason {
    /// The stop flag was raised.
    Quit,
    EndOfStream,
    /// The capture source failed; the loop shut down cleanly.
    CaptureFailed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub fired: u64,
    /// Frames with a configured gesture held back by the debounce gate.
    pub suppressed: u64,
    pub stop: StopReason,
    /// The records still in the overlay log when the loop ended.
    pub recent: Vec<AuditRecord>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

pub struct Pipeline<A> {
    classifier: Classifier,
    table: GestureTable,
    trigger: TriggerState,
    debounce_delay: f64,
    log_lines: usize,
    dispatcher: Dispatcher<A>,
    frames: u64,
    fired: u64,
    suppressed: u64,
}

impl<A: OsActions> Pipeline<A> {
    /// `table` is read once here; later edits to the store are not seen.
    pub fn new(table: GestureTable, config: &Config, os: A) -> Self {
        Self {
            classifier: Classifier::default(),
            table,
            trigger: TriggerState::default(),
            debounce_delay: config.debounce_delay_secs,
            log_lines: config.overlay_log_lines,
            dispatcher: Dispatcher::new(os, config.scroll_amount),
            frames: 0,
            fired: 0,
            suppressed: 0,
        }
    }

    /// Run one frame's worth of logic on already-detected hands.
    pub fn step(&mut self, now: f64, hands: &[Hand]) -> FrameReport {
        self.frames += 1;
        let gesture = self.classifier.select_gesture(hands, &self.table);

        let (next, fire) = trigger::gate(self.trigger, gesture, now, self.debounce_delay);
        self.trigger = next;

        let record = match gesture {
            Some(g) if fire => self.table.get(&g).map(|action| {
                self.fired += 1;
                self.dispatcher.fire(g, action)
            }),
            Some(g) => {
                self.suppressed += 1;
                tracing::trace!(gesture = %g, "debounced");
                None
            }
            None => None,
        };

        FrameReport {
            frame: self.frames,
            timestamp: now,
            hands: hands.len(),
            gesture,
            record,
        }
    }

    /// Drive frames from `source` until quit, end of stream or capture failure.
    pub fn run<S, D, O>(
        &mut self,
        source: &mut S,
        detector: &mut D,
        overlay: &mut O,
        stop: &AtomicBool,
    ) -> RunSummary
    where
        S: FrameSource,
        D: LandmarkDetector<S::Frame>,
        O: Overlay,
    {
        let mut log = AuditLog::with_capacity(self.log_lines);
        tracing::info!(gestures = self.table.len(), "starting gesture recognition");

        let reason = loop {
            if stop.load(Ordering::Relaxed) {
                break StopReason::Quit;
            }
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                // A source may end early because the stop flag was raised.
                Ok(None) if stop.load(Ordering::Relaxed) => break StopReason::Quit,
                Ok(None) => break StopReason::EndOfStream,
                Err(e) => {
                    tracing::error!(error = %e, "unable to fetch frame, stopping");
                    break StopReason::CaptureFailed {
                        reason: e.to_string(),
                    };
                }
            };

            let hands = detector.detect(&frame);
            let report = self.step(frame.timestamp(), &hands);
            if let Some(record) = &report.record {
                log.push(record.clone());
            }
            overlay.render(&report, &log);
        };

        let summary = self.summary(reason, &log);
        tracing::info!(
            frames = summary.frames,
            fired = summary.fired,
            suppressed = summary.suppressed,
            "gesture recognition stopped"
        );
        summary
    }

    pub fn summary(&self, stop: StopReason, log: &AuditLog) -> RunSummary {
        RunSummary {
            frames: self.frames,
            fired: self.fired,
            suppressed: self.suppressed,
            stop,
            recent: log.iter().cloned().collect(),
        }
    }

    pub fn trigger_state(&self) -> TriggerState {
        self.trigger
    }

    pub fn dispatcher(&self) -> &Dispatcher<A> {
        &self.dispatcher
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
