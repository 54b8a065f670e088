//! Capture and detection collaborators.
//!
//! Webcam capture and the hand landmark model live outside this crate. The
//! loop sees them through [`FrameSource`] and [`LandmarkDetector`]. The
//! concrete source shipped here reads the JSON lines a MediaPipe helper
//! process prints, one frame per line:
//!
//! ```text
//! {"t": 12.034, "hands": [{"landmarks": [{"x": 0.51, "y": 0.72, "z": -0.01}, ...], "handedness": "Right", "score": 0.97}]}
//! ```
//!
//! `t` is optional. A frame without it is stamped with the last `t` seen
//! plus the wall time since that frame arrived, or with the time since the
//! source was created when no frame has carried `t` yet.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::error::{HandkeysError, Result};
use crate::landmark::{Hand, HandDetection, HAND_LANDMARKS};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

pub trait CapturedFrame {
    /// Capture time in seconds. Only differences between frames matter.
    fn timestamp(&self) -> f64;
}

pub trait FrameSource {
    type Frame: CapturedFrame;

    /// The next frame, `Ok(None)` at end of stream. Errors end the loop.
    fn next_frame(&mut self) -> Result<Option<Self::Frame>>;
}

pub trait LandmarkDetector<F> {
    /// Hands found in `frame`, in detector order.
    fn detect(&mut self, frame: &F) -> Vec<Hand>;
}

// ---------------------------------------------------------------------------
// LandmarkFrame
// ---------------------------------------------------------------------------

/// A frame whose hands were already detected upstream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkFrame {
    pub seq: u64,
    pub timestamp: f64,
    pub detections: Vec<HandDetection>,
}

impl CapturedFrame for LandmarkFrame {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

#[derive(Deserialize)]
struct FrameLine {
    #[serde(default)]
    t: Option<f64>,
    #[serde(default)]
    hands: Vec<HandDetection>,
}

// ---------------------------------------------------------------------------
// JsonLinesSource
// ---------------------------------------------------------------------------

/// How often a blocked read wakes up to check the stop flag.
const STOP_POLL: Duration = Duration::from_millis(100);

/// Reads frames on a background thread so a quiet stream never blocks a quit.
pub struct JsonLinesSource {
    lines: Receiver<std::io::Result<String>>,
    stop: Option<Arc<AtomicBool>>,
    /// Producer time and the moment it was received.
    clock: (f64, Instant),
    seq: u64,
}

impl JsonLinesSource {
    pub fn new<R: BufRead + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.send(line).is_err() || failed {
                    break;
                }
            }
        });
        Self {
            lines: rx,
            stop: None,
            clock: (0.0, Instant::now()),
            seq: 0,
        }
    }

    /// End the stream once `stop` is raised, even while no line is pending.
    pub fn with_stop(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// `Ok(None)` at end of input or after a stop.
    fn next_line(&self) -> Result<Option<String>> {
        let received = match &self.stop {
            None => self.lines.recv().ok(),
            Some(stop) => loop {
                if stop.load(Ordering::Relaxed) {
                    return Ok(None);
                }
                match self.lines.recv_timeout(STOP_POLL) {
                    Ok(line) => break Some(line),
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break None,
                }
            },
        };
        match received {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(e)) => Err(HandkeysError::Capture(format!("failed to read frame: {e}"))),
            None => Ok(None),
        }
    }

    fn stamp(&mut self, t: Option<f64>) -> f64 {
        let now = Instant::now();
        match t {
            Some(t) => {
                self.clock = (t, now);
                t
            }
            None => {
                let (base, at) = self.clock;
                base + now.duration_since(at).as_secs_f64()
            }
        }
    }
}

impl FrameSource for JsonLinesSource {
    type Frame = LandmarkFrame;

    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        while let Some(line) = self.next_line()? {
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            self.seq += 1;
            let parsed: FrameLine = serde_json::from_str(text).map_err(|e| {
                HandkeysError::Capture(format!("malformed frame {}: {e}", self.seq))
            })?;
            return Ok(Some(LandmarkFrame {
                seq: self.seq,
                timestamp: self.stamp(parsed.t),
                detections: parsed.hands,
            }));
        }
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// PrecomputedLandmarks
// ---------------------------------------------------------------------------

/// Detector for frames that already carry hands: validates and filters them.
pub struct PrecomputedLandmarks {
    min_confidence: f32,
}

impl PrecomputedLandmarks {
    pub fn new(min_confidence: f32) -> Self {
        Self {
            min_confidence: min_confidence.clamp(0.0, 1.0),
        }
    }
}

impl LandmarkDetector<LandmarkFrame> for PrecomputedLandmarks {
    fn detect(&mut self, frame: &LandmarkFrame) -> Vec<Hand> {
        frame
            .detections
            .iter()
            .filter(|d| d.score.map_or(true, |s| s >= self.min_confidence))
            .filter_map(|d| match Hand::try_from(d.clone()) {
                Ok(hand) => Some(hand),
                Err(count) => {
                    tracing::warn!(
                        frame = frame.seq,
                        expected = HAND_LANDMARKS,
                        got = count,
                        "dropping hand with wrong landmark count"
                    );
                    None
                }
            })
            .collect()
    }
}
