//! Hand keypoints as reported by a MediaPipe-style hand landmark model.
//!
//! Coordinates are normalized to the image (0.0 to 1.0) with the origin in
//! the top-left corner, so a smaller `y` is higher on screen.

use serde::{Deserialize, Serialize};

/// Number of landmarks per detected hand.
pub const HAND_LANDMARKS: usize = 21;

/// Semantic landmark indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// One hand as emitted by the detector, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandDetection {
    pub landmarks: Vec<Landmark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handedness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// A validated hand: exactly [`HAND_LANDMARKS`] keypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    landmarks: [Landmark; HAND_LANDMARKS],
    pub handedness: Option<String>,
    pub score: Option<f32>,
}

impl Hand {
    pub fn new(landmarks: [Landmark; HAND_LANDMARKS]) -> Self {
        Self {
            landmarks,
            handedness: None,
            score: None,
        }
    }

    pub fn get(&self, which: HandLandmark) -> Landmark {
        self.landmarks[which.index()]
    }

    pub fn y(&self, which: HandLandmark) -> f32 {
        self.get(which).y
    }
}

impl TryFrom<HandDetection> for Hand {
    type Error = usize;

    /// Fails with the actual landmark count when it is not 21.
    fn try_from(d: HandDetection) -> std::result::Result<Self, usize> {
        let count = d.landmarks.len();
        let landmarks: [Landmark; HAND_LANDMARKS] = d.landmarks.try_into().map_err(|_| count)?;
        Ok(Self {
            landmarks,
            handedness: d.handedness,
            score: d.score,
        })
    }
}
