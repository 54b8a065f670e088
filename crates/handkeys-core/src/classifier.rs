use crate::gesture::GestureName;
use crate::landmark::{Hand, HandLandmark};
use crate::store::GestureTable;

use crate::landmark::HandLandmark::*;

// ---------------------------------------------------------------------------
// Finger geometry
// ---------------------------------------------------------------------------

/// (tip, PIP joint) pairs for the three fingers that must oppose the index.
const OTHER_FINGERS: [(HandLandmark, HandLandmark); 3] = [
    (MiddleTip, MiddlePip),
    (RingTip, RingPip),
    (PinkyTip, PinkyPip),
];

const FINGERTIPS: [HandLandmark; 5] = [ThumbTip, IndexTip, MiddleTip, RingTip, PinkyTip];

/// Tip strictly above (smaller y than) `base`.
fn above(hand: &Hand, tip: HandLandmark, base: HandLandmark) -> bool {
    hand.y(tip) < hand.y(base)
}

fn below(hand: &Hand, tip: HandLandmark, base: HandLandmark) -> bool {
    hand.y(tip) > hand.y(base)
}

fn one_finger_up(hand: &Hand) -> bool {
    above(hand, IndexTip, IndexPip) && OTHER_FINGERS.iter().all(|&(t, b)| below(hand, t, b))
}

fn one_finger_down(hand: &Hand) -> bool {
    below(hand, IndexTip, IndexPip) && OTHER_FINGERS.iter().all(|&(t, b)| above(hand, t, b))
}

fn fist_closed(hand: &Hand) -> bool {
    FINGERTIPS.iter().all(|&t| below(hand, t, Wrist))
}

fn fist_opened(hand: &Hand) -> bool {
    FINGERTIPS.iter().all(|&t| above(hand, t, Wrist))
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// A fn-pointer rule: when `condition` holds, the hand shows `gesture`.
pub struct Rule {
    pub gesture: GestureName,
    pub condition: fn(&Hand) -> bool,
}

/// The built-in rules, in priority order. First match wins.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            gesture: GestureName::OneFingerUp,
            condition: one_finger_up,
        },
        Rule {
            gesture: GestureName::OneFingerDown,
            condition: one_finger_down,
        },
        Rule {
            gesture: GestureName::FistClosed,
            condition: fist_closed,
        },
        Rule {
            gesture: GestureName::FistOpened,
            condition: fist_opened,
        },
    ]
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl Classifier {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, hand: &Hand) -> Option<GestureName> {
        self.rules
            .iter()
            .find(|rule| (rule.condition)(hand))
            .map(|rule| rule.gesture)
    }

    /// Pick the gesture to act on from all hands in a frame.
    ///
    /// Hands are visited in detector order; the first one whose gesture is
    /// configured in `table` wins. Hands showing an unconfigured gesture
    /// are skipped.
    pub fn select_gesture(&self, hands: &[Hand], table: &GestureTable) -> Option<GestureName> {
        hands
            .iter()
            .filter_map(|hand| self.classify(hand))
            .find(|gesture| table.contains_key(gesture))
    }
}
