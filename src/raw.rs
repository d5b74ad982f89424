//! Driver-native samples and their decoding into the frame model.
//!
//! Drivers fill in `RawFrame` however their vendor SDK reports data;
//! the listener turns it into an immutable `Frame` with `decode_frame`.

use crate::types::{Finger, FingerMap, Frame, Hand, HandMap, Vec3};

/// One finger as reported by a driver.
#[derive(Debug, Clone, Default)]
pub struct RawFinger {
    pub id: i32,
    pub position: Vec3,
    pub direction: Vec3,
    pub velocity: Vec3,
    pub length: f32,
    pub width: f32,
    pub is_tool: bool,
}

/// One hand as reported by a driver.
#[derive(Debug, Clone, Default)]
pub struct RawHand {
    pub id: i32,
    pub position: Vec3,
    pub direction: Vec3,
    pub velocity: Vec3,
    pub normal: Vec3,
    pub ball_position: Vec3,
    pub ball_radius: f32,
    pub fingers: Vec<RawFinger>,
}

/// One sensor sample as reported by a driver.
#[derive(Debug, Clone, Default)]
pub struct RawFrame {
    pub id: i64,
    /// Capture time in microseconds.
    pub timestamp: i64,
    pub hands: Vec<RawHand>,
}

/// Decode a driver sample: hands first, then each hand's fingers.
///
/// Duplicate ids within one scope keep the last entry, matching
/// map-insert semantics of the vendor SDKs.
pub fn decode_frame(raw: &RawFrame) -> Frame {
    let mut hands = HandMap::new();

    for raw_hand in &raw.hands {
        let fingers: FingerMap = raw_hand
            .fingers
            .iter()
            .map(|f| {
                (
                    f.id,
                    Finger::new(
                        f.position,
                        f.direction,
                        f.velocity,
                        f.length,
                        f.width,
                        f.is_tool,
                    ),
                )
            })
            .collect();

        let hand = Hand::new(
            fingers,
            raw_hand.position,
            raw_hand.direction,
            raw_hand.velocity,
            raw_hand.normal,
            raw_hand.ball_position,
            raw_hand.ball_radius,
        );
        hands.insert(raw_hand.id, hand);
    }

    Frame::new(hands, raw.id, raw.timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_empty_frame() {
        let frame = decode_frame(&RawFrame {
            id: 9,
            timestamp: 1_000,
            hands: Vec::new(),
        });
        assert_eq!(frame.id(), 9);
        assert_eq!(frame.timestamp(), 1_000);
        assert!(frame.hands().is_empty());
    }

    #[test]
    fn test_decode_hands_and_fingers() {
        let raw = RawFrame {
            id: 2,
            timestamp: 16_667,
            hands: vec![
                RawHand {
                    id: 10,
                    position: Vec3::new(0.0, 200.0, 0.0),
                    normal: Vec3::new(0.0, -1.0, 0.0),
                    ball_radius: 45.0,
                    fingers: vec![
                        RawFinger {
                            id: 1,
                            position: Vec3::new(1.0, 2.0, 3.0),
                            length: 50.0,
                            ..Default::default()
                        },
                        RawFinger {
                            id: 2,
                            is_tool: true,
                            ..Default::default()
                        },
                    ],
                    ..Default::default()
                },
                RawHand {
                    id: 11,
                    ..Default::default()
                },
            ],
        };

        let frame = decode_frame(&raw);
        assert_eq!(frame.hands().len(), 2);

        let hand = &frame.hands()[&10];
        assert_eq!(hand.position(), Vec3::new(0.0, 200.0, 0.0));
        assert_eq!(hand.normal(), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(hand.ball_radius(), 45.0);
        assert_eq!(hand.fingers().len(), 2);
        assert_eq!(hand.fingers()[&1].position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(hand.fingers()[&1].length(), 50.0);
        assert!(hand.fingers()[&2].is_tool());

        assert!(frame.hands()[&11].fingers().is_empty());
    }

    #[test]
    fn test_decode_duplicate_ids_keep_last() {
        let raw = RawFrame {
            hands: vec![
                RawHand {
                    id: 0,
                    ball_radius: 1.0,
                    ..Default::default()
                },
                RawHand {
                    id: 0,
                    ball_radius: 2.0,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let frame = decode_frame(&raw);
        assert_eq!(frame.hands().len(), 1);
        assert_eq!(frame.hands()[&0].ball_radius(), 2.0);
    }
}
