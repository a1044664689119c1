//! Shareable board state
//!
//! A board is shared as a single opaque token: standard base64 of a JSON
//! document holding the geometry, the simulation parameters, the voice and
//! the canvas size it was saved at. Loading into a canvas of a different
//! width re-centres the geometry horizontally.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::{Instrument, Note, ScaleType};
use crate::error::Result;
use crate::settings::{SimParams, Voice};
use crate::sim::{
    Dropper, LineSegment, SerializedDropper, SerializedLine, SimState, UndoPoint, Vec2Def,
};

/// Everything needed to rebuild a board, in wire form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    pub gravity: f32,
    pub dropper_timeout: f32,
    pub root: Note,
    pub scale_type: ScaleType,
    pub instrument: Instrument,
    /// Canvas size at save time
    pub size: Vec2Def,
    pub lines: Vec<SerializedLine>,
    pub droppers: Vec<SerializedDropper>,
}

impl SavedState {
    pub fn params(&self) -> SimParams {
        SimParams {
            gravity: self.gravity,
            dropper_timeout: self.dropper_timeout,
        }
    }

    pub fn voice(&self) -> Voice {
        Voice {
            instrument: self.instrument,
            root: self.root,
            scale: self.scale_type,
        }
    }

    /// Geometry shifted along x by `dx`; y is never touched
    pub fn shifted_x(&self, dx: f32) -> UndoPoint {
        UndoPoint {
            lines: self
                .lines
                .iter()
                .map(|l| LineSegment::deserialize(l).shifted_x(dx).serialize())
                .collect(),
            droppers: self
                .droppers
                .iter()
                .map(|d| {
                    let mut dropper = Dropper::deserialize(d);
                    dropper.pos.x += dx;
                    dropper.serialize()
                })
                .collect(),
        }
    }
}

/// Encode a saved board as a share token
pub fn encode_token(saved: &SavedState) -> Result<String> {
    let json = serde_json::to_vec(saved)?;
    Ok(STANDARD.encode(json))
}

/// Decode a share token. Fails on bad base64, bad JSON or missing fields.
pub fn decode_token(token: &str) -> Result<SavedState> {
    let json = STANDARD.decode(token.trim())?;
    Ok(serde_json::from_slice(&json)?)
}

impl SimState {
    /// Flat serializable view of the board, parameters, voice and canvas
    pub fn serialize(&self) -> SavedState {
        let point = self.capture_snapshot();
        SavedState {
            gravity: self.params.gravity,
            dropper_timeout: self.params.dropper_timeout,
            root: self.voice.root,
            scale_type: self.voice.scale,
            instrument: self.voice.instrument,
            size: self.canvas.into(),
            lines: point.lines,
            droppers: point.droppers,
        }
    }

    /// Replace geometry, parameters and voice from a saved board.
    ///
    /// If the saved canvas width differs from the current one, every x
    /// coordinate is shifted by half the difference.
    pub fn deserialize(&mut self, saved: &SavedState) {
        let saved_size: Vec2 = saved.size.into();
        let dx = (self.canvas.x - saved_size.x) / 2.0;
        let point = if dx != 0.0 {
            log::debug!("Re-centring saved board by {:.1}px", dx);
            saved.shifted_x(dx)
        } else {
            UndoPoint {
                lines: saved.lines.clone(),
                droppers: saved.droppers.clone(),
            }
        };
        self.restore(&point);
        self.params = saved.params();
        self.voice = saved.voice();
    }

    /// Current board as a share token
    pub fn share_token(&self) -> Result<String> {
        encode_token(&self.serialize())
    }

    /// Load a share token. A malformed token is logged and ignored, leaving
    /// the board untouched; returns whether anything was loaded.
    pub fn load_token(&mut self, token: &str) -> bool {
        match decode_token(token) {
            Ok(saved) => {
                self.deserialize(&saved);
                log::info!(
                    "Loaded board: {} lines, {} droppers",
                    self.board.lines.len(),
                    self.board.droppers.len()
                );
                true
            }
            Err(e) => {
                log::warn!("Ignoring share token: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Edit;
    use proptest::prelude::*;

    const CANVAS: Vec2 = Vec2::new(400.0, 700.0);

    fn sample_state() -> SimState {
        let mut state = SimState::new(CANVAS);
        state.board.droppers.clear();
        state.params.gravity = 1.0;
        state
            .board
            .lines
            .push(LineSegment::new(Vec2::new(0.0, 10.0), Vec2::new(30.0, 10.0)));
        state.submit(Edit::AddDropper(Vec2::new(10.0, 10.0)));
        state.apply_pending();
        state
    }

    #[test]
    fn test_serialize_schema() {
        let json = serde_json::to_value(sample_state().serialize()).unwrap();
        let expected = serde_json::json!({
            "gravity": 1.0,
            "dropperTimeout": 800.0,
            "root": "C",
            "scaleType": "major",
            "instrument": "marimba",
            "size": { "x": 400.0, "y": 700.0 },
            "lines": [{ "from": { "x": 0.0, "y": 10.0 }, "to": { "x": 30.0, "y": 10.0 } }],
            "droppers": [{ "pos": { "x": 10.0, "y": 10.0 }, "timeout": 0.0 }],
        });
        assert_eq!(json, expected);
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"{
            "dropperTimeout": 500,
            "droppers": [{ "pos": { "x": 10, "y": 10 }, "timeout": 0 }],
            "gravity": 1.2,
            "instrument": "guitar",
            "lines": [{ "from": { "x": 0, "y": 10 }, "to": { "x": 30, "y": 10 } }],
            "root": "C",
            "scaleType": "major",
            "size": { "x": 400, "y": 700 }
        }"#;
        let saved: SavedState = serde_json::from_str(json).unwrap();

        let mut state = SimState::new(CANVAS);
        state.deserialize(&saved);
        assert_eq!(state.params.dropper_timeout, 500.0);
        assert_eq!(state.params.gravity, 1.2);
        assert_eq!(state.voice.instrument, Instrument::Guitar);
        assert_eq!(state.board.droppers, vec![Dropper::at(Vec2::new(10.0, 10.0))]);
        assert_eq!(
            state.board.lines,
            vec![LineSegment::new(Vec2::new(0.0, 10.0), Vec2::new(30.0, 10.0))]
        );
    }

    #[test]
    fn test_token_round_trip() {
        let original = sample_state();
        let token = original.share_token().unwrap();
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || "+/=".contains(c)));

        let mut loaded = SimState::new(CANVAS);
        assert!(loaded.load_token(&token));
        assert_eq!(loaded.board.lines, original.board.lines);
        assert_eq!(loaded.board.droppers, original.board.droppers);
        assert_eq!(loaded.params, original.params);
        assert_eq!(loaded.voice, original.voice);
    }

    #[test]
    fn test_load_recentres_x_only() {
        let original = sample_state();
        let token = original.share_token().unwrap();

        let mut wider = SimState::new(Vec2::new(600.0, 300.0));
        assert!(wider.load_token(&token));
        let line = wider.board.lines[0];
        assert_eq!(line.from(), Vec2::new(100.0, 10.0));
        assert_eq!(line.to(), Vec2::new(130.0, 10.0));
        assert_eq!(wider.board.droppers[0].pos, Vec2::new(110.0, 10.0));
    }

    #[test]
    fn test_load_into_narrower_canvas() {
        let token = sample_state().share_token().unwrap();

        let mut narrow = SimState::new(Vec2::new(200.0, 900.0));
        assert!(narrow.load_token(&token));
        let line = narrow.board.lines[0];
        assert_eq!(line.from(), Vec2::new(-100.0, 10.0));
        assert_eq!(line.to(), Vec2::new(-70.0, 10.0));
        assert_eq!(narrow.board.droppers[0].pos, Vec2::new(-90.0, 10.0));

        // A dropper pushed off-canvas keeps firing; its balls leave at once
        let stats = crate::sim::tick(&mut narrow, &mut crate::audio::LogSampler::new(), 1.0);
        assert_eq!(stats.spawned, 1);
        assert_eq!(stats.removed, 1);
        assert!(narrow.board.balls.is_empty());
    }

    #[test]
    fn test_bad_tokens_leave_board_unchanged() {
        let mut state = sample_state();
        let before = state.board.clone();
        let params = state.params;

        let missing_fields = STANDARD.encode(r#"{"gravity": 2.0}"#);
        let bad_note = STANDARD.encode(
            r#"{"gravity":1,"dropperTimeout":1,"root":"H","scaleType":"major",
            "instrument":"marimba","size":{"x":1,"y":1},"lines":[],"droppers":[]}"#,
        );
        for token in ["not base64 at all!", "e30", missing_fields.as_str(), bad_note.as_str()] {
            assert!(!state.load_token(token), "token {token:?} should be rejected");
        }
        assert_eq!(state.board, before);
        assert_eq!(state.params, params);
    }

    #[test]
    fn test_decode_errors_are_typed() {
        assert!(matches!(
            decode_token("***"),
            Err(crate::NotedropError::Base64(_))
        ));
        assert!(matches!(
            decode_token(&STANDARD.encode("[1, 2")),
            Err(crate::NotedropError::Json(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_serialize_round_trip(
            lines in prop::collection::vec((0.0f32..400.0, 0.0f32..700.0, 0.0f32..400.0, 0.0f32..700.0), 0..8),
            droppers in prop::collection::vec((0.0f32..400.0, 0.0f32..700.0, -10.0f32..2000.0), 0..5),
            gravity in 0.01f32..3.0,
            dropper_timeout in 100.0f32..2000.0,
            note in prop::sample::select(Note::ALL.to_vec()),
            scale in prop::sample::select(ScaleType::ALL.to_vec()),
        ) {
            let mut state = SimState::new(CANVAS);
            state.board.lines = lines
                .iter()
                .map(|&(ax, ay, bx, by)| LineSegment::new(Vec2::new(ax, ay), Vec2::new(bx, by)))
                .collect();
            state.board.droppers = droppers
                .iter()
                .map(|&(x, y, timeout)| Dropper { pos: Vec2::new(x, y), timeout })
                .collect();
            state.params = SimParams { gravity, dropper_timeout };
            state.voice.root = note;
            state.voice.scale = scale;

            let token = state.share_token().unwrap();
            let mut loaded = SimState::new(CANVAS);
            prop_assert!(loaded.load_token(&token));
            prop_assert_eq!(&loaded.board.lines, &state.board.lines);
            prop_assert_eq!(&loaded.board.droppers, &state.board.droppers);
            prop_assert_eq!(loaded.params, state.params);
            prop_assert_eq!(loaded.voice, state.voice);
        }
    }
}
