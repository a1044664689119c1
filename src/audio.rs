//! Bounce sounds
//!
//! The simulation only knows the `Sampler` trait: every reflection calls
//! `play` with the post-bounce speed and the current voice, fire-and-forget.
//! Speed picks a note from a three-octave scale built on the voice's root.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SPEED, MIN_SPEED};
use crate::settings::Voice;

/// Sampled instruments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    #[default]
    Marimba,
    Guitar,
}

impl Instrument {
    pub const ALL: [Instrument; 2] = [Instrument::Marimba, Instrument::Guitar];

    pub fn as_str(&self) -> &'static str {
        match self {
            Instrument::Marimba => "marimba",
            Instrument::Guitar => "guitar",
        }
    }

    /// The following instrument, wrapping around
    pub fn next(&self) -> Self {
        Self::ALL[(*self as usize + 1) % Self::ALL.len()]
    }
}

/// The twelve chromatic note names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Note {
    #[default]
    C,
    #[serde(rename = "C#")]
    CSharp,
    D,
    #[serde(rename = "D#")]
    DSharp,
    E,
    F,
    #[serde(rename = "F#")]
    FSharp,
    G,
    #[serde(rename = "G#")]
    GSharp,
    A,
    #[serde(rename = "A#")]
    ASharp,
    B,
}

impl Note {
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::CSharp,
        Note::D,
        Note::DSharp,
        Note::E,
        Note::F,
        Note::FSharp,
        Note::G,
        Note::GSharp,
        Note::A,
        Note::ASharp,
        Note::B,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Note::C => "C",
            Note::CSharp => "C#",
            Note::D => "D",
            Note::DSharp => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::FSharp => "F#",
            Note::G => "G",
            Note::GSharp => "G#",
            Note::A => "A",
            Note::ASharp => "A#",
            Note::B => "B",
        }
    }

    /// Semitones above C
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Note `semitones` above this one, wrapping within the octave
    pub fn transpose(&self, semitones: usize) -> Self {
        Self::ALL[(self.index() + semitones) % Self::ALL.len()]
    }
}

/// Scale shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    #[default]
    Major,
    Minor,
    PentatonicMajor,
    PentatonicMinor,
}

impl ScaleType {
    pub const ALL: [ScaleType; 4] = [
        ScaleType::Major,
        ScaleType::Minor,
        ScaleType::PentatonicMajor,
        ScaleType::PentatonicMinor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleType::Major => "major",
            ScaleType::Minor => "minor",
            ScaleType::PentatonicMajor => "pentatonic_major",
            ScaleType::PentatonicMinor => "pentatonic_minor",
        }
    }

    /// The following scale shape, wrapping around
    pub fn next(&self) -> Self {
        Self::ALL[(*self as usize + 1) % Self::ALL.len()]
    }

    /// Semitone offsets from the root
    pub fn offsets(&self) -> &'static [usize] {
        match self {
            ScaleType::Major => &[0, 2, 4, 5, 7, 9, 11],
            ScaleType::Minor => &[0, 2, 3, 5, 7, 8, 11],
            ScaleType::PentatonicMajor => &[0, 2, 4, 7, 9],
            ScaleType::PentatonicMinor => &[0, 3, 5, 7, 10],
        }
    }
}

/// Octaves the scale is spread over, lowest first
pub const OCTAVES: [u8; 3] = [3, 4, 5];

/// A note in a specific octave, e.g. `C#4`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    pub note: Note,
    pub octave: u8,
}

impl Pitch {
    /// MIDI note number (C4 = 60)
    pub fn midi(&self) -> u8 {
        12 * (self.octave + 1) + self.note.index() as u8
    }

    /// Equal-tempered frequency with A4 = 440 Hz
    pub fn frequency(&self) -> f32 {
        440.0 * 2f32.powf((self.midi() as f32 - 69.0) / 12.0)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.note.as_str(), self.octave)
    }
}

/// Every playable pitch for a root and scale, ascending across `OCTAVES`.
///
/// Note names wrap within the octave label, so a B-rooted scale reuses the
/// same octave number for the notes past C.
pub fn scale_pitches(root: Note, scale: ScaleType) -> Vec<Pitch> {
    let notes: Vec<Note> = scale.offsets().iter().map(|&o| root.transpose(o)).collect();
    OCTAVES
        .iter()
        .flat_map(|&octave| notes.iter().map(move |&note| Pitch { note, octave }))
        .collect()
}

/// Map a bounce speed (px/ms) to a pitch in the voice's scale
pub fn note_for_speed(speed: f32, voice: &Voice) -> Pitch {
    let pitches = scale_pitches(voice.root, voice.scale);
    let step = (MAX_SPEED - MIN_SPEED) / (pitches.len() - 1) as f32;
    let resolved = speed.clamp(MIN_SPEED, MAX_SPEED) - MIN_SPEED;
    let index = ((resolved / step).floor() as usize).min(pitches.len() - 1);
    pitches[index]
}

/// Something that can sound a bounce
pub trait Sampler {
    /// Play the note for a bounce at `speed` (px/ms). Must not block.
    fn play(&mut self, speed: f32, voice: Voice);

    /// Silence or restore output (e.g. on window blur/focus)
    fn mute(&mut self, muted: bool);
}

/// Sampler that only logs the notes it would play. Used by the native host.
#[derive(Debug, Default)]
pub struct LogSampler {
    muted: bool,
    played: u64,
    last: Option<(Pitch, Instrument)>,
}

impl LogSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notes played since creation (muted bounces are not counted)
    pub fn played(&self) -> u64 {
        self.played
    }

    pub fn last(&self) -> Option<(Pitch, Instrument)> {
        self.last
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl Sampler for LogSampler {
    fn play(&mut self, speed: f32, voice: Voice) {
        if self.muted {
            return;
        }
        let pitch = note_for_speed(speed, &voice);
        log::trace!("{} {} (speed {:.3})", voice.instrument.as_str(), pitch, speed);
        self.played += 1;
        self.last = Some((pitch, voice.instrument));
    }

    fn mute(&mut self, muted: bool) {
        self.muted = muted;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSampler;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::Cell;
    use std::future::Future;
    use std::rc::Rc;

    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioContext, GainNode, OscillatorType};

    use super::{Instrument, Sampler, note_for_speed};
    use crate::settings::Voice;

    /// Delay before a note starts (s)
    const LOOKAHEAD: f64 = 0.05;
    /// Length of a note (s)
    const NOTE_LENGTH: f64 = 1.0;

    /// Web Audio sampler: one short enveloped oscillator per bounce
    pub struct WebAudioSampler {
        ctx: Option<AudioContext>,
        output: Option<GainNode>,
        ready: Rc<Cell<bool>>,
    }

    impl Default for WebAudioSampler {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioSampler {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let output = ctx.as_ref().and_then(|ctx| {
                let gain = ctx.create_gain().ok()?;
                gain.connect_with_audio_node(&ctx.destination()).ok()?;
                Some(gain)
            });
            Self {
                ctx,
                output,
                ready: Rc::new(Cell::new(false)),
            }
        }

        /// Resume the audio context. Browsers only allow this after a user
        /// gesture, so the host spawns this from a pointer release. The
        /// returned future does not borrow the sampler.
        pub fn initialize(&self) -> impl Future<Output = ()> + 'static {
            let ctx = self.ctx.clone();
            let ready = Rc::clone(&self.ready);
            async move {
                if ready.get() {
                    return;
                }
                let Some(ctx) = ctx else { return };
                match ctx.resume() {
                    Ok(promise) => {
                        if JsFuture::from(promise).await.is_ok() {
                            ready.set(true);
                            log::info!("Audio ready");
                        }
                    }
                    Err(e) => log::warn!("Audio resume failed: {:?}", e),
                }
            }
        }

        fn waveform(instrument: Instrument) -> OscillatorType {
            match instrument {
                Instrument::Marimba => OscillatorType::Sine,
                Instrument::Guitar => OscillatorType::Triangle,
            }
        }
    }

    impl Sampler for WebAudioSampler {
        fn play(&mut self, speed: f32, voice: Voice) {
            let (Some(ctx), Some(output)) = (&self.ctx, &self.output) else {
                return;
            };
            let pitch = note_for_speed(speed, &voice);

            let Ok(osc) = ctx.create_oscillator() else { return };
            let Ok(gain) = ctx.create_gain() else { return };
            osc.set_type(Self::waveform(voice.instrument));
            osc.frequency().set_value(pitch.frequency());
            if osc.connect_with_audio_node(&gain).is_err()
                || gain.connect_with_audio_node(output).is_err()
            {
                return;
            }

            let t = ctx.current_time() + LOOKAHEAD;
            gain.gain().set_value_at_time(0.01, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.3, t + 0.02).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + NOTE_LENGTH)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + NOTE_LENGTH + 0.05).ok();
        }

        fn mute(&mut self, muted: bool) {
            let (Some(ctx), Some(output)) = (&self.ctx, &self.output) else {
                return;
            };
            let target = if muted { 0.0 } else { 1.0 };
            output
                .gain()
                .linear_ramp_to_value_at_time(target, ctx.current_time() + 0.1)
                .ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_pitches_span_three_octaves() {
        let pitches = scale_pitches(Note::C, ScaleType::Major);
        assert_eq!(pitches.len(), 21);
        assert_eq!(pitches[0].to_string(), "C3");
        assert_eq!(pitches[7].to_string(), "C4");
        assert_eq!(pitches[20].to_string(), "B5");
    }

    #[test]
    fn test_scale_wraps_note_names() {
        let pitches = scale_pitches(Note::B, ScaleType::PentatonicMajor);
        let names: Vec<String> = pitches[..5].iter().map(|p| p.to_string()).collect();
        assert_eq!(names, ["B3", "C#3", "D#3", "F#3", "G#3"]);
    }

    #[test]
    fn test_note_for_speed_clamps() {
        let voice = Voice::default();
        assert_eq!(note_for_speed(-1.0, &voice).to_string(), "C3");
        assert_eq!(note_for_speed(0.0, &voice).to_string(), "C3");
        assert_eq!(note_for_speed(2.0, &voice).to_string(), "B5");
        assert_eq!(note_for_speed(50.0, &voice).to_string(), "B5");
    }

    #[test]
    fn test_note_for_speed_steps() {
        // 21 pitches over [0, 2] -> step 0.1
        let voice = Voice::default();
        assert_eq!(note_for_speed(0.141, &voice).to_string(), "D3");
        assert_eq!(note_for_speed(0.75, &voice).to_string(), "C4");
    }

    #[test]
    fn test_pitch_frequency() {
        let a4 = Pitch {
            note: Note::A,
            octave: 4,
        };
        assert_eq!(a4.midi(), 69);
        assert!((a4.frequency() - 440.0).abs() < 1e-3);
        let c4 = Pitch {
            note: Note::C,
            octave: 4,
        };
        assert_eq!(c4.midi(), 60);
    }

    #[test]
    fn test_wire_names() {
        for note in Note::ALL {
            let json = serde_json::to_string(&note).unwrap();
            assert_eq!(json, format!("\"{}\"", note.as_str()));
        }
        for scale in ScaleType::ALL {
            let json = serde_json::to_string(&scale).unwrap();
            assert_eq!(json, format!("\"{}\"", scale.as_str()));
        }
        for instrument in Instrument::ALL {
            let json = serde_json::to_string(&instrument).unwrap();
            assert_eq!(json, format!("\"{}\"", instrument.as_str()));
        }
        assert!(serde_json::from_str::<Note>("\"H\"").is_err());
    }

    #[test]
    fn test_cycling_wraps() {
        assert_eq!(Instrument::Marimba.next(), Instrument::Guitar);
        assert_eq!(Instrument::Guitar.next(), Instrument::Marimba);
        assert_eq!(ScaleType::PentatonicMinor.next(), ScaleType::Major);
        assert_eq!(Note::B.transpose(1), Note::C);

        let mut scale = ScaleType::Major;
        for _ in 0..ScaleType::ALL.len() {
            scale = scale.next();
        }
        assert_eq!(scale, ScaleType::Major);
    }

    #[test]
    fn test_log_sampler_respects_mute() {
        let mut sampler = LogSampler::new();
        sampler.play(0.5, Voice::default());
        assert_eq!(sampler.played(), 1);

        sampler.mute(true);
        sampler.play(0.5, Voice::default());
        assert_eq!(sampler.played(), 1);

        sampler.mute(false);
        sampler.play(2.0, Voice::default());
        assert_eq!(sampler.played(), 2);
        let (pitch, instrument) = sampler.last().unwrap();
        assert_eq!(pitch.to_string(), "B5");
        assert_eq!(instrument, Instrument::Marimba);
    }
}
