//! Procedural sound effects over the Web Audio API.
//!
//! Everything is synthesized from oscillators with short gain envelopes; no
//! assets are loaded. Delayed parts are scheduled on the audio clock rather
//! than with timers. When Web Audio is unavailable the effects are silent.

use wasm_bindgen::JsValue;
use web_sys::{AudioContext, OscillatorType};

use crate::rng::Entropy;

/// One enveloped tone.
#[derive(Clone, Copy, Debug)]
struct Tone {
    freq: f32,
    kind: OscillatorType,
    /// Seconds from now.
    start: f64,
    duration: f64,
    gain: f32,
    /// Hold the gain flat until just before the end (buzzer) instead of decaying.
    sustain: bool,
}

pub struct SoundEffects {
    ctx: Option<AudioContext>,
    rng: Entropy,
}

impl SoundEffects {
    pub fn new() -> Self {
        let ctx = match AudioContext::new() {
            Ok(ctx) => Some(ctx),
            Err(err) => {
                log::warn!("Web Audio API not supported: {err:?}");
                None
            }
        };
        Self {
            ctx,
            rng: Entropy::new(),
        }
    }

    /// Rattle of eight square bursts, then a low thud as the die lands.
    pub fn dice_roll(&mut self) {
        let mut tones: Vec<Tone> = (0..8u8)
            .map(|i| Tone {
                freq: 100.0 + self.rng.unit() as f32 * 200.0,
                kind: OscillatorType::Square,
                start: f64::from(i) * 0.08,
                duration: 0.05,
                gain: 0.1,
                sustain: false,
            })
            .collect();
        tones.push(Tone {
            freq: 80.0,
            kind: OscillatorType::Sine,
            start: 0.6,
            duration: 0.2,
            gain: 0.2,
            sustain: false,
        });
        self.play(&tones);
    }

    /// Ascending sawtooth pops with high sine sparkles; plays on a ladder.
    pub fn firecracker(&mut self) {
        let mut tones: Vec<Tone> = (0..12u8)
            .map(|i| Tone {
                freq: 400.0 + i as f32 * 100.0 + self.rng.unit() as f32 * 50.0,
                kind: OscillatorType::Sawtooth,
                start: f64::from(i) * 0.05,
                duration: 0.03,
                gain: 0.15,
                sustain: false,
            })
            .collect();
        tones.extend((0..6u8).map(|i| Tone {
            freq: 1000.0 + self.rng.unit() as f32 * 1000.0,
            kind: OscillatorType::Sine,
            start: f64::from(i) * 0.08,
            duration: 0.1,
            gain: 0.08,
            sustain: false,
        }));
        self.play(&tones);
    }

    /// Three descending sawtooth tones; plays on a snake.
    pub fn buzzer(&mut self) {
        let tones: Vec<Tone> = (0..3u8)
            .map(|i| Tone {
                freq: 200.0 - i as f32 * 40.0,
                kind: OscillatorType::Sawtooth,
                start: f64::from(i) * 0.15,
                duration: 0.15,
                gain: 0.2,
                sustain: true,
            })
            .collect();
        self.play(&tones);
    }

    fn play(&self, tones: &[Tone]) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        for tone in tones {
            if let Err(err) = schedule(ctx, tone) {
                log::warn!("sound scheduling failed: {err:?}");
                return;
            }
        }
    }
}

impl Default for SoundEffects {
    fn default() -> Self {
        Self::new()
    }
}

fn schedule(ctx: &AudioContext, tone: &Tone) -> Result<(), JsValue> {
    let osc = ctx.create_oscillator()?;
    let gain = ctx.create_gain()?;
    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;

    osc.set_type(tone.kind);
    osc.frequency().set_value(tone.freq);

    let start = ctx.current_time() + tone.start;
    let end = start + tone.duration;
    let env = gain.gain();
    env.set_value_at_time(tone.gain, start)?;
    if tone.sustain {
        env.linear_ramp_to_value_at_time(tone.gain, end - 0.02)?;
    }
    env.exponential_ramp_to_value_at_time(0.01, end)?;

    osc.start_with_when(start)?;
    osc.stop_with_when(end)?;
    Ok(())
}
