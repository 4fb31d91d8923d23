//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! The event -> effect mapping is platform independent; playback is web only.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Engine rev when a run starts
    Start,
    /// Traffic passed the player
    Pass,
    /// Traffic passed while boosting (double points)
    BoostPass,
    /// Collision
    Crash,
    /// Crash that set a new best score
    NewBest,
    Pause,
    Resume,
}

impl SoundEffect {
    /// Sound to play for a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match *event {
            GameEvent::Started => Some(SoundEffect::Start),
            GameEvent::Scored { boosted: true, .. } => Some(SoundEffect::BoostPass),
            GameEvent::Scored { boosted: false, .. } => Some(SoundEffect::Pass),
            GameEvent::Crashed { new_best: true, .. } => Some(SoundEffect::NewBest),
            GameEvent::Crashed { .. } => Some(SoundEffect::Crash),
            GameEvent::Paused => Some(SoundEffect::Pause),
            GameEvent::Resumed => Some(SoundEffect::Resume),
            GameEvent::Spawned { .. } | GameEvent::Restarted => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        blurred: bool,
        mute_on_blur: bool,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
                blurred: false,
                mute_on_blur: settings.mute_on_blur,
            }
        }

        /// Pick up changed volume/mute preferences
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
            self.mute_on_blur = settings.mute_on_blur;
        }

        /// Window focus changed
        pub fn set_blurred(&mut self, blurred: bool) {
            self.blurred = blurred;
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn effective_volume(&self) -> f32 {
            if self.blurred && self.mute_on_blur {
                0.0
            } else {
                self.volume
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Start => self.play_start(ctx, vol),
                SoundEffect::Pass => self.play_pass(ctx, vol, 660.0),
                SoundEffect::BoostPass => self.play_pass(ctx, vol, 990.0),
                SoundEffect::Crash => self.play_crash(ctx, vol),
                SoundEffect::NewBest => {
                    self.play_crash(ctx, vol);
                    self.play_fanfare(ctx, vol);
                }
                SoundEffect::Pause => self.play_blip(ctx, vol, 440.0, 220.0),
                SoundEffect::Resume => self.play_blip(ctx, vol, 220.0, 440.0),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Engine rev - rising sawtooth
        fn play_start(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 80.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.4).ok();
            osc.frequency().set_value_at_time(80.0, t).ok();
            osc.frequency().exponential_ramp_to_value_at_time(240.0, t + 0.35).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.45).ok();
        }

        /// Car passed - short chirp
        fn play_pass(&self, ctx: &AudioContext, vol: f32, freq: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.12, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.08).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Crash - noisy downward sweep with a bass thump
        fn play_crash(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.4, t).ok();
                gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.5).ok();
                osc.frequency().set_value_at_time(400.0, t).ok();
                osc.frequency().set_value_at_time(1800.0, t + 0.02).ok();
                osc.frequency().set_value_at_time(300.0, t + 0.04).ok();
                osc.frequency().set_value_at_time(1200.0, t + 0.06).ok();
                osc.frequency().exponential_ramp_to_value_at_time(40.0, t + 0.45).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.5).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 60.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.3).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.35).ok();
            }
        }

        /// New best - rising arpeggio
        fn play_fanfare(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time() + 0.4;
            for (i, freq) in [523.25_f32, 659.25, 783.99, 1046.5].iter().enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) else {
                    continue;
                };
                let start = t + i as f64 * 0.1;
                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().set_value_at_time(vol * 0.25, start).ok();
                gain.gain().exponential_ramp_to_value_at_time(0.01, start + 0.25).ok();
                osc.start().ok();
                osc.stop_with_when(start + 0.3).ok();
            }
        }

        /// Pause/resume - two-tone blip
        fn play_blip(&self, ctx: &AudioContext, vol: f32, from: f32, to: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, from, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.15).ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency().set_value_at_time(to, t + 0.07).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.16).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_mapping() {
        assert_eq!(SoundEffect::for_event(&GameEvent::Started), Some(SoundEffect::Start));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Scored {
                points: 1,
                total: 3,
                boosted: false
            }),
            Some(SoundEffect::Pass)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Scored {
                points: 2,
                total: 4,
                boosted: true
            }),
            Some(SoundEffect::BoostPass)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Crashed { score: 5, new_best: true }),
            Some(SoundEffect::NewBest)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Crashed { score: 5, new_best: false }),
            Some(SoundEffect::Crash)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::Spawned { id: 1, fast: true }), None);
        assert_eq!(SoundEffect::for_event(&GameEvent::Restarted), None);
    }

    #[test]
    fn test_double_pass_without_boost_is_plain_chirp() {
        // Two cars clearing the bottom on one tick
        let event = GameEvent::Scored {
            points: 2,
            total: 2,
            boosted: false,
        };
        assert_eq!(SoundEffect::for_event(&event), Some(SoundEffect::Pass));
    }
}
