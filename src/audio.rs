//! Audio system using Web Audio API
//!
//! Procedurally generated sounds - no external files needed!
//! - one-shot drop "plink" when a raindrop lands in the bucket
//! - looping rain ambience built from filtered noise, started once

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use web_sys::{
    AudioBufferSourceNode, AudioContext, BiquadFilterType, GainNode, OscillatorNode,
    OscillatorType,
};

use crate::settings::Settings;
use crate::sim::Sound;

/// Length of the looped rain noise buffer
const RAIN_LOOP_SECS: f32 = 2.0;
/// Lowpass cutoff that turns white noise into a rain hiss
const RAIN_CUTOFF_HZ: f32 = 1400.0;
/// Rain sits well under the effects
const RAIN_BASE_GAIN: f32 = 0.25;

/// Running rain loop nodes
struct RainLoop {
    source: AudioBufferSourceNode,
    gain: GainNode,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    settings: Settings,
    muted: bool,
    rain: Option<RainLoop>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            settings: Settings::default(),
            muted: false,
            rain: None,
        }
    }

    /// Take volumes from user settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone();
        self.update_rain_gain();
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.update_rain_gain();
    }

    fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.settings.effective_sfx_volume()
        }
    }

    fn rain_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.settings.effective_music_volume() * RAIN_BASE_GAIN
        }
    }

    fn update_rain_gain(&self) {
        if let Some(rain) = &self.rain {
            rain.gain.gain().set_value(self.rain_gain());
        }
    }

    /// Play a one-shot sound
    pub fn play(&self, sound: Sound) {
        let vol = self.sfx_gain();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match sound {
            Sound::Drop => self.play_drop(ctx, vol),
        }
    }

    /// Start the looping rain ambience. Calling again is a no-op.
    pub fn start_rain(&mut self) {
        if self.rain.is_some() {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        match self.build_rain(ctx) {
            Some(rain) => {
                log::info!("Rain ambience started");
                self.rain = Some(rain);
                self.update_rain_gain();
            }
            None => log::warn!("Could not start rain ambience"),
        }
    }

    /// Stop and release the rain loop
    pub fn stop_rain(&mut self) {
        if let Some(rain) = self.rain.take() {
            let _ = rain.source.stop();
            let _ = rain.source.disconnect();
            let _ = rain.gain.disconnect();
        }
    }

    fn build_rain(&self, ctx: &AudioContext) -> Option<RainLoop> {
        let sample_rate = ctx.sample_rate();
        let frames = (sample_rate * RAIN_LOOP_SECS) as u32;
        let buffer = ctx.create_buffer(1, frames, sample_rate).ok()?;

        let mut rng = Pcg32::seed_from_u64(0x5241_494e);
        let mut samples: Vec<f32> = (0..frames)
            .map(|_| rng.random_range(-1.0f32..1.0))
            .collect();
        buffer.copy_to_channel(&mut samples, 0).ok()?;

        let source = ctx.create_buffer_source().ok()?;
        source.set_buffer(Some(&buffer));
        source.set_loop(true);

        let filter = ctx.create_biquad_filter().ok()?;
        filter.set_type(BiquadFilterType::Lowpass);
        filter.frequency().set_value(RAIN_CUTOFF_HZ);

        let gain = ctx.create_gain().ok()?;
        gain.gain().set_value(0.0);

        source.connect_with_audio_node(&filter).ok()?;
        filter.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        source.start().ok()?;

        Some(RainLoop { source, gain })
    }

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

    /// Water drop - falling sine plink with a quieter echo
    fn play_drop(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(1200.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(400.0, t + 0.08)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 1800.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain().set_value_at_time(vol * 0.15, t + 0.05).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.16)
                .ok();
            osc.frequency().set_value_at_time(1800.0, t + 0.05).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(900.0, t + 0.12)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }
    }
}

impl Drop for AudioManager {
    fn drop(&mut self) {
        self.stop_rain();
        if let Some(ctx) = self.ctx.take() {
            let _ = ctx.close();
        }
    }
}
