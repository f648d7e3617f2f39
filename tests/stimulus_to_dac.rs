use asg::{
    DacAdapter, Generated, GeneratorConfig, PureTone, Result, Stimulus, StimulusParameters,
    StimulusState,
};

fn tone_441() -> PureTone {
    let mut tone = PureTone::with_sampling_frequency(44_100.0).unwrap();
    tone.set_tone_frequency(441.0).unwrap();
    tone
}

/// Produces a fixed number of samples, then stops
struct Burst {
    state: StimulusState,
    remaining: usize,
}

impl Stimulus for Burst {
    fn generate(&mut self, buffer: &mut [f32]) -> Generated {
        if buffer.is_empty() || self.remaining < buffer.len() {
            return Generated::NONE;
        }
        self.remaining -= buffer.len();
        buffer.fill(0.5);
        Generated::new(buffer.len(), None)
    }

    fn reproduce(&mut self, _src: &[f32], _dst: &mut [f32]) -> Generated {
        Generated::NONE
    }

    fn configure(&mut self, _parameters: &StimulusParameters) -> Result<()> {
        Ok(())
    }

    fn get_period_secs(&self) -> f32 {
        0.0
    }

    fn state(&self) -> &StimulusState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut StimulusState {
        &mut self.state
    }
}

#[test]
fn split_blocks_match_single_block() {
    let mut whole_tone = tone_441();
    let mut whole = [0u16; 250];
    let mut dac = DacAdapter::with_stimulus(&mut whole_tone, 16);
    assert_eq!(dac.generate(&mut whole), Generated::new(250, Some(0)));

    let mut split_tone = tone_441();
    let mut split = [0u16; 250];
    let mut dac = DacAdapter::with_stimulus(&mut split_tone, 16);
    let (first, rest) = split.split_at_mut(100);
    let (second, third) = rest.split_at_mut(37);
    assert_eq!(dac.generate(first).sync, Some(0));
    assert_eq!(dac.generate(second).sync, Some(0));
    // Boundary at absolute sample 200
    assert_eq!(dac.generate(third), Generated::new(113, Some(63)));

    assert_eq!(whole, split);
    assert_eq!(whole_tone.get_position(), split_tone.get_position());
}

#[test]
fn stopped_stimulus_reports_partial_block() {
    let mut burst = Burst {
        state: StimulusState::new(),
        remaining: 3,
    };
    let mut dac = DacAdapter::with_stimulus(&mut burst, 8);
    let mut out = [0u8; 8];
    let generated = dac.generate(&mut out);
    assert_eq!(generated, Generated::new(3, None));
    assert_eq!(&out[..4], &[191, 191, 191, 0]);

    assert_eq!(dac.generate(&mut out), Generated::NONE);
}

#[test]
fn configuration_drives_the_pipeline() {
    let config = GeneratorConfig::from_json_str(
        r#"{
            "sampling_frequency": 48000.0,
            "dac_resolution": 8,
            "stimulus": { "kind": "pure-tone", "frequency": 480.0 }
        }"#,
    )
    .unwrap();

    let mut tone = config.build_pure_tone().unwrap();
    let mut dac = config.dac_adapter(&mut tone);
    let mut out = [0u8; 10];
    assert_eq!(dac.generate(&mut out), Generated::new(10, Some(0)));
    assert_eq!(out[0], 127);
    assert!(out[1] > out[0]);

    let stimulus = dac.take_stimulus().unwrap();
    assert_eq!(stimulus.get_position(), 10);
    assert_eq!(stimulus.get_sampling_frequency(), 48_000.0);
}

#[test]
fn recorded_samples_normalize_then_quantize() {
    let mut tone = tone_441();
    let recorded = [2.0, -1.0, 0.5];
    let mut normalized = [0.0f32; 3];
    assert_eq!(
        tone.reproduce(&recorded, &mut normalized),
        Generated::new(3, Some(0))
    );
    assert_eq!(normalized, [1.0, -0.5, 0.25]);

    let dac = DacAdapter::new(16);
    let mut codes = [0i32; 3];
    assert_eq!(dac.reproduce(&normalized, &mut codes), Generated::new(3, None));
    assert_eq!(codes, [32_767, -16_383, 8_191]);
}
