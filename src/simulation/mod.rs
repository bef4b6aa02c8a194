mod noise;
mod signal;

pub use noise::{
    AdditiveNoiseConfig, BaselineWanderConfig, ImpulseNoiseConfig, NoiseConfig, PowerlineConfig,
    apply_noise,
};
pub use signal::{BeatShape, SyntheticEcg, add_gaussian_bump, pulse_train};
