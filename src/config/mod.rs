mod interval;
mod model;
mod validator;

pub use interval::Interval;
pub use model::{ModelConfig, ModelTypeId, WeightsSpec, DEFAULT_BASE_URL, WEIGHTS_SUBDIR};
pub use validator::{ConfigKey, ConfigValidator};
