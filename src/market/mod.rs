pub mod burst;
pub mod price_process;
pub mod regime;
pub mod synthesizer;

pub use burst::{Burst, BurstInjector};
pub use price_process::PriceProcess;
pub use regime::Regime;
pub use synthesizer::OrderSynthesizer;
