//! Feature preparation: categorical encoders and numeric standardization.
//!
//! Both are fit once during training and applied unchanged at every
//! inference; neither is ever refit outside a trainer.

pub mod encoder;
pub mod scaler;

pub use encoder::{EncoderSet, LabelEncoder};
pub use scaler::ScalerState;
