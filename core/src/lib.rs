pub mod classifier;
pub mod clock;
pub mod error;
pub mod lexicon;
pub mod normalize;
pub mod random;
pub mod stats;

pub use classifier::{Category, ClassificationResult, Responder};
pub use lexicon::{Lexicon, LexiconError};
