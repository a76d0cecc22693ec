//! Model training over a labeled feature table.

mod split;
mod trainer;

pub use split::{stratified_split, Split, MIN_CLASS_ROWS};
pub use trainer::{train, TrainReport, Trainer, DEFAULT_TEST_FRACTION};
