//! Aedes: Dengue Risk Classification Library
//!
//! Validates district-level epidemiological, environmental and
//! socio-economic indicators, classifies each district into a dengue risk
//! tier with a pretrained model, and attaches intervention recommendations
//! and map coordinates.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
