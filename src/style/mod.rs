//! Style markers and style accumulation.
//!
//! This module provides:
//!
//! - [`StyleToken`]: opaque, identity-compared style markers
//! - The nine predefined tokens ([`BOLD`], [`UNBOLD`], [`BLUE`], [`GREY`],
//!   [`GREEN`], [`RED`], [`PURPLE`], [`ORANGE`], [`UNCOLOR`])
//! - [`Directive`] and [`Environment`]: what a token means for each target
//! - [`StyleAccumulator`]: per-property CSS state built while scanning arguments

mod accumulator;
mod token;

pub use accumulator::StyleAccumulator;
pub use token::{
    Directive, Environment, StyleToken, BLUE, BOLD, GREEN, GREY, ORANGE, PURPLE, RED, RESET,
    UNBOLD, UNCOLOR,
};
