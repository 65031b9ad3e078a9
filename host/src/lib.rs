//! Headless driver for the asteroids simulation: a scripted pilot, a frame
//! loop wired to the leaderboard worker, and a parallel seed benchmark.

pub mod audio;
pub mod benchmark;
pub mod pilot;
pub mod runner;
pub mod util;
