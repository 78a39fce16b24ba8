use crate::cli::run;

pub mod cli;
pub mod codec;
mod config;
pub mod domain;
pub mod storage;

fn main() {
    run();
}
