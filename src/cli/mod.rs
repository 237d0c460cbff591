//! Command workflows behind the `chart-releaser` binary.

pub mod orchestration;

pub use orchestration::{
    run_check, run_fmt, run_init, run_update, run_update_with, UpdateArgs, DEFAULT_TIMEOUT,
};
