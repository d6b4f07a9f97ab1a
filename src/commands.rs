pub mod compile;
mod diff;

pub use compile::run_compile;
pub use diff::run_diff;
