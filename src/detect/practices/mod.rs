//! Best-practice rules: light semantic checks over statements and calls.

mod functional;
mod literals;
mod logging;
mod reassign;
mod result_set;
mod unused;

pub use functional::implicit_functional_interface;
pub use literals::literal_last_comparison;
pub use logging::expensive_log_statement;
pub use reassign::{reassigned_catch_variable, reassigned_loop_variable, reassigned_parameter};
pub use result_set::unchecked_navigation;
pub use unused::{build_read_index, unused_local_variable};
