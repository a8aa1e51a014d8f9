//! Design rules: structural smells decided from counts and shapes.

mod class_shape;
mod complexity;
mod counts;
mod exceptions;
mod nesting;

pub use class_shape::{private_constructors_not_final, utility_class};
pub use complexity::{
    cyclomatic_complexity, high_cyclomatic_complexity, high_switch_density, switch_label_count,
};
pub use counts::{excessive_imports, excessive_parameter_list, too_many_fields, too_many_methods};
pub use exceptions::{null_pointer_thrown, raw_exception_thrown, unchecked_exception_declared};
pub use nesting::{max_if_depth, nested_if_statements};
