//! Static type checking of expression trees.
//!
//! [`checker::check`] walks a tree once, bottom-up, and infers a type for
//! every node. Leaves are resolved through the configured
//! [`crate::environment::environment::Environment`], builtin calls are
//! handed to their namespace in the builtin registry, and operators are
//! first offered to the configured overloads. Results and resolution
//! metadata for the compiler are written into the tree's annotations.
//!
//! Only the first diagnostic of a walk is reported.

pub mod checker;
pub mod config;
pub mod func_types;
