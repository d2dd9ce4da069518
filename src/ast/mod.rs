/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the expression tree
///
/// Submodules:
/// - ast: Arena-backed tree, node variants and opaque constants
/// - annotations: Per-node checker output, keyed by node id
pub mod annotations;
pub mod ast;
