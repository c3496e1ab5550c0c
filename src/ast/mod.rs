/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Node kinds and the tree itself
/// - scopes: Function scopes, symbol handles and the scope arena
/// - types: The type lattice filled in by inference
pub mod ast;
pub mod scopes;
pub mod types;
