mod node;
mod tree;

pub use node::{Node, NodeState};
pub use tree::{BuildStats, TreeCache};
