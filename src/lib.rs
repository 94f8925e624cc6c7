pub use self::criterion::{entropy, information_gain, weighted_entropy_sum};
pub use self::decision_tree::{
    Answers, Branch, BranchTest, DecisionTree, Node, NodeKind, Predicate, TreeError,
};
pub use self::table::{ExampleTable, TableBuilder, TableError};
pub use self::value::Value;

mod criterion;
mod decision_tree;
mod functions;
mod table;
mod value;
