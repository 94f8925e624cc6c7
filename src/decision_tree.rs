use crate::criterion;
use crate::functions;
use crate::table::ExampleTable;
use crate::value::Value;
use log::debug;
use rand::Rng;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;

/// The answers being classified: one value per attribute the tree may test.
pub type Answers = HashMap<String, Value>;

/// What a node does when evaluation reaches it.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind<A> {
    /// Tests the named attribute against its branches.
    Decision(String),
    /// Picks a branch at random, proportional to branch weights.
    Chance,
    /// Terminal action.
    Leaf(A),
}

impl<A> NodeKind<A> {
    pub fn decision(attribute: impl Into<String>) -> Self {
        Self::Decision(attribute.into())
    }
}

/// A one-argument test over an attribute answer.
///
/// Predicates should be total and side-effect free; branches are scanned in
/// insertion order and the first match wins, so overlapping predicates are
/// allowed.
pub struct Predicate(Box<dyn Fn(&Value) -> bool + Send + Sync>);

impl Predicate {
    pub fn new(predicate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self(Box::new(predicate))
    }

    pub fn test(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

/// How a branch decides whether it is followed.
#[derive(Debug)]
pub enum BranchTest {
    /// Followed when the tested attribute's answer equals this value.
    Value(Value),
    /// Followed when the predicate holds for the tested attribute's answer.
    Predicate(Predicate),
    /// Followed with probability `weight / total sibling weight`.
    Weight(f64),
}

#[derive(Debug)]
pub struct Branch<A> {
    test: BranchTest,
    node: Node<A>,
}

impl<A> Branch<A> {
    pub fn test(&self) -> &BranchTest {
        &self.test
    }

    pub fn node(&self) -> &Node<A> {
        &self.node
    }
}

#[derive(Debug)]
pub struct Node<A> {
    kind: NodeKind<A>,
    branches: Vec<Branch<A>>,
}

impl<A> Node<A> {
    fn new(kind: NodeKind<A>) -> Self {
        Self {
            kind,
            branches: Vec::new(),
        }
    }

    pub fn kind(&self) -> &NodeKind<A> {
        &self.kind
    }

    pub fn branches(&self) -> &[Branch<A>] {
        &self.branches
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Appends a branch followed when the tested answer equals `value`,
    /// returning the new child node for chaining.
    pub fn add_value_branch(
        &mut self,
        value: impl Into<Value>,
        next: NodeKind<A>,
    ) -> Result<&mut Node<A>, TreeError> {
        self.push_branch(BranchTest::Value(value.into()), next)
    }

    /// Appends a branch followed when `predicate` holds for the tested
    /// answer, returning the new child node for chaining.
    pub fn add_predicate_branch(
        &mut self,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
        next: NodeKind<A>,
    ) -> Result<&mut Node<A>, TreeError> {
        self.push_branch(BranchTest::Predicate(Predicate::new(predicate)), next)
    }

    /// Appends a branch followed with probability proportional to `weight`,
    /// returning the new child node for chaining.
    ///
    /// The weight must be finite and non-negative. A zero weight is legal
    /// and is never selected.
    pub fn add_weight_branch(
        &mut self,
        weight: f64,
        next: NodeKind<A>,
    ) -> Result<&mut Node<A>, TreeError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(TreeError::InvalidWeight(weight));
        }
        self.push_branch(BranchTest::Weight(weight), next)
    }

    fn push_branch(
        &mut self,
        test: BranchTest,
        next: NodeKind<A>,
    ) -> Result<&mut Node<A>, TreeError> {
        match (&self.kind, &test) {
            (NodeKind::Leaf(_), _) => return Err(TreeError::BranchUnderLeaf),
            (NodeKind::Decision(_), BranchTest::Weight(_)) => {
                return Err(TreeError::WeightBranchUnderDecision)
            }
            (NodeKind::Chance, BranchTest::Value(_))
            | (NodeKind::Chance, BranchTest::Predicate(_)) => {
                return Err(TreeError::AnswerBranchUnderChance)
            }
            _ => {}
        }

        self.branches.push(Branch {
            test,
            node: Node::new(next),
        });
        Ok(&mut self.branches.last_mut().expect("never fails").node)
    }

    // Used by the builder, which attaches already-grown subtrees. The
    // invariant still holds: builder nodes are decision nodes and the
    // branches are value branches.
    fn push_grown_branch(&mut self, value: Value, node: Node<A>) {
        self.branches.push(Branch {
            test: BranchTest::Value(value),
            node,
        });
    }

    fn find_action<R: Rng + ?Sized>(&self, answers: &Answers, rng: &mut R) -> Option<&A> {
        match &self.kind {
            NodeKind::Leaf(action) => Some(action),
            NodeKind::Decision(attribute) => {
                let answer = answers.get(attribute)?;
                debug!("testing {}: {:?}", attribute, answer);
                for branch in &self.branches {
                    let matched = match &branch.test {
                        BranchTest::Value(value) => value == answer,
                        BranchTest::Predicate(predicate) => predicate.test(answer),
                        // Construction rejects weight branches under a decision node.
                        BranchTest::Weight(_) => false,
                    };
                    if matched {
                        return branch.node.find_action(answers, rng);
                    }
                }
                None
            }
            NodeKind::Chance => {
                let total = self
                    .branches
                    .iter()
                    .map(|branch| match &branch.test {
                        BranchTest::Weight(weight) => *weight,
                        _ => 0.0,
                    })
                    .sum::<f64>();
                if total <= 0.0 {
                    return None;
                }

                let choice = rng.gen_range(0.0, total);
                debug!("total weight {} chose {}", total, choice);
                let mut acc = 0.0;
                for branch in &self.branches {
                    if let BranchTest::Weight(weight) = &branch.test {
                        acc += weight;
                        if choice < acc {
                            return branch.node.find_action(answers, rng);
                        }
                    }
                }
                // Floating-point shortfall in the accumulation: fall back to
                // the last branch.
                self.branches
                    .last()
                    .and_then(|branch| branch.node.find_action(answers, rng))
            }
        }
    }
}

/// A decision tree: a single owned root node.
///
/// Either assemble one branch by branch starting from [`DecisionTree::new`],
/// or induce one from labeled examples with [`DecisionTree::fit`].
#[derive(Debug)]
pub struct DecisionTree<A> {
    root: Node<A>,
}

impl<A> DecisionTree<A> {
    /// A tree whose root tests the given attribute.
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            root: Node::new(NodeKind::decision(attribute)),
        }
    }

    pub fn root(&self) -> &Node<A> {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node<A> {
        &mut self.root
    }

    /// Traverses the tree for the given answers and returns the terminal
    /// action, or `None` when no branch matches (a missing answer key, no
    /// value equal, no predicate true). Chance nodes draw from `rng`, so a
    /// seeded generator makes evaluation reproducible.
    pub fn classify<R: Rng + ?Sized>(&self, answers: &Answers, rng: &mut R) -> Option<&A> {
        self.root.find_action(answers, rng)
    }
}

impl<A: Clone + Eq + Hash> DecisionTree<A> {
    /// Induces a tree from the table with ID3: each node splits on the
    /// remaining attribute with the highest information gain, recursing into
    /// one value branch per distinct value until the actions in a partition
    /// are uniform or the attributes are exhausted.
    pub fn fit(table: &ExampleTable<A>) -> Self {
        Self { root: grow(table) }
    }
}

fn grow<A: Clone + Eq + Hash>(table: &ExampleTable<A>) -> Node<A> {
    if let Some(action) = uniform_action(table.actions()) {
        return Node::new(NodeKind::Leaf(action.clone()));
    }

    if table.attributes().is_empty() {
        // Actions differ but nothing is left to test: the training data is
        // ambiguous, keep the majority action.
        let action = functions::most_frequent(table.actions().iter()).expect("never fails");
        return Node::new(NodeKind::Leaf(action.clone()));
    }

    let column = best_column(table);
    debug!("splitting on {}", table.attributes()[column]);
    let mut node = Node::new(NodeKind::Decision(table.attributes()[column].clone()));
    for (value, sub) in table.partition(column) {
        node.push_grown_branch(value, grow(&sub));
    }
    node
}

fn best_column<A: Eq + Hash>(table: &ExampleTable<A>) -> usize {
    let mut best = 0;
    let mut best_gain = criterion::information_gain(table, 0);
    for column in 1..table.attributes().len() {
        let gain = criterion::information_gain(table, column);
        if gain > best_gain {
            best = column;
            best_gain = gain;
        }
    }
    best
}

fn uniform_action<A: PartialEq>(actions: &[A]) -> Option<&A> {
    let (first, rest) = actions.split_first()?;
    if rest.iter().all(|action| action == first) {
        Some(first)
    } else {
        None
    }
}

#[derive(Debug, Error, Clone)]
pub enum TreeError {
    #[error("branch weight must be finite and non-negative, got {0}")]
    InvalidWeight(f64),

    #[error("weight branches are only allowed under a chance node")]
    WeightBranchUnderDecision,

    #[error("value and predicate branches are only allowed under a decision node")]
    AnswerBranchUnderChance,

    #[error("leaf nodes cannot have outgoing branches")]
    BranchUnderLeaf,
}
