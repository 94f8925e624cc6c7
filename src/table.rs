use crate::decision_tree::Answers;
use crate::functions;
use crate::value::Value;
use thiserror::Error;

/// Labeled training data: one row of attribute values per example, a
/// parallel list of actions, and a name for each column.
///
/// Row width, action count and attribute count are validated at
/// construction, so every table handed to [`crate::DecisionTree::fit`] is
/// known to be aligned and non-empty.
#[derive(Debug, Clone)]
pub struct ExampleTable<A> {
    attributes: Vec<String>,
    rows: Vec<Vec<Value>>,
    actions: Vec<A>,
}

impl<A> ExampleTable<A> {
    pub fn new(
        attributes: Vec<String>,
        rows: Vec<Vec<Value>>,
        actions: Vec<A>,
    ) -> Result<Self, TableError> {
        if rows.is_empty() {
            return Err(TableError::EmptyTable);
        }

        if rows.len() != actions.len() {
            return Err(TableError::ActionCountMismatch);
        }

        if rows.iter().any(|row| row.len() != attributes.len()) {
            return Err(TableError::ColumnSizeMismatch);
        }

        Ok(Self {
            attributes,
            rows,
            actions,
        })
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    pub fn rows_len(&self) -> usize {
        self.rows.len()
    }

    /// The answers map a classifier would be given for one training row.
    pub fn row_answers(&self, row: usize) -> Answers {
        self.attributes
            .iter()
            .cloned()
            .zip(self.rows[row].iter().cloned())
            .collect()
    }

    pub(crate) fn column<'b>(&'b self, column: usize) -> impl 'b + Iterator<Item = &'b Value> + Clone {
        self.rows.iter().map(move |row| &row[column])
    }
}

impl<A: Clone> ExampleTable<A> {
    /// One sub-table per distinct value of the given column, in
    /// first-occurrence order. The column is removed from the retained rows
    /// and from the attribute list in lockstep.
    pub(crate) fn partition(&self, column: usize) -> Vec<(Value, ExampleTable<A>)> {
        let attributes = self
            .attributes
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != column)
            .map(|(_, attribute)| attribute.clone())
            .collect::<Vec<_>>();

        functions::distinct(self.column(column))
            .into_iter()
            .map(|value| {
                let mut rows = Vec::new();
                let mut actions = Vec::new();
                for (row, action) in self.rows.iter().zip(self.actions.iter()) {
                    if &row[column] != value {
                        continue;
                    }
                    rows.push(
                        row.iter()
                            .enumerate()
                            .filter(|(index, _)| *index != column)
                            .map(|(_, v)| v.clone())
                            .collect(),
                    );
                    actions.push(action.clone());
                }
                let table = ExampleTable {
                    attributes: attributes.clone(),
                    rows,
                    actions,
                };
                (value.clone(), table)
            })
            .collect()
    }
}

/// Incrementally assembles an [`ExampleTable`], validating each row as it
/// arrives.
#[derive(Debug)]
pub struct TableBuilder<A> {
    attributes: Vec<String>,
    rows: Vec<Vec<Value>>,
    actions: Vec<A>,
}

impl<A> TableBuilder<A> {
    pub fn new(attributes: &[&str]) -> Self {
        Self {
            attributes: attributes.iter().map(|&a| a.to_owned()).collect(),
            rows: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn add_row(&mut self, values: &[Value], action: A) -> Result<(), TableError> {
        if values.len() != self.attributes.len() {
            return Err(TableError::ColumnSizeMismatch);
        }

        self.rows.push(values.to_vec());
        self.actions.push(action);
        Ok(())
    }

    pub fn build(self) -> Result<ExampleTable<A>, TableError> {
        ExampleTable::new(self.attributes, self.rows, self.actions)
    }
}

#[derive(Debug, Error, Clone)]
pub enum TableError {
    #[error("table must have at least one row")]
    EmptyTable,

    #[error("a row has a different column count from the attribute list")]
    ColumnSizeMismatch,

    #[error("the number of actions differs from the number of rows")]
    ActionCountMismatch,
}
