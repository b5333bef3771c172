use std::collections::BTreeMap;
use std::num::ParseIntError;

/// Failure of [`QueryNode::id`].
///
/// Purely local to the accessor: the tree it was called on stays valid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("argument missing")]
    Missing,

    #[error("argument not numeric: {argument:?}")]
    NotNumeric {
        argument: String,
        #[source]
        source: ParseIntError,
    },
}

/// A `.name(argument)` call attached to a selection.
///
/// # Example
/// ```text
/// friends.after(3500401).first(2) { .. }
///        ^^^^^^^^^^^^^^^^^^^^^^^^
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub name: String,
    pub argument: Option<String>,
}

/// Whether a selection is a plain field or a nested object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Scalar field, nothing selected below it
    #[default]
    Leaf,

    /// Nested object; children keyed by their name
    Composite(BTreeMap<String, QueryNode>),
}

/// One requested object or field of a parsed query.
///
/// The root node names the requested record, e.g. `node` in
/// `node(123){id,name}`, and is always composite.
///
/// # Examples
///
/// ```
/// use sprig_query::parse;
///
/// let root = parse("node(){id,name,obj{a,b}}").unwrap();
/// assert_eq!(root.name(), "node");
/// assert_eq!(root.field_names(), vec!["id", "name", "obj"]);
/// assert_eq!(root.plain_fields(), vec!["id", "name"]);
/// assert_eq!(root.field("obj").unwrap().field_names(), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryNode {
    name: String,
    argument: Option<String>,
    calls: Vec<Call>,
    selection: Selection,
}

impl QueryNode {
    /// A leaf selection without argument.
    pub(crate) fn leaf(name: impl Into<String>) -> Self {
        QueryNode {
            name: name.into(),
            argument: None,
            calls: Vec::new(),
            selection: Selection::Leaf,
        }
    }

    /// A composite selection with no children yet.
    pub(crate) fn composite(name: impl Into<String>) -> Self {
        QueryNode {
            selection: Selection::Composite(BTreeMap::new()),
            ..QueryNode::leaf(name)
        }
    }

    pub(crate) fn set_argument(&mut self, argument: Option<String>) {
        self.argument = argument;
    }

    pub(crate) fn push_call(&mut self, call: Call) {
        self.calls.push(call);
    }

    /// Registers `child` under its name, replacing an earlier child of the
    /// same name. Turns a leaf into a composite.
    pub(crate) fn insert_child(&mut self, child: QueryNode) {
        match &mut self.selection {
            Selection::Composite(children) => {
                children.insert(child.name.clone(), child);
            }
            Selection::Leaf => {
                let children = BTreeMap::from([(child.name.clone(), child)]);
                self.selection = Selection::Composite(children);
            }
        }
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut QueryNode> {
        match &mut self.selection {
            Selection::Composite(children) => children.get_mut(name),
            Selection::Leaf => None,
        }
    }

    /// Turns a leaf into an empty composite; existing children are kept.
    pub(crate) fn promote(&mut self) {
        if self.is_leaf() {
            self.selection = Selection::Composite(BTreeMap::new());
        }
    }

    /// Parses the argument as a base-10 signed integer.
    ///
    /// Surrounding whitespace is ignored. Negative values are accepted.
    pub fn id(&self) -> Result<i64, ArgumentError> {
        let argument = self.argument.as_deref().ok_or(ArgumentError::Missing)?;
        argument
            .trim()
            .parse::<i64>()
            .map_err(|source| ArgumentError::NotNumeric {
                argument: argument.to_string(),
                source,
            })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// Calls chained onto this selection, in source order.
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.selection, Selection::Leaf)
    }

    pub fn children(&self) -> Option<&BTreeMap<String, QueryNode>> {
        match &self.selection {
            Selection::Composite(children) => Some(children),
            Selection::Leaf => None,
        }
    }

    /// Names of all immediate children, sorted ascending.
    pub fn field_names(&self) -> Vec<&str> {
        self.children()
            .map(|children| children.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Names of the immediate children that are leaves, sorted ascending.
    ///
    /// This is what a store needs to project a record without descending.
    pub fn plain_fields(&self) -> Vec<&str> {
        self.children()
            .map(|children| {
                children
                    .values()
                    .filter(|child| child.is_leaf())
                    .map(QueryNode::name)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Looks up a direct child by name.
    pub fn field(&self, name: &str) -> Option<&QueryNode> {
        self.children()?.get(name)
    }

    /// Number of nested field lists below and including this node.
    ///
    /// A leaf has depth 0, `node(){id}` has depth 1.
    pub fn depth(&self) -> usize {
        match &self.selection {
            Selection::Leaf => 0,
            Selection::Composite(children) => {
                1 + children.values().map(QueryNode::depth).max().unwrap_or(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QueryNode {
        let mut root = QueryNode::composite("node");
        root.insert_child(QueryNode::leaf("name"));
        root.insert_child(QueryNode::leaf("id"));
        let mut obj = QueryNode::composite("obj");
        obj.insert_child(QueryNode::leaf("b"));
        obj.insert_child(QueryNode::leaf("a"));
        root.insert_child(obj);
        root
    }

    #[test]
    fn test_field_names_sorted() {
        let root = sample();
        assert_eq!(root.field_names(), vec!["id", "name", "obj"]);
        assert_eq!(root.plain_fields(), vec!["id", "name"]);
        assert_eq!(root.depth(), 2);
    }

    #[test]
    fn test_reinserting_replaces_child() {
        let mut root = sample();
        root.insert_child(QueryNode::leaf("obj"));
        assert_eq!(root.plain_fields(), vec!["id", "name", "obj"]);
        assert!(root.field("obj").unwrap().is_leaf());
    }

    #[test]
    fn test_insert_into_leaf_promotes() {
        let mut field = QueryNode::leaf("obj");
        field.insert_child(QueryNode::leaf("a"));
        assert!(!field.is_leaf());
        assert_eq!(field.field_names(), vec!["a"]);
    }

    #[test]
    fn test_promote_keeps_children() {
        let mut field = QueryNode::leaf("obj");
        field.promote();
        assert!(!field.is_leaf());
        assert!(field.field_names().is_empty());

        let mut root = sample();
        root.promote();
        assert_eq!(root.field_names(), vec!["id", "name", "obj"]);
    }

    #[test]
    fn test_leaf_has_no_fields() {
        let leaf = QueryNode::leaf("id");
        assert!(leaf.field_names().is_empty());
        assert!(leaf.plain_fields().is_empty());
        assert!(leaf.field("anything").is_none());
        assert_eq!(leaf.depth(), 0);
    }

    #[test]
    fn test_id() {
        let mut node = QueryNode::composite("node");
        assert_eq!(node.id(), Err(ArgumentError::Missing));

        node.set_argument(Some(" -42 ".to_string()));
        assert_eq!(node.id(), Ok(-42));

        node.set_argument(Some("abc".to_string()));
        assert!(matches!(
            node.id(),
            Err(ArgumentError::NotNumeric { argument, .. }) if argument == "abc"
        ));
    }
}
