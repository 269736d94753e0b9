/// Which slot of its parent a node occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
    /// The node has no parent; the tree itself owns it.
    Root,
}

/// The structural case of a deletion, which decides how the tree is spliced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DeleteCase {
    /// The node has no children and is simply detached.
    Leaf,
    /// The node's only child takes its place.
    OneChild,
    /// The node takes its successor's key and the successor is detached instead.
    TwoChildren,
}
