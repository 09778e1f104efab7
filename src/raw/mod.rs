//! The private tree cores backing the public multiset collections.

pub(crate) mod avl;
pub(crate) mod node;
pub(crate) mod treap;
