use super::priority::HandlerRef;
use std::cmp::Ordering;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
/// What a node matches against.  The declaration order is the order in which
/// siblings are tried.
pub(crate) enum Kind {
    /// A literal segment, which must match exactly.
    Static,
    /// A `:name` segment, which captures any non-empty segment.
    Parameter,
    /// A `*` segment, which matches whatever remains of the path.
    Wildcard,
}

impl Kind {
    pub(crate) fn of(segment: &str) -> Kind {
        match segment.as_bytes().first() {
            Some(b'*') => Kind::Wildcard,
            Some(b':') => Kind::Parameter,
            _ => Kind::Static,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    name: Box<str>,
    kind: Kind,
    high_priority: bool,
    children: Vec<Node>,
    handlers: Vec<HandlerRef>,
}

impl Node {
    pub(crate) fn root() -> Self {
        Node::new("", false)
    }

    fn new(name: &str, high_priority: bool) -> Self {
        Node {
            name: name.into(),
            kind: Kind::of(name),
            high_priority,
            children: vec![],
            handlers: vec![],
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn kind(&self) -> Kind {
        self.kind
    }

    pub(crate) fn children(&self) -> &[Node] {
        &self.children[..]
    }

    pub(crate) fn handlers(&self) -> &[HandlerRef] {
        &self.handlers[..]
    }

    /// The method node under the root with the given name, ignoring ASCII
    /// case.
    pub(crate) fn method(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|node| node.name.eq_ignore_ascii_case(name))
    }

    /// Finds the child with the given name and priority flag, creating it if
    /// it does not exist.  Ordered parents insert new children at their
    /// sorted position; unordered ones (the root) append them, and match
    /// method names ignoring ASCII case.
    pub(crate) fn child(&mut self, name: &str, high_priority: bool, ordered: bool) -> &mut Node {
        let existing = self.children.iter().position(|node| {
            let same_name = if ordered {
                &*node.name == name
            } else {
                node.name.eq_ignore_ascii_case(name)
            };
            same_name && node.high_priority == high_priority
        });

        let index = match existing {
            Some(index) => index,
            None => {
                let node = Node::new(name, high_priority);
                let index = if ordered {
                    self.children.partition_point(|other| !node.precedes(other))
                } else {
                    self.children.len()
                };
                self.children.insert(index, node);
                index
            }
        };

        &mut self.children[index]
    }

    /// Inserts the handler after every handler that sorts equal or lower.
    pub(crate) fn insert_handler(&mut self, handler: HandlerRef) {
        let index = self.handlers.partition_point(|other| *other <= handler);
        self.handlers.insert(index, handler);
    }

    // High priority nodes come first, then statics, parameters, and
    // wildcards; names of the same kind go in reverse lexical order.
    fn precedes(&self, other: &Node) -> bool {
        if self.high_priority != other.high_priority {
            return self.high_priority;
        }

        match self.kind.cmp(&other.kind) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => other.name < self.name,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::router::priority::Priority;

    fn names(node: &Node) -> Vec<(&str, bool)> {
        node.children()
            .iter()
            .map(|n| (n.name(), n.high_priority))
            .collect()
    }

    #[test]
    fn test_kind() {
        assert_eq!(Kind::of("user"), Kind::Static);
        assert_eq!(Kind::of(""), Kind::Static);
        assert_eq!(Kind::of(":id"), Kind::Parameter);
        assert_eq!(Kind::of("*"), Kind::Wildcard);
    }

    #[test]
    fn test_sibling_order() {
        let mut node = Node::root();
        node.child("*", false, true);
        node.child("alpha", false, true);
        node.child(":id", false, true);
        node.child("beta", false, true);
        node.child("alpha", true, true);
        node.child("", false, true);
        assert_eq!(
            names(&node),
            [
                ("alpha", true),
                ("beta", false),
                ("alpha", false),
                ("", false),
                (":id", false),
                ("*", false)
            ]
        );
    }

    #[test]
    fn test_existing_child() {
        let mut node = Node::root();
        node.child("a", false, true).child("b", false, true);
        node.child("a", false, true).child("c", false, true);
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.children()[0].children().len(), 2);
    }

    #[test]
    fn test_unordered() {
        let mut node = Node::root();
        node.child("POST", false, false);
        node.child("GET", false, false);
        node.child("DELETE", false, false);
        assert_eq!(
            names(&node),
            [("POST", false), ("GET", false), ("DELETE", false)]
        );
    }

    #[test]
    fn test_method_case() {
        let mut node = Node::root();
        node.child("PURGE", false, false);
        node.child("purge", false, false);
        node.child("Get", false, false);
        assert_eq!(names(&node), [("PURGE", false), ("Get", false)]);
        assert_eq!(node.method("purge").map(Node::name), Some("PURGE"));
        assert_eq!(node.method("GET").map(Node::name), Some("Get"));
        assert!(node.method("POST").is_none());

        let get = node.child("GET", false, false);
        get.child("Static", false, true);
        get.child("static", false, true);
        assert_eq!(names(get), [("static", false), ("Static", false)]);
    }

    #[test]
    fn test_handler_order() {
        let mut node = Node::root();
        node.insert_handler(HandlerRef::new(Priority::Low, 0).unwrap());
        node.insert_handler(HandlerRef::new(Priority::Medium, 1).unwrap());
        node.insert_handler(HandlerRef::new(Priority::Medium, 2).unwrap());
        node.insert_handler(HandlerRef::new(Priority::High, 3).unwrap());
        let order = node.handlers().iter().map(|h| h.index()).collect::<Vec<_>>();
        assert_eq!(order, [3, 1, 2, 0]);
    }
}
