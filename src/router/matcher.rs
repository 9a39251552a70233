use super::node::{Kind, Node};
use super::parameters::Parameters;
use super::segments::Segments;
use super::Handler;
use std::ops::Range;

/// The view of a request that a handler is invoked with.
///
/// This borrows the request path, the parameters captured on the way down the
/// trie to the handler's node, and the per-request data passed to
/// [`crate::Router::route`].
pub struct Context<'c, T> {
    method: &'c str,
    path: &'c str,
    parameters: &'c [&'c str],
    data: &'c mut T,
}

impl<'c, T> Context<'c, T> {
    /// The method the request was routed with.
    #[must_use]
    pub fn method(&self) -> &'c str {
        self.method
    }

    /// The path the request was routed with.
    #[must_use]
    pub fn path(&self) -> &'c str {
        self.path
    }

    /// The parameter captured by the `index`th `:name` segment of the
    /// matched pattern.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::{Priority, Router};
    /// # fn main() -> Result<(), switchyard::RouterError> {
    /// let mut router = Router::<Option<String>>::new();
    /// router.add(&[http::Method::GET], "/candy/:kind", |context| {
    ///     let kind = context.parameter(0).map(str::to_owned);
    ///     *context.data_mut() = kind;
    ///     true
    /// }, Priority::Medium)?;
    ///
    /// let mut captured = None;
    /// assert!(router.route("GET", "/candy/lollipop", &mut captured));
    /// assert_eq!(captured.as_deref(), Some("lollipop"));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn parameter(&self, index: usize) -> Option<&'c str> {
        self.parameters.get(index).copied()
    }

    /// Every captured parameter, in pattern order.
    #[must_use]
    pub fn parameters(&self) -> &'c [&'c str] {
        self.parameters
    }

    /// The byte ranges of the captured parameters within [`Context::path`].
    pub fn parameter_spans(&self) -> impl Iterator<Item = Range<usize>> + 'c {
        let base = self.path.as_ptr() as usize;
        let parameters = self.parameters;
        parameters.iter().map(move |value| {
            let start = value.as_ptr() as usize - base;
            start..start + value.len()
        })
    }

    /// The per-request data.
    pub fn data(&self) -> &T {
        &*self.data
    }

    /// The per-request data, mutably.
    pub fn data_mut(&mut self) -> &mut T {
        &mut *self.data
    }
}

impl<T> std::fmt::Debug for Context<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// The per-request state of a single matching pass.
pub(super) struct Matcher<'r, 'p, T> {
    handlers: &'r [Handler<T>],
    method: &'p str,
    path: &'p str,
    segments: Segments<'p>,
    parameters: Parameters<'p>,
}

impl<'r, 'p, T> Matcher<'r, 'p, T> {
    pub(super) fn new(handlers: &'r [Handler<T>], method: &'p str, path: &'p str) -> Self {
        let mut matcher = Matcher {
            handlers,
            method,
            path,
            segments: Segments::new(path),
            parameters: Parameters::new(),
        };
        matcher.reset(method, path);
        matcher
    }

    /// Readies the matcher for another request, dropping every cached
    /// segment and captured parameter.
    pub(super) fn reset(&mut self, method: &'p str, path: &'p str) {
        self.method = method;
        self.path = path;
        self.segments.reset(path);
        self.parameters.reset();
    }

    /// Walks the subtree at `node`, starting from the segment at `depth`,
    /// until a handler accepts the request.
    pub(super) fn execute(&mut self, node: &Node, depth: usize, data: &mut T) -> bool {
        let segment = match self.segments.get(depth) {
            Some(segment) => segment,
            None => return self.run(node, data),
        };

        for child in node.children() {
            let accepted = match child.kind() {
                Kind::Wildcard => self.run(child, data),
                Kind::Parameter if !segment.is_empty() => {
                    self.parameters.push(segment);
                    let accepted = self.execute(child, depth + 1, data);
                    if !accepted {
                        self.parameters.pop();
                    }
                    accepted
                }
                Kind::Parameter => false,
                Kind::Static => child.name() == segment && self.execute(child, depth + 1, data),
            };

            if accepted {
                return true;
            }
        }

        false
    }

    // Runs the node's handlers in order until one does not yield.
    fn run(&self, node: &Node, data: &mut T) -> bool {
        node.handlers().iter().any(|handler| {
            let mut context = Context {
                method: self.method,
                path: self.path,
                parameters: self.parameters.as_slice(),
                data: &mut *data,
            };
            (self.handlers[handler.index()])(&mut context)
        })
    }
}
