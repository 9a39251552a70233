mod matcher;
mod node;
mod parameters;
mod priority;
mod segments;

pub use self::matcher::Context;
pub use self::priority::{HandlerRef, Priority, HANDLER_BITS, HANDLER_MASK};
pub use self::segments::MAX_URL_SEGMENTS;

use self::matcher::Matcher;
use self::node::{Kind, Node};
use self::segments::Segments;
use crate::RouterError;

pub(crate) type Handler<T> = Box<dyn Fn(&mut Context<'_, T>) -> bool + Send + Sync>;

/// A priority-ordered route table.
///
/// This contains a trie of path segments, rooted at one node per HTTP
/// method, and a flat list of every handler that was registered.  Each trie
/// node carries the handlers registered at its pattern, as [`HandlerRef`]s
/// kept sorted by [`Priority`], then registration order.
///
/// A pattern is a `/`-separated list of segments, where each segment is
/// either a literal (`user`), a parameter (`:id`), which captures any
/// non-empty segment, or a wildcard (`*`), which must come last and matches
/// whatever remains of the path.  So, assuming the following routes:
///
/// ```text
/// GET /user/agent   -> agent
/// GET /candy/:kind  -> candy
/// GET /*            -> everything_else
/// ```
///
/// `GET /candy/lollipop` runs `candy` with the parameter `lollipop`, and
/// `GET /unknown/path` runs `everything_else`.
///
/// # Matching
///
/// The matcher walks the trie depth-first.  At each node, siblings are
/// tried in this order: nodes holding [`Priority::High`] registrations,
/// then literals (in reverse lexical order), then parameters, then
/// wildcards.  Once the path runs out (or a wildcard is reached), the
/// node's handlers are run in order; a handler returning `false` _yields_,
/// and the matcher moves on to the next handler, and then back up the trie
/// to the next candidate node.  The first handler to return `true` ends the
/// search.
///
/// Registration requires `&mut self`, and routing only `&self`; once every
/// route is registered, the table can be shared between threads freely.
pub struct Router<T> {
    root: Node,
    handlers: Vec<Handler<T>>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Router {
            root: Node::root(),
            handlers: vec![],
        }
    }
}

impl<T> Router<T> {
    /// Creates an empty router.  This is the same as [`Router::default`].
    #[must_use]
    pub fn new() -> Self {
        Router::default()
    }

    /// Registers a handler at the given pattern, for each of the given
    /// methods.
    ///
    /// The handler is stored once, regardless of the number of methods.
    /// [`Priority::High`] registrations create their own trie nodes, apart
    /// from ordinary ones with the same name, so that they are always probed
    /// first.
    ///
    /// # Errors
    /// Returns an error, without modifying the router, if the pattern is
    /// empty, does not start with a `/`, is deeper than
    /// [`MAX_URL_SEGMENTS`], contains an unnamed parameter or a wildcard
    /// that is not the final segment; if no methods were given; or if the
    /// router already holds the maximum number of handlers.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::{Priority, Router, RouterError};
    /// let mut router = Router::<u32>::new();
    /// router.add(&[http::Method::GET], "/count", |context| {
    ///     *context.data_mut() += 1;
    ///     true
    /// }, Priority::Medium)?;
    ///
    /// let error = router.add(&[http::Method::GET], "count", |_| true, Priority::Medium);
    /// assert!(matches!(error, Err(RouterError::MissingLeadingSlash(_))));
    /// # Ok::<(), RouterError>(())
    /// ```
    pub fn add<F>(
        &mut self,
        methods: &[http::Method],
        pattern: &str,
        handler: F,
        priority: Priority,
    ) -> Result<(), RouterError>
    where
        F: Fn(&mut Context<'_, T>) -> bool + Send + Sync + 'static,
    {
        validate(pattern)?;
        if methods.is_empty() {
            return Err(RouterError::NoMethods(pattern.to_owned()));
        }
        let handler_ref =
            HandlerRef::new(priority, self.handlers.len()).ok_or(RouterError::TooManyHandlers)?;
        let high_priority = priority == Priority::High;

        for method in methods {
            let mut node = self.root.child(method.as_str(), false, false);
            let mut segments = Segments::new(pattern);
            let mut depth = 0;
            while let Some(segment) = segments.get(depth) {
                node = node.child(segment, high_priority, true);
                depth += 1;
            }
            node.insert_handler(handler_ref);

            log::trace!(
                "add: {} {} ({:?}) -> {:?}",
                method,
                pattern,
                priority,
                handler_ref
            );
        }

        self.handlers.push(Box::new(handler));
        Ok(())
    }

    /// Routes a request, running handlers until one accepts it.  Returns
    /// whether any handler did; `false` means that there was no route for
    /// this method and path, or that every candidate yielded.
    ///
    /// The method is compared against registered methods ignoring ASCII
    /// case.  The path is used as-is; in particular, any query string must
    /// already have been removed.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::{Priority, Router};
    /// # fn main() -> Result<(), switchyard::RouterError> {
    /// let mut router = Router::<Vec<&'static str>>::new();
    /// router.add(&[http::Method::GET], "/static/yes", |context| {
    ///     context.data_mut().push("declined");
    ///     false
    /// }, Priority::Medium)?;
    /// router.add(&[http::Method::GET], "/static/yes", |context| {
    ///     context.data_mut().push("accepted");
    ///     true
    /// }, Priority::Medium)?;
    ///
    /// let mut trail = vec![];
    /// assert!(router.route("GET", "/static/yes", &mut trail));
    /// assert_eq!(trail, ["declined", "accepted"]);
    /// assert!(!router.route("POST", "/static/yes", &mut trail));
    /// # Ok(())
    /// # }
    /// ```
    pub fn route(&self, method: &str, path: &str, data: &mut T) -> bool {
        let accepted = match self.root.method(method) {
            Some(node) => Matcher::new(&self.handlers[..], method, path).execute(node, 0, data),
            None => false,
        };

        if accepted {
            log::trace!("route: {} {} --> accepted", method, path);
        } else {
            log::debug!("route: {} {} --> no handler accepted", method, path);
        }

        accepted
    }

    /// The number of handlers registered with this router.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<T> std::fmt::Debug for Router<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("root", &self.root)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// The names of the parameters in a pattern, in order, without their `:`.
pub(crate) fn parameter_names(pattern: &str) -> Vec<Box<str>> {
    let mut segments = Segments::new(pattern);
    (0..)
        .map_while(|depth| segments.get(depth))
        .filter(|segment| Kind::of(segment) == Kind::Parameter)
        .map(|segment| segment[1..].into())
        .collect()
}

fn validate(pattern: &str) -> Result<(), RouterError> {
    if pattern.is_empty() {
        return Err(RouterError::EmptyPattern);
    }
    if !pattern.starts_with('/') {
        return Err(RouterError::MissingLeadingSlash(pattern.to_owned()));
    }

    let mut segments = Segments::new(pattern);
    let mut depth = 0;
    while let Some(segment) = segments.get(depth) {
        let is_last = segments.get(depth + 1).is_none();
        match Kind::of(segment) {
            Kind::Parameter if segment.len() == 1 => {
                return Err(RouterError::UnnamedParameter(pattern.to_owned()));
            }
            Kind::Wildcard if !is_last => {
                return Err(RouterError::MisplacedWildcard(pattern.to_owned()));
            }
            _ => {}
        }
        depth += 1;
    }

    if segments.is_exhausted() {
        Ok(())
    } else {
        Err(RouterError::TooManySegments(pattern.to_owned()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use http::Method;

    type Trail = Vec<(&'static str, Vec<String>)>;

    fn record(name: &'static str, accept: bool) -> impl Fn(&mut Context<'_, Trail>) -> bool {
        move |context: &mut Context<'_, Trail>| {
            let parameters = context.parameters().iter().map(|p| p.to_string()).collect();
            context.data_mut().push((name, parameters));
            accept
        }
    }

    fn add(router: &mut Router<Trail>, method: Method, pattern: &str, name: &'static str) {
        router
            .add(&[method], pattern, record(name, true), Priority::Medium)
            .unwrap();
    }

    fn route(router: &Router<Trail>, method: &str, path: &str) -> Option<Trail> {
        let mut trail = vec![];
        if router.route(method, path, &mut trail) {
            Some(trail)
        } else {
            None
        }
    }

    fn last(trail: Option<Trail>) -> Option<(&'static str, Vec<String>)> {
        trail.and_then(|mut t| t.pop())
    }

    fn scenario() -> Router<Trail> {
        let mut router = Router::new();
        add(&mut router, Method::GET, "/user/agent", "agent");
        add(&mut router, Method::GET, "/static/yes", "static");
        add(&mut router, Method::GET, "/candy/:kind", "candy");
        add(&mut router, Method::GET, "/*", "wildcard");
        router
    }

    #[test]
    fn test_scenario() {
        let router = scenario();
        assert_eq!(
            last(route(&router, "GET", "/candy/lollipop")),
            Some(("candy", vec!["lollipop".to_owned()]))
        );
        assert_eq!(
            last(route(&router, "GET", "/unknown/path")),
            Some(("wildcard", vec![]))
        );
        assert_eq!(last(route(&router, "GET", "/user/agent")), Some(("agent", vec![])));
        assert_eq!(last(route(&router, "GET", "/static/yes")), Some(("static", vec![])));
        assert!(route(&router, "POST", "/user/agent").is_none());
    }

    #[test]
    fn test_method_case() {
        let router = scenario();
        assert!(route(&router, "get", "/user/agent").is_some());
    }

    #[test]
    fn test_extension_method_case() {
        let mut router = Router::new();
        let upper = Method::from_bytes(b"PURGE").unwrap();
        let lower = Method::from_bytes(b"purge").unwrap();
        router
            .add(&[upper], "/cache", record("upper", false), Priority::Medium)
            .unwrap();
        add(&mut router, lower, "/cache", "lower");

        let trail = route(&router, "PURGE", "/cache").unwrap();
        let names = trail.iter().map(|(n, _)| *n).collect::<Vec<_>>();
        assert_eq!(names, ["upper", "lower"]);
        assert_eq!(last(route(&router, "purge", "/cache")), Some(("lower", vec![])));
    }

    #[test]
    fn test_exact_literal() {
        let mut router = Router::new();
        add(&mut router, Method::GET, "/", "root");
        add(&mut router, Method::GET, "/a/b/c", "abc");
        add(&mut router, Method::DELETE, "/a/b/c", "delete");
        assert_eq!(last(route(&router, "GET", "/")), Some(("root", vec![])));
        assert_eq!(last(route(&router, "GET", "/a/b/c")), Some(("abc", vec![])));
        assert_eq!(last(route(&router, "DELETE", "/a/b/c")), Some(("delete", vec![])));
        assert!(route(&router, "GET", "/a/b").is_none());
        assert!(route(&router, "GET", "/a/b/c/d").is_none());
        assert!(route(&router, "GET", "/a/b/c/").is_none());
    }

    #[test]
    fn test_parameters() {
        let mut router = Router::new();
        add(&mut router, Method::GET, "/user/:id/post/:post", "post");
        assert_eq!(
            last(route(&router, "GET", "/user/12/post/hello")),
            Some(("post", vec!["12".to_owned(), "hello".to_owned()]))
        );
        assert!(route(&router, "GET", "/user//post/hello").is_none());
    }

    #[test]
    fn test_backtrack_parameters() {
        let mut router = Router::new();
        add(&mut router, Method::GET, "/:a/x", "x");
        add(&mut router, Method::GET, "/:b/:c/y", "y");
        assert_eq!(
            last(route(&router, "GET", "/one/two/y")),
            Some(("y", vec!["one".to_owned(), "two".to_owned()]))
        );
    }

    #[test]
    fn test_static_before_parameter() {
        let mut router = Router::new();
        add(&mut router, Method::GET, "/:id", "id");
        add(&mut router, Method::GET, "/user", "user");
        assert_eq!(last(route(&router, "GET", "/user")), Some(("user", vec![])));
        assert_eq!(
            last(route(&router, "GET", "/other")),
            Some(("id", vec!["other".to_owned()]))
        );
    }

    #[test]
    fn test_low_ascii_static_before_parameter() {
        let mut router = Router::new();
        add(&mut router, Method::GET, "/v/:id", "id");
        add(&mut router, Method::GET, "/v/123", "digits");
        add(&mut router, Method::GET, "/v/.well", "dot");
        add(&mut router, Method::GET, "/v/*", "rest");
        add(&mut router, Method::GET, "/v/!bang", "bang");
        assert_eq!(last(route(&router, "GET", "/v/123")), Some(("digits", vec![])));
        assert_eq!(last(route(&router, "GET", "/v/.well")), Some(("dot", vec![])));
        assert_eq!(last(route(&router, "GET", "/v/!bang")), Some(("bang", vec![])));
        assert_eq!(
            last(route(&router, "GET", "/v/124")),
            Some(("id", vec!["124".to_owned()]))
        );
    }

    #[test]
    fn test_fall_through_to_parameter() {
        let mut router = Router::new();
        add(&mut router, Method::GET, "/user/agent", "agent");
        add(&mut router, Method::GET, "/:id/name", "name");
        assert_eq!(
            last(route(&router, "GET", "/user/name")),
            Some(("name", vec!["user".to_owned()]))
        );
    }

    #[test]
    fn test_yield() {
        let mut router = Router::new();
        router
            .add(&[Method::GET], "/a", record("first", false), Priority::Medium)
            .unwrap();
        router
            .add(&[Method::GET], "/a", record("second", true), Priority::Medium)
            .unwrap();
        router
            .add(&[Method::GET], "/a", record("third", true), Priority::Medium)
            .unwrap();
        let trail = route(&router, "GET", "/a").unwrap();
        let names = trail.iter().map(|(n, _)| *n).collect::<Vec<_>>();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn test_all_yield() {
        let mut router = Router::new();
        router
            .add(&[Method::GET], "/a", record("first", false), Priority::Medium)
            .unwrap();
        router
            .add(&[Method::GET], "/*", record("rest", false), Priority::Medium)
            .unwrap();
        let mut trail = vec![];
        assert!(!router.route("GET", "/a", &mut trail));
        let names = trail.iter().map(|(n, _)| *n).collect::<Vec<_>>();
        assert_eq!(names, ["first", "rest"]);
    }

    #[test]
    fn test_yield_falls_back_to_wildcard() {
        let mut router = Router::new();
        router
            .add(&[Method::GET], "/candy/:kind", record("candy", false), Priority::Medium)
            .unwrap();
        add(&mut router, Method::GET, "/*", "wildcard");
        let trail = route(&router, "GET", "/candy/lollipop").unwrap();
        assert_eq!(
            trail,
            [
                ("candy", vec!["lollipop".to_owned()]),
                ("wildcard", vec![])
            ]
        );
    }

    #[test]
    fn test_high_priority_first() {
        for high_first in [true, false] {
            let mut router = Router::new();
            let high = || record("high", false);
            if high_first {
                router.add(&[Method::GET], "/ws", high(), Priority::High).unwrap();
                add(&mut router, Method::GET, "/ws", "medium");
            } else {
                add(&mut router, Method::GET, "/ws", "medium");
                router.add(&[Method::GET], "/ws", high(), Priority::High).unwrap();
            }

            let trail = route(&router, "GET", "/ws").unwrap();
            let names = trail.iter().map(|(n, _)| *n).collect::<Vec<_>>();
            assert_eq!(names, ["high", "medium"]);
        }
    }

    #[test]
    fn test_priority_within_node() {
        let mut router = Router::new();
        let methods = [Method::GET, Method::POST];
        router
            .add(&methods, "/a", record("low", true), Priority::Low)
            .unwrap();
        router
            .add(&[Method::GET], "/a", record("medium", false), Priority::Medium)
            .unwrap();
        let trail = route(&router, "GET", "/a").unwrap();
        let names = trail.iter().map(|(n, _)| *n).collect::<Vec<_>>();
        assert_eq!(names, ["medium", "low"]);
        assert_eq!(last(route(&router, "POST", "/a")), Some(("low", vec![])));
        assert_eq!(router.len(), 2);
    }

    #[test]
    fn test_wildcard() {
        let mut router = Router::new();
        add(&mut router, Method::GET, "/files/*", "files");
        assert!(route(&router, "GET", "/files/a/b/c").is_some());
        assert!(route(&router, "GET", "/files/").is_some());
        assert!(route(&router, "GET", "/files").is_none());
        assert!(route(&router, "GET", "/other/a").is_none());
    }

    #[test]
    fn test_wildcard_keeps_parameters() {
        let mut router = Router::new();
        add(&mut router, Method::GET, "/:user/files/*", "files");
        assert_eq!(
            last(route(&router, "GET", "/alice/files/x/y")),
            Some(("files", vec!["alice".to_owned()]))
        );
    }

    #[test]
    fn test_idempotent() {
        let router = scenario();
        let first = route(&router, "GET", "/candy/gum");
        let second = route(&router, "GET", "/candy/gum");
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_deep_path() {
        let router = scenario();
        let path = "/x".repeat(MAX_URL_SEGMENTS * 2);
        assert_eq!(last(route(&router, "GET", &path)), Some(("wildcard", vec![])));
    }

    #[test]
    fn test_invalid_patterns() {
        let mut router = Router::<Trail>::new();
        let mut add = |pattern: &str| router.add(&[Method::GET], pattern, |_| true, Priority::Medium);
        assert_eq!(add(""), Err(RouterError::EmptyPattern));
        assert_eq!(
            add("user"),
            Err(RouterError::MissingLeadingSlash("user".to_owned()))
        );
        assert_eq!(
            add("/user/:"),
            Err(RouterError::UnnamedParameter("/user/:".to_owned()))
        );
        assert_eq!(
            add("/*/user"),
            Err(RouterError::MisplacedWildcard("/*/user".to_owned()))
        );
        let deep = "/x".repeat(MAX_URL_SEGMENTS + 1);
        assert_eq!(add(&deep), Err(RouterError::TooManySegments(deep.clone())));
        assert!(add(&"/x".repeat(MAX_URL_SEGMENTS)).is_ok());
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_no_methods() {
        let mut router = Router::<Trail>::new();
        let result = router.add(&[], "/a", |_| true, Priority::Medium);
        assert_eq!(result, Err(RouterError::NoMethods("/a".to_owned())));
        assert!(router.is_empty());
    }

    #[test]
    fn test_parameter_names() {
        assert_eq!(
            parameter_names("/user/:id/post/:post/*"),
            vec![Box::from("id"), Box::from("post")]
        );
        assert!(parameter_names("/").is_empty());
    }

    #[test]
    fn test_shared() {
        fn assert_send_sync<S: Send + Sync>(_: &S) {}
        let router = scenario();
        assert_send_sync(&router);
        let router = std::sync::Arc::new(router);
        let handles = (0..4)
            .map(|_| {
                let router = router.clone();
                std::thread::spawn(move || last(route(&router, "GET", "/candy/gum")))
            })
            .collect::<Vec<_>>();
        for handle in handles {
            assert_eq!(
                handle.join().unwrap(),
                Some(("candy", vec!["gum".to_owned()]))
            );
        }
    }
}
