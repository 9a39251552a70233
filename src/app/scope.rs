use super::{App, METHODS};
use crate::router::Priority;
use crate::{Request, Response, RouterError};

/// A prefix in the application.  This is generated when you call
/// [`App::at`], and every pattern registered through it is appended to the
/// prefix.  Scopes nest with [`Scope::at`].
///
/// # Examples
/// ```rust
/// # use switchyard::*;
/// # fn main() -> Result<(), anyhow::Error> {
/// let mut app = App::new();
/// let mut api = app.at("/api");
/// let mut v1 = api.at("v1");
/// v1.get("/status", |_, response| {
///     response.set_body("ok");
/// })?;
/// assert_eq!(v1.prefix(), "/api/v1");
///
/// let response = app.handle(Request::get("/api/v1/status")?);
/// assert_eq!(&response.body()[..], b"ok");
/// # Ok(())
/// # }
/// ```
pub struct Scope<'a> {
    prefix: String,
    app: &'a mut App,
}

impl<'a> Scope<'a> {
    pub(super) fn new(app: &'a mut App, prefix: &str) -> Self {
        Scope {
            prefix: join_paths("", prefix),
            app,
        }
    }

    /// The prefix every pattern in this scope is registered under.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Creates a nested scope, with the given prefix appended to this one.
    pub fn at<P: AsRef<str>>(&mut self, prefix: P) -> Scope<'_> {
        Scope {
            prefix: join_paths(&self.prefix, prefix.as_ref()),
            app: self.app,
        }
    }

    /// Registers a handler for a single method.  See [`App::method`].
    ///
    /// # Errors
    /// See [`crate::Router::add`].
    pub fn method<F>(
        &mut self,
        method: http::Method,
        pattern: &str,
        handler: F,
    ) -> Result<&mut Self, RouterError>
    where
        F: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        let pattern = join_paths(&self.prefix, pattern);
        self.app
            .register(&[method], &pattern, Priority::Medium, handler)?;
        Ok(self)
    }

    method![
        /// Registers a GET handler under this scope.
        ///
        /// # Errors
        /// See [`crate::Router::add`].
        pub fn get = http::Method::GET;
        /// Registers a POST handler under this scope.
        ///
        /// # Errors
        /// See [`crate::Router::add`].
        pub fn post = http::Method::POST;
        /// Registers a PUT handler under this scope.
        ///
        /// # Errors
        /// See [`crate::Router::add`].
        pub fn put = http::Method::PUT;
        /// Registers a DELETE handler under this scope.
        ///
        /// # Errors
        /// See [`crate::Router::add`].
        pub fn delete = http::Method::DELETE;
        /// Registers a PATCH handler under this scope.
        ///
        /// # Errors
        /// See [`crate::Router::add`].
        pub fn patch = http::Method::PATCH;
        /// Registers a HEAD handler under this scope.
        ///
        /// # Errors
        /// See [`crate::Router::add`].
        pub fn head = http::Method::HEAD;
        /// Registers an OPTIONS handler under this scope.
        ///
        /// # Errors
        /// See [`crate::Router::add`].
        pub fn options = http::Method::OPTIONS;
        /// Registers a CONNECT handler under this scope.
        ///
        /// # Errors
        /// See [`crate::Router::add`].
        pub fn connect = http::Method::CONNECT;
        /// Registers a TRACE handler under this scope.
        ///
        /// # Errors
        /// See [`crate::Router::add`].
        pub fn trace = http::Method::TRACE;
    ];

    /// Registers a handler for every method, at [`Priority::Low`].  See
    /// [`App::any`].
    ///
    /// # Errors
    /// See [`crate::Router::add`].
    pub fn any<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouterError>
    where
        F: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        let pattern = join_paths(&self.prefix, pattern);
        self.app
            .register(&METHODS, &pattern, Priority::Low, handler)?;
        Ok(self)
    }

    /// Registers an upgrade handler under this scope.  See [`App::upgrade`].
    ///
    /// # Errors
    /// See [`crate::Router::add`].
    pub fn upgrade<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouterError>
    where
        F: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        let pattern = join_paths(&self.prefix, pattern);
        self.app.upgrade(&pattern, handler)?;
        Ok(self)
    }
}

impl std::fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

fn join_paths(base: &str, extend: &str) -> String {
    if extend.is_empty() {
        return base.to_owned();
    }

    let mut buffer = String::with_capacity(base.len() + extend.len() + 1);
    buffer.push_str(base);

    match (base.ends_with('/'), extend.strip_prefix('/')) {
        (true, Some(rest)) => buffer.push_str(rest),
        (false, Some(_)) | (true, None) => buffer.push_str(extend),
        (false, None) => {
            buffer.push('/');
            buffer.push_str(extend);
        }
    }

    buffer
}
