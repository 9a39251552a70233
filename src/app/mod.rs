macro_rules! method {
    ($($(#[$m:meta])* $v:vis fn $n:ident = $meth:expr;)+) => {
        $(
            $(#[$m])* $v fn $n<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouterError>
            where
                F: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
            {
                self.method($meth, pattern, handler)
            }
        )+
    };
}

mod scope;

pub use self::scope::Scope;

use crate::router::{parameter_names, Context, Priority, Router};
use crate::{HasHeaders, Request, Response, RouterError};
use std::sync::Arc;

/// Every method that [`App::any`] registers for.
pub const METHODS: [http::Method; 9] = [
    http::Method::GET,
    http::Method::POST,
    http::Method::PUT,
    http::Method::DELETE,
    http::Method::PATCH,
    http::Method::HEAD,
    http::Method::OPTIONS,
    http::Method::CONNECT,
    http::Method::TRACE,
];

/// The length of a base64-encoded, 16-byte `Sec-WebSocket-Key`.
const WEBSOCKET_KEY_LEN: usize = 24;

/// The pair handed through the router for every request.
pub(crate) struct Exchange {
    request: Request,
    response: Response,
}

type Fallback = Box<dyn Fn(&mut Request, &mut Response) + Send + Sync>;

/// An application.  This pairs a [`Router`] with a [`Request`] and
/// [`Response`] per request, the way most handlers want to see them.
///
/// Handlers are registered per method, and at a pattern (see [`Router`] for
/// the pattern syntax).  Method-specific handlers are registered at
/// [`Priority::Medium`]; [`App::any`] registers at [`Priority::Low`], so
/// catch-all routes only run after everything else has yielded, and
/// [`App::upgrade`] at [`Priority::High`], so upgrade requests are
/// intercepted before ordinary routes see them.
///
/// A handler declines a request by calling [`Request::set_yield`]; routing
/// then moves on to the next candidate.  If nothing accepts the request, the
/// fallback handler runs (see [`App::fallback`]), or an empty 404 is
/// produced.
///
/// # Examples
/// ```rust
/// # use switchyard::*;
/// # fn main() -> Result<(), anyhow::Error> {
/// let mut app = App::new();
/// app.get("/user/agent", |_, response| {
///     response.set_body("agent");
/// })?;
/// app.get("/candy/:kind", |request, response| {
///     let kind = request.parameter("kind").unwrap_or_default().to_owned();
///     response.set_body(kind);
/// })?;
/// app.any("/*", |_, response| {
///     response.set_status(http::StatusCode::NOT_FOUND).set_body("everything else");
/// })?;
///
/// let response = app.handle(Request::get("/candy/lollipop")?);
/// assert_eq!(&response.body()[..], b"lollipop");
/// let response = app.handle(Request::post("/user/agent")?);
/// assert_eq!(&response.body()[..], b"everything else");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct App {
    router: Router<Exchange>,
    fallback: Option<Fallback>,
}

impl App {
    /// Creates an application with no routes.
    #[must_use]
    pub fn new() -> Self {
        App::default()
    }

    /// Creates a [`Scope`] at the given prefix.  Every pattern registered
    /// through the scope is appended to the prefix.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// # fn main() -> Result<(), anyhow::Error> {
    /// let mut app = App::new();
    /// let mut user = app.at("/user");
    /// user.get("/:id", |request, response| {
    ///     response.set_body(format!("show {}", request.parameter(0).unwrap_or("?")));
    /// })?;
    /// user.at("/:id").post("/", |request, response| {
    ///     response.set_body(format!("update {}", request.parameter(0).unwrap_or("?")));
    /// })?;
    ///
    /// let response = app.handle(Request::get("/user/5")?);
    /// assert_eq!(&response.body()[..], b"show 5");
    /// let response = app.handle(Request::post("/user/5/")?);
    /// assert_eq!(&response.body()[..], b"update 5");
    /// # Ok(())
    /// # }
    /// ```
    pub fn at<P: AsRef<str>>(&mut self, prefix: P) -> Scope<'_> {
        Scope::new(self, prefix.as_ref())
    }

    /// Registers a handler for a single method, at [`Priority::Medium`].
    ///
    /// # Errors
    /// See [`Router::add`].
    pub fn method<F>(
        &mut self,
        method: http::Method,
        pattern: &str,
        handler: F,
    ) -> Result<&mut Self, RouterError>
    where
        F: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        self.register(&[method], pattern, Priority::Medium, handler)?;
        Ok(self)
    }

    method![
        /// Registers a GET handler at the given pattern.
        ///
        /// # Errors
        /// See [`Router::add`].
        pub fn get = http::Method::GET;
        /// Registers a POST handler at the given pattern.
        ///
        /// # Errors
        /// See [`Router::add`].
        pub fn post = http::Method::POST;
        /// Registers a PUT handler at the given pattern.
        ///
        /// # Errors
        /// See [`Router::add`].
        pub fn put = http::Method::PUT;
        /// Registers a DELETE handler at the given pattern.
        ///
        /// # Errors
        /// See [`Router::add`].
        pub fn delete = http::Method::DELETE;
        /// Registers a PATCH handler at the given pattern.
        ///
        /// # Errors
        /// See [`Router::add`].
        pub fn patch = http::Method::PATCH;
        /// Registers a HEAD handler at the given pattern.
        ///
        /// # Errors
        /// See [`Router::add`].
        pub fn head = http::Method::HEAD;
        /// Registers an OPTIONS handler at the given pattern.
        ///
        /// # Errors
        /// See [`Router::add`].
        pub fn options = http::Method::OPTIONS;
        /// Registers a CONNECT handler at the given pattern.
        ///
        /// # Errors
        /// See [`Router::add`].
        pub fn connect = http::Method::CONNECT;
        /// Registers a TRACE handler at the given pattern.
        ///
        /// # Errors
        /// See [`Router::add`].
        pub fn trace = http::Method::TRACE;
    ];

    /// Registers a handler for every method in [`METHODS`], at
    /// [`Priority::Low`].
    ///
    /// # Errors
    /// See [`Router::add`].
    pub fn any<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouterError>
    where
        F: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        self.register(&METHODS, pattern, Priority::Low, handler)?;
        Ok(self)
    }

    /// Registers a handler for WebSocket upgrade requests, at
    /// [`Priority::High`].
    ///
    /// The handler only runs for GET requests carrying a well-formed
    /// `Sec-WebSocket-Key` header; every other request yields, and falls
    /// through to the ordinary routes.
    ///
    /// # Errors
    /// See [`Router::add`].
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// # fn main() -> Result<(), anyhow::Error> {
    /// let mut app = App::new();
    /// app.upgrade("/chat", |_, response| {
    ///     response.set_status(http::StatusCode::SWITCHING_PROTOCOLS);
    /// })?;
    /// app.get("/chat", |_, response| {
    ///     response.set_body("plain");
    /// })?;
    ///
    /// let request = Request::get("/chat")?
    ///     .with_header("sec-websocket-key", "dGhlIHNhbXBsZSBub25jZQ==")?;
    /// let response = app.handle(request);
    /// assert_eq!(response.status(), http::StatusCode::SWITCHING_PROTOCOLS);
    /// let response = app.handle(Request::get("/chat")?);
    /// assert_eq!(&response.body()[..], b"plain");
    /// # Ok(())
    /// # }
    /// ```
    pub fn upgrade<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouterError>
    where
        F: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        self.register(
            &[http::Method::GET],
            pattern,
            Priority::High,
            move |request, response| {
                if is_upgrade(request) {
                    handler(request, response);
                } else {
                    request.set_yield(true);
                }
            },
        )?;
        Ok(self)
    }

    /// Sets the handler that runs when no route accepts a request.  It is
    /// given a fresh [`Response`], and the request with no parameters.
    /// Without one, [`App::handle`] produces [`Response::empty_404`].
    pub fn fallback<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        self.fallback = Some(Box::new(handler));
        self
    }

    /// Routes the request, and returns the response the accepting handler
    /// produced.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// # fn main() -> Result<(), anyhow::Error> {
    /// let mut app = App::new();
    /// let response = app.handle(Request::get("/")?);
    /// assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
    ///
    /// app.fallback(|request, response| {
    ///     response.set_body(format!("nothing at {}", request.url()));
    /// });
    /// let response = app.handle(Request::get("/a")?);
    /// assert_eq!(&response.body()[..], b"nothing at /a");
    /// # Ok(())
    /// # }
    /// ```
    pub fn handle(&self, request: Request) -> Response {
        let method = request.method().clone();
        let uri = request.uri().clone();
        let mut exchange = Exchange {
            request,
            response: Response::default(),
        };

        if self
            .router
            .route(method.as_str(), uri.path(), &mut exchange)
        {
            return exchange.response;
        }

        match &self.fallback {
            Some(fallback) => {
                let Exchange { mut request, .. } = exchange;
                let mut response = Response::default();
                request.clear_parameters();
                request.set_yield(false);
                fallback(&mut request, &mut response);
                response
            }
            None => Response::empty_404(),
        }
    }

    /// Wraps the handler so that it sees the request's captured parameters
    /// and reports acceptance through the yield flag, then adds it to the
    /// router.
    pub(crate) fn register<F>(
        &mut self,
        methods: &[http::Method],
        pattern: &str,
        priority: Priority,
        handler: F,
    ) -> Result<(), RouterError>
    where
        F: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        let names: Arc<[Box<str>]> = parameter_names(pattern).into();
        self.router.add(
            methods,
            pattern,
            move |context: &mut Context<'_, Exchange>| {
                let spans = context.parameter_spans();
                let Exchange { request, response } = context.data_mut();
                request.set_yield(false);
                request.publish(&names, spans);
                if expects_continue(request) {
                    response.write_continue();
                }
                handler(request, response);
                !request.is_yielded()
            },
            priority,
        )
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("router", &self.router)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

fn expects_continue(request: &Request) -> bool {
    request
        .header_str(http::header::EXPECT)
        .map_or(false, |value| value.eq_ignore_ascii_case("100-continue"))
}

fn is_upgrade(request: &Request) -> bool {
    request
        .header_str(http::header::SEC_WEBSOCKET_KEY)
        .map_or(false, |key| key.len() == WEBSOCKET_KEY_LEN)
}
