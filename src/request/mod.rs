pub(crate) mod fragment;

use self::fragment::{Fragment, FragmentSelect};
use crate::HasHeaders;
use std::str::FromStr;
use std::sync::Arc;

macro_rules! forward {
    () => {};
    (
        $(#[$m:meta])* $v:vis fn $name:ident(&self $(, $pn:ident: $pt:ty)*) -> $ret:ty;
        $($tail:tt)*
    ) => {
        $(#[$m])* $v fn $name(&self $(, $pn: $pt)*) -> $ret {
            (self.inner).$name($($pn),*)
        }

        forward! { $($tail)* }
    };

    (
        $(#[$m:meta])* $v:vis fn $name:ident(&mut self $(, $pn:ident: $pt:ty)*) -> $ret:ty;
        $($tail:tt)*
    ) => {
        $(#[$m])* $v fn $name(&mut self $(, $pn: $pt)*) -> $ret {
            (self.inner).$name($($pn),*)
        }

        forward! { $($tail)* }
    }
}

macro_rules! construct {
    () => {};
    ($($(#[$m:meta])* $v:vis fn $method:ident = $action:expr;)+) => {
        $($(#[$m])* $v fn $method<U>(uri: U) -> Result<Self, http::Error>
        where
            http::Uri: TryFrom<U>,
            <http::Uri as TryFrom<U>>::Error: Into<http::Error>
        {
            Request::from_method(uri, $action)
        })+
    };
}

#[derive(Debug)]
/// The request-side context handed to an application handler.
///
/// This holds the head of the HTTP request (a method, a URI, and headers) as
/// delivered by the transport, the parameters captured by the route that is
/// currently handling it, and the _yield_ flag.  A handler that sets the
/// yield flag declines the request, and routing continues on to the next
/// candidate handler.
///
/// # Examples
/// ```rust
/// # use switchyard::*;
/// fn only_numbers(request: &mut Request, response: &mut Response) {
///     match request.parameter_parse::<u32, _>(0) {
///         Some(id) => {
///             response.set_body(format!("user {}", id));
///         }
///         None => {
///             request.set_yield(true);
///         }
///     }
/// }
/// ```
pub struct Request {
    inner: http::Request<()>,
    fragment: Fragment,
    yielded: bool,
}

impl Request {
    construct! {
        /// Creates a new request initialized with the GET method and the given
        /// URI.
        ///
        /// # Examples
        /// ```rust
        /// # use switchyard::*;
        /// let request = Request::get("https://example.com/a").unwrap();
        /// assert_eq!(request.method(), http::Method::GET);
        /// ```
        pub fn get = http::Method::GET;
        /// Creates a new request initialized with the POST method and the given
        /// URI.
        pub fn post = http::Method::POST;
        /// Creates a new request initialized with the PUT method and the given
        /// URI.
        pub fn put = http::Method::PUT;
        /// Creates a new request initialized with the DELETE method and the given
        /// URI.
        pub fn delete = http::Method::DELETE;
        /// Creates a new request initialized with the HEAD method and the given
        /// URI.
        pub fn head = http::Method::HEAD;
        /// Creates a new request initialized with the OPTIONS method and the
        /// given URI.
        pub fn options = http::Method::OPTIONS;
        /// Creates a new request initialized with the TRACE method and the given
        /// URI.
        pub fn trace = http::Method::TRACE;
        /// Creates a new request initialized with the CONNECT method and the
        /// given URI.
        pub fn connect = http::Method::CONNECT;
        /// Creates a new request initialized with the PATCH method and the
        /// given URI.
        pub fn patch = http::Method::PATCH;
    }

    /// Creates a new request initialized with the provided method and the
    /// given URI.
    ///
    /// # Errors
    /// Fails if the URI could not be parsed.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// let method = http::Method::from_bytes(b"TEST").unwrap();
    /// let request = Request::from_method("https://example.com/a", method.clone()).unwrap();
    /// assert_eq!(request.method(), method);
    /// ```
    pub fn from_method<U>(uri: U, method: http::Method) -> Result<Self, http::Error>
    where
        http::Uri: TryFrom<U>,
        <http::Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        http::request::Builder::new()
            .method(method)
            .uri(uri)
            .body(())
            .map(Request::from)
    }

    /// Retrieves a captured parameter from the request, then attempts to
    /// parse it.  The key can either be a number, or a name.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// # fn main() -> Result<(), anyhow::Error> {
    /// let mut app = App::new();
    /// app.get("/buy/:amount", |request, response| {
    ///     let amount: u32 = request.parameter_parse("amount").unwrap_or(0);
    ///     response.set_body(format!("you bought {} coconuts", amount));
    /// })?;
    /// let response = app.handle(Request::get("/buy/3")?);
    /// assert_eq!(&response.body()[..], b"you bought 3 coconuts");
    /// # Ok(())
    /// # }
    /// ```
    pub fn parameter_parse<I: FromStr, K: FragmentSelect>(&self, key: K) -> Option<I> {
        self.parameter(key).and_then(|s| s.parse().ok())
    }

    /// Retrieves a captured parameter from the request.  The key can either
    /// be its position in the pattern, or its name (without the `:`).
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// # fn main() -> Result<(), anyhow::Error> {
    /// let mut app = App::new();
    /// app.get("/candy/:kind", |request, response| {
    ///     assert_eq!(request.parameter(0), request.parameter("kind"));
    ///     response.set_body(request.parameter(0).unwrap_or("none").to_owned());
    /// })?;
    /// let response = app.handle(Request::get("/candy/lollipop")?);
    /// assert_eq!(&response.body()[..], b"lollipop");
    /// # Ok(())
    /// # }
    /// ```
    pub fn parameter<K: FragmentSelect>(&self, key: K) -> Option<&str> {
        self.fragment.select(self.inner.uri().path(), key)
    }

    /// Every captured parameter, in pattern order.
    pub fn parameters(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.fragment.len()).filter_map(move |i| self.parameter(i))
    }

    /// The path of the request's URI.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// let request = Request::get("/a/b?c=d").unwrap();
    /// assert_eq!(request.url(), "/a/b");
    /// ```
    pub fn url(&self) -> &str {
        self.inner.uri().path()
    }

    /// The raw, still encoded, query string of the request, if there is one.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// let request = Request::get("/a/b?c=d").unwrap();
    /// assert_eq!(request.query(), Some("c=d"));
    /// ```
    pub fn query(&self) -> Option<&str> {
        self.inner.uri().query()
    }

    #[cfg(feature = "query")]
    /// Finds the first value for the given key in the query string, and
    /// decodes it.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// let request = Request::get("/search?q=hello%20world&page=2").unwrap();
    /// assert_eq!(request.query_value("q").as_deref(), Some("hello world"));
    /// assert_eq!(request.query_value("missing"), None);
    /// ```
    pub fn query_value(&self, key: &str) -> Option<std::borrow::Cow<'_, str>> {
        form_urlencoded::parse(self.query()?.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// The parsed `Content-Type` of the request, if it has a valid one.
    pub fn content_type(&self) -> Option<mime::Mime> {
        self.header_str(http::header::CONTENT_TYPE)
            .and_then(|v| mime::Mime::from_str(v).ok())
    }

    /// Sets the yield flag.  A handler that leaves the flag set when it
    /// returns declines the request, and routing moves on to the next
    /// candidate.  The flag is cleared before every handler runs.
    pub fn set_yield(&mut self, yielded: bool) -> &mut Self {
        self.yielded = yielded;
        self
    }

    /// Whether the current handler has declined the request.
    pub fn is_yielded(&self) -> bool {
        self.yielded
    }

    /// Converts this back into the underlying [`http::Request`].
    pub fn into_inner(self) -> http::Request<()> {
        self.inner
    }

    pub(crate) fn publish<I>(&mut self, names: &Arc<[Box<str>]>, spans: I)
    where
        I: IntoIterator<Item = std::ops::Range<usize>>,
    {
        self.fragment.set(names, spans);
    }

    pub(crate) fn clear_parameters(&mut self) {
        self.fragment.clear();
    }

    forward! {
        /// Returns a reference to the associated URI.
        ///
        /// # Examples
        /// ```rust
        /// # use switchyard::*;
        /// let request: Request = Request::get("/").unwrap();
        /// assert_eq!(&*request.uri(), "/");
        /// ```
        #[inline]
        pub fn uri(&self) -> &http::Uri;
        /// Returns a reference to the associated HTTP method.
        ///
        /// # Examples
        /// ```rust
        /// # use switchyard::*;
        /// let request: Request = Request::get("/").unwrap();
        /// assert_eq!(*request.method(), http::Method::GET);
        /// ```
        #[inline]
        pub fn method(&self) -> &http::Method;
        /// Returns the HTTP version of the request.
        #[inline]
        pub fn version(&self) -> http::Version;
        /// Returns a reference to the associated extensions.
        #[inline]
        pub fn extensions(&self) -> &http::Extensions;
        /// Returns a mutable reference to the associated extensions.
        #[inline]
        pub fn extensions_mut(&mut self) -> &mut http::Extensions;
    }
}

impl From<http::Request<()>> for Request {
    fn from(inner: http::Request<()>) -> Self {
        Request {
            inner,
            fragment: Fragment::default(),
            yielded: false,
        }
    }
}

impl crate::has_headers::sealed::Sealed for Request {}

impl crate::HasHeaders for Request {
    fn headers(&self) -> &http::HeaderMap<http::HeaderValue> {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut http::HeaderMap<http::HeaderValue> {
        self.inner.headers_mut()
    }
}
