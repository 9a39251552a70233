use bytes::Bytes;

#[derive(Debug)]
#[must_use]
/// The response-side context handed to an application handler.
///
/// This consists of a status code, some headers, and a body, which the
/// transport writes out once routing has finished.  This type offers
/// convenient helpers for constructing HTTP responses for common use-cases.
///
/// # Examples
///
/// ```rust
/// use switchyard::{App, Request, Response};
///
/// # fn main() -> Result<(), anyhow::Error> {
/// let mut app = App::new();
/// app.get("/hello/:target", |request, response| {
///     let target = request.parameter("target").unwrap_or("world");
///     *response = Response::text(format!("hello, {}", target));
/// })?;
/// let response = app.handle(Request::get("/hello/there")?);
/// assert_eq!(response.status(), http::StatusCode::OK);
/// assert_eq!(&response.body()[..], b"hello, there");
/// # Ok(())
/// # }
/// ```
pub struct Response(http::Response<Bytes>);

#[derive(Copy, Clone, Debug)]
struct ContinueWritten;

macro_rules! forward {
    () => {};
    (
        $(#[$m:meta])* $v:vis fn $name:ident(&self $(, $pn:ident: $pt:ty)*) -> $ret:ty;
        $($tail:tt)*
    ) => {
        $(#[$m])* $v fn $name(&self $(, $pn: $pt)*) -> $ret {
            (self.0).$name($($pn),*)
        }

        forward! { $($tail)* }
    };

    (
        $(#[$m:meta])* $v:vis fn $name:ident(&mut self $(, $pn:ident: $pt:ty)*) -> $ret:ty;
        $($tail:tt)*
    ) => {
        $(#[$m])* $v fn $name(&mut self $(, $pn: $pt)*) -> $ret {
            (self.0).$name($($pn),*)
        }

        forward! { $($tail)* }
    }
}

impl Response {
    /// Creates an empty response with a status code of 204.
    ///
    /// See [`Response::empty_status`] for more information.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// let response = Response::empty_204();
    /// assert_eq!(response.status(), http::StatusCode::NO_CONTENT);
    /// ```
    pub fn empty_204() -> Self {
        Response::empty_status(http::StatusCode::NO_CONTENT)
    }

    /// Creates an empty response with a status code of 404.  This is what
    /// [`crate::App`] responds with when no route accepts a request.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// let response = Response::empty_404();
    /// assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
    /// ```
    pub fn empty_404() -> Self {
        Response::empty_status(http::StatusCode::NOT_FOUND)
    }

    /// Creates an empty response with a status code of 500.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// let response = Response::empty_500();
    /// assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    /// ```
    pub fn empty_500() -> Self {
        Response::empty_status(http::StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Creates a response with an empty body and a set status.  The
    /// Content-Type is not set.
    pub fn empty_status(status: http::StatusCode) -> Self {
        Response::default().with_status(status)
    }

    /// Creates a response with the given text body.  The returned response
    /// has a `Content-Type` of `text/plain; charset=utf-8`.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// let response = Response::text("hello, world");
    /// assert_eq!(&response.body()[..], b"hello, world");
    /// ```
    pub fn text<V: Into<String>>(body: V) -> Self {
        let mut response = Response(http::Response::new(Bytes::from(body.into())));
        response.0.headers_mut().insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }

    #[cfg(feature = "json")]
    /// Creates a response with the given JSON body.  The returned response
    /// has a `Content-Type` of `application/json; charset=utf-8`.
    ///
    /// # Errors
    /// This errors if the underlying JSON serialization fails; and it will
    /// return that exact error.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// let response = Response::json(&vec!["hello", "world"])?;
    /// assert_eq!(&response.body()[..], br#"["hello","world"]"#);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn json<V: serde::Serialize>(body: &V) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_vec(body)?;
        let mut response = Response(http::Response::new(Bytes::from(value)));
        response.0.headers_mut().insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json; charset=utf-8"),
        );
        Ok(response)
    }

    /// Returns a response with the new status code.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// let response = Response::empty_404();
    /// let response = response.with_status(http::StatusCode::OK);
    /// assert_eq!(response.status(), http::StatusCode::OK);
    /// ```
    pub fn with_status<S: Into<http::StatusCode>>(mut self, status: S) -> Self {
        self.set_status(status);
        self
    }

    /// Sets the status code in place.
    pub fn set_status<S: Into<http::StatusCode>>(&mut self, status: S) -> &mut Self {
        *self.0.status_mut() = status.into();
        self
    }

    /// Replaces the body.  Note that this does _not_ update the
    /// Content-Type; the caller is responsible for that.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// let mut response = Response::empty_404();
    /// response.set_body("404!");
    /// assert_eq!(&response.body()[..], b"404!");
    /// assert_eq!(response.header(http::header::CONTENT_TYPE), None);
    /// ```
    pub fn set_body<B: Into<Bytes>>(&mut self, body: B) -> &mut Self {
        *self.0.body_mut() = body.into();
        self
    }

    /// The body written so far.
    pub fn body(&self) -> &Bytes {
        self.0.body()
    }

    /// Records that the transport must send an interim `100 Continue`
    /// before reading the request body.  Answering `Expect: 100-continue`
    /// is done automatically by [`crate::App`] before a handler runs.
    pub fn write_continue(&mut self) -> &mut Self {
        self.0.extensions_mut().insert(ContinueWritten);
        self
    }

    /// Whether [`Response::write_continue`] was called.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// let mut response = Response::default();
    /// assert!(!response.continue_written());
    /// response.write_continue();
    /// assert!(response.continue_written());
    /// ```
    pub fn continue_written(&self) -> bool {
        self.0.extensions().get::<ContinueWritten>().is_some()
    }

    /// Converts this into the underlying [`http::Response`].
    pub fn into_inner(self) -> http::Response<Bytes> {
        self.0
    }

    forward! {
        /// Returns the [`http::StatusCode`].
        ///
        /// # Examples
        ///
        /// ```rust
        /// # use switchyard::*;
        /// let response = Response::default();
        /// assert_eq!(response.status(), http::StatusCode::OK);
        /// ```
        pub fn status(&self) -> http::StatusCode;
        /// Returns a reference to the associated extensions.
        pub fn extensions(&self) -> &http::Extensions;
        /// Returns a mutable reference to the associated extensions.
        pub fn extensions_mut(&mut self) -> &mut http::Extensions;
    }
}

impl Default for Response {
    fn default() -> Self {
        Response(http::Response::new(Bytes::new()))
    }
}

impl From<http::Response<Bytes>> for Response {
    fn from(inner: http::Response<Bytes>) -> Self {
        Response(inner)
    }
}

impl From<Response> for http::Response<Bytes> {
    fn from(this: Response) -> Self {
        this.0
    }
}

impl crate::has_headers::sealed::Sealed for Response {}

impl crate::HasHeaders for Response {
    fn headers(&self) -> &http::HeaderMap<http::HeaderValue> {
        self.0.headers()
    }

    fn headers_mut(&mut self) -> &mut http::HeaderMap<http::HeaderValue> {
        self.0.headers_mut()
    }
}
