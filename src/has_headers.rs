/// Header access shared by [`crate::Request`] and [`crate::Response`].
///
/// Only the two accessors are required; everything else is provided on top
/// of them.  The trait is sealed, and cannot be implemented outside of this
/// crate.
pub trait HasHeaders: sealed::Sealed + Sized {
    /// The header map.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// assert!(Response::default().headers().is_empty());
    /// assert!(!Response::text("hi").headers().is_empty());
    /// ```
    fn headers(&self) -> &http::HeaderMap<http::HeaderValue>;

    /// The header map, mutably.
    fn headers_mut(&mut self) -> &mut http::HeaderMap<http::HeaderValue>;

    /// The first value of the given header, if it is present.  Names are
    /// matched case-insensitively.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// let response = Response::text("hello, world");
    /// let content_type = response.header("Content-Type").map(|v| v.as_bytes());
    /// assert_eq!(content_type, Some(&b"text/plain; charset=utf-8"[..]));
    /// ```
    fn header<H: http::header::AsHeaderName>(&self, key: H) -> Option<&http::HeaderValue> {
        self.headers().get(key)
    }

    /// The first value of the given header as a string.  Returns `None` if
    /// the header is missing, or its value is not visible ASCII.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// let request = Request::get("/")?.with_header("expect", "100-continue")?;
    /// assert_eq!(request.header_str("Expect"), Some("100-continue"));
    /// assert_eq!(request.header_str("Upgrade"), None);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    fn header_str<H: http::header::AsHeaderName>(&self, key: H) -> Option<&str> {
        self.header(key).and_then(|value| value.to_str().ok())
    }

    /// Replaces every value of the given header with the given value.
    ///
    /// # Errors
    /// Fails if the value is not a valid header value; the headers are left
    /// untouched.
    ///
    /// # Examples
    /// ```rust
    /// # use switchyard::*;
    /// # use http::header::LOCATION;
    /// let mut response = Response::empty_status(http::StatusCode::FOUND);
    /// response.set_header(LOCATION, "/login")?;
    /// assert_eq!(response.header_str(LOCATION), Some("/login"));
    /// assert!(response.set_header(LOCATION, "bad\nvalue").is_err());
    /// assert_eq!(response.header_str(LOCATION), Some("/login"));
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    fn set_header<H, V>(&mut self, key: H, value: V) -> Result<&mut Self, http::Error>
    where
        H: http::header::IntoHeaderName,
        V: TryInto<http::HeaderValue>,
        http::Error: From<<V as TryInto<http::HeaderValue>>::Error>,
    {
        let value = value.try_into()?;
        self.headers_mut().insert(key, value);
        Ok(self)
    }

    /// Builder form of [`HasHeaders::set_header`], consuming `self`.
    ///
    /// # Errors
    /// Fails if the value is not a valid header value.
    fn with_header<H, V>(mut self, key: H, value: V) -> Result<Self, http::Error>
    where
        H: http::header::IntoHeaderName,
        V: TryInto<http::HeaderValue>,
        http::Error: From<<V as TryInto<http::HeaderValue>>::Error>,
    {
        self.set_header(key, value)?;
        Ok(self)
    }

    /// Removes the given header, returning its first value.
    fn remove_header<H: http::header::AsHeaderName>(&mut self, key: H) -> Option<http::HeaderValue> {
        self.headers_mut().remove(key)
    }
}

pub(crate) mod sealed {
    pub trait Sealed {}
}
