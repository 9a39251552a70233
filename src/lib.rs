//! Switchyard is a priority-ordered HTTP request router.  Routes are
//! registered per method at `/`-separated patterns made of literals,
//! `:name` parameters, and a trailing `*` wildcard; requests are then
//! dispatched to the first handler, in priority order, that accepts them.
//!
//! Handlers may _yield_, declining a request that they matched, in which
//! case the router backtracks and keeps looking.  This makes it possible to,
//! say, have one handler at `/item/:id` only accept numeric ids, and a second
//! one at the same pattern pick up the rest.
//!
//! The crate offers two layers: [`Router`], the bare route table, generic
//! over whatever per-request data its handlers want; and [`App`], which pairs
//! it with a [`Request`] and a [`Response`] for each exchange.  Neither does
//! any I/O; a transport hands a request in, and writes the response out.
//!
//! # Examples
//! ```rust
//! # fn main() -> Result<(), anyhow::Error> {
//! let mut app = switchyard::app();
//! app.get("/hello/:name", |request, response| {
//!     let name = request.parameter("name").unwrap_or("world");
//!     *response = switchyard::Response::text(format!("hello, {}!", name));
//! })?;
//!
//! let response = app.handle(switchyard::Request::get("/hello/you")?);
//! assert_eq!(&response.body()[..], b"hello, you!");
//! # Ok(())
//! # }
//! ```
#![deny(clippy::correctness)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod app;
mod error;
mod has_headers;
mod request;
mod response;
mod router;

pub use self::app::{App, Scope, METHODS};
pub use self::error::RouterError;
pub use self::has_headers::HasHeaders;
pub use self::request::fragment::FragmentSelect;
pub use self::request::Request;
pub use self::response::Response;
pub use self::router::{
    Context, HandlerRef, Priority, Router, HANDLER_BITS, HANDLER_MASK, MAX_URL_SEGMENTS,
};
pub use ::http;

#[must_use]
#[inline]
/// This creates a new application.  This is a shortcut for [`App::default`].
pub fn app() -> App {
    App::default()
}
