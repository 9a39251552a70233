use crate::router::MAX_URL_SEGMENTS;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
/// Errors generated while registering routes.  Routing itself cannot fail;
/// see [`crate::Router::route`].
pub enum RouterError {
    #[error("cannot register an empty pattern")]
    /// The pattern was the empty string.
    EmptyPattern,
    #[error("the pattern {:?} does not begin with a `/`", .0)]
    /// Every pattern must be rooted.
    MissingLeadingSlash(String),
    #[error("the pattern {:?} has more than {} segments", .0, MAX_URL_SEGMENTS)]
    /// The pattern was deeper than [`crate::MAX_URL_SEGMENTS`], and could
    /// never be matched.
    TooManySegments(String),
    #[error("the pattern {:?} contains a parameter with no name", .0)]
    /// A segment consisted of only a `:`.
    UnnamedParameter(String),
    #[error("the pattern {:?} contains a wildcard before its final segment", .0)]
    /// A wildcard matches the remainder of the path, so nothing may follow
    /// it.
    MisplacedWildcard(String),
    #[error("no methods were given for the pattern {:?}", .0)]
    /// The handler would not have been reachable from any method.
    NoMethods(String),
    #[error("the router has no handler indices left to give out")]
    /// Every handler index has been handed out.
    TooManyHandlers,
}
