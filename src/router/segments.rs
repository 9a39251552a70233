/// The deepest path the router will look at.  Any segments past this are
/// treated as if the path had ended.
pub const MAX_URL_SEGMENTS: usize = 100;

/// A lazy, caching splitter over the `/`-delimited segments of a path.
///
/// Segments are only split off once they are asked for, and are then kept,
/// so that the matcher can revisit a depth while backtracking without
/// scanning the path again.  Every segment borrows from the original path.
pub(crate) struct Segments<'p> {
    remaining: &'p str,
    cache: [&'p str; MAX_URL_SEGMENTS],
    top: usize,
}

impl<'p> Segments<'p> {
    pub(crate) fn new(path: &'p str) -> Self {
        Segments {
            remaining: path,
            cache: [""; MAX_URL_SEGMENTS],
            top: 0,
        }
    }

    /// Points the cursor at a new path, forgetting every cached segment.
    pub(crate) fn reset(&mut self, path: &'p str) {
        self.remaining = path;
        self.top = 0;
    }

    /// Returns the segment at `index`, or `None` once the path (or the
    /// segment capacity) has run out.
    pub(crate) fn get(&mut self, index: usize) -> Option<&'p str> {
        while self.top <= index {
            if self.remaining.is_empty() || self.top >= MAX_URL_SEGMENTS {
                return None;
            }

            let rest = self.remaining.strip_prefix('/').unwrap_or(self.remaining);
            let end = rest.find('/').unwrap_or(rest.len());
            self.cache[self.top] = &rest[..end];
            self.remaining = &rest[end..];
            self.top += 1;
        }

        Some(self.cache[index])
    }

    /// Whether the entire path has been split.  This is only `false` after
    /// a `None` from [`Segments::get`] if the capacity was hit first.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn collect(path: &str) -> Vec<&str> {
        let mut segments = Segments::new(path);
        (0..).map_while(|i| segments.get(i)).collect()
    }

    #[test]
    fn test_split() {
        assert_eq!(collect("/candy/lollipop"), ["candy", "lollipop"]);
        assert_eq!(collect("/"), [""]);
        assert_eq!(collect(""), Vec::<&str>::new());
        assert_eq!(collect("/user/"), ["user", ""]);
        assert_eq!(collect("//a"), ["", "a"]);
    }

    #[test]
    fn test_revisit() {
        let mut segments = Segments::new("/a/b/c");
        assert_eq!(segments.get(2), Some("c"));
        assert_eq!(segments.get(0), Some("a"));
        assert_eq!(segments.get(1), Some("b"));
        assert_eq!(segments.get(3), None);
        assert_eq!(segments.get(3), None);
        assert_eq!(segments.get(2), Some("c"));
    }

    #[test]
    fn test_reset() {
        let mut segments = Segments::new("/a/b");
        assert_eq!(segments.get(1), Some("b"));
        segments.reset("/x");
        assert_eq!(segments.get(0), Some("x"));
        assert_eq!(segments.get(1), None);
    }

    #[test]
    fn test_capacity() {
        let path = "/s".repeat(MAX_URL_SEGMENTS + 1);
        let mut segments = Segments::new(&path);
        assert_eq!(segments.get(MAX_URL_SEGMENTS - 1), Some("s"));
        assert_eq!(segments.get(MAX_URL_SEGMENTS), None);
        assert!(!segments.is_exhausted());

        let path = "/s".repeat(MAX_URL_SEGMENTS);
        let mut segments = Segments::new(&path);
        assert_eq!(segments.get(MAX_URL_SEGMENTS), None);
        assert!(segments.is_exhausted());
    }
}
