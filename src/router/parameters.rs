use super::segments::MAX_URL_SEGMENTS;

/// A fixed-capacity stack of the parameter values captured so far.
///
/// Every parameter consumes a segment, so the stack can never be deeper than
/// [`MAX_URL_SEGMENTS`]; it therefore never allocates.
pub(crate) struct Parameters<'p> {
    values: [&'p str; MAX_URL_SEGMENTS],
    len: usize,
}

impl<'p> Parameters<'p> {
    pub(crate) fn new() -> Self {
        Parameters {
            values: [""; MAX_URL_SEGMENTS],
            len: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.len = 0;
    }

    pub(crate) fn push(&mut self, value: &'p str) {
        debug_assert!(self.len < MAX_URL_SEGMENTS, "parameter stack overflow");
        if let Some(slot) = self.values.get_mut(self.len) {
            *slot = value;
            self.len += 1;
        }
    }

    pub(crate) fn pop(&mut self) {
        self.len = self.len.saturating_sub(1);
    }

    pub(crate) fn as_slice(&self) -> &[&'p str] {
        &self.values[..self.len]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_push_pop() {
        let mut parameters = Parameters::new();
        assert!(parameters.as_slice().is_empty());
        parameters.push("a");
        parameters.push("b");
        assert_eq!(parameters.as_slice(), ["a", "b"]);
        parameters.pop();
        assert_eq!(parameters.as_slice(), ["a"]);
        parameters.push("c");
        assert_eq!(parameters.as_slice(), ["a", "c"]);
        parameters.reset();
        assert!(parameters.as_slice().is_empty());
        parameters.pop();
        assert!(parameters.as_slice().is_empty());
    }
}
