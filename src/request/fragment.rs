use std::ops::Range;
use std::sync::Arc;

/// The parameters captured while routing a request.
///
/// These are kept as byte ranges into the request's path, alongside the
/// parameter names of the pattern that matched, so that publishing a new set
/// of parameters only ever reuses the same buffer.
#[derive(Debug, Default)]
pub struct Fragment {
    names: Option<Arc<[Box<str>]>>,
    spans: Vec<Range<usize>>,
}

impl Fragment {
    pub(crate) fn set<I>(&mut self, names: &Arc<[Box<str>]>, spans: I)
    where
        I: IntoIterator<Item = Range<usize>>,
    {
        self.names = Some(names.clone());
        self.spans.clear();
        self.spans.extend(spans);
    }

    pub(crate) fn clear(&mut self) {
        self.names = None;
        self.spans.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.spans.len()
    }

    pub(crate) fn get<'b>(&self, base: &'b str, index: usize) -> Option<&'b str> {
        self.spans.get(index).and_then(|span| base.get(span.clone()))
    }

    pub(crate) fn name<'b>(&self, base: &'b str, name: &str) -> Option<&'b str> {
        let index = self.names.as_ref()?.iter().position(|n| &**n == name)?;
        self.get(base, index)
    }

    pub(crate) fn select<'b, K: FragmentSelect>(&self, base: &'b str, key: K) -> Option<&'b str> {
        key.select(self, base)
    }
}

/// A trait used to select a captured parameter, either by its position in
/// the pattern (a `usize`), or by its name (a `&str`, without the `:`).
///
/// This is defined as opposed to implementing [`std::ops::Index`] as
/// [`std::ops::Index`] would not be able to output an optional value.
pub trait FragmentSelect: self::sealed::FragmentSelectSealed {}

mod sealed {
    pub trait FragmentSelectSealed {
        fn select<'b>(self, fragment: &super::Fragment, base: &'b str) -> Option<&'b str>;
    }
}

impl sealed::FragmentSelectSealed for usize {
    fn select<'b>(self, fragment: &Fragment, base: &'b str) -> Option<&'b str> {
        fragment.get(base, self)
    }
}

impl FragmentSelect for usize {}

impl sealed::FragmentSelectSealed for &str {
    fn select<'b>(self, fragment: &Fragment, base: &'b str) -> Option<&'b str> {
        fragment.name(base, self)
    }
}

impl FragmentSelect for &str {}
