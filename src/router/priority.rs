/// The number of low bits of a [`HandlerRef`] that hold the handler index.
pub const HANDLER_BITS: u32 = 28;
/// Selects the handler index out of a packed [`HandlerRef`].
pub const HANDLER_MASK: u32 = (1 << HANDLER_BITS) - 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u32)]
/// The order in which handlers registered at the same trie position are
/// probed.
///
/// The discriminants occupy the high four bits of a [`HandlerRef`], and are
/// numerically ordered `High < Medium < Low`, so that sorting packed
/// references ascending yields the high priority handlers first.
///
/// # Examples
/// ```rust
/// # use switchyard::Priority;
/// assert!(Priority::High < Priority::Medium);
/// assert!(Priority::Medium < Priority::Low);
/// assert_eq!(Priority::default(), Priority::Medium);
/// ```
pub enum Priority {
    /// Probed before everything else; used for upgrade interception.
    High = 0xD000_0000,
    /// Ordinary, method-specific routes.
    #[default]
    Medium = 0xE000_0000,
    /// Catch-all registrations that apply to every method.
    Low = 0xF000_0000,
}

impl Priority {
    /// The bit pattern this priority contributes to a packed reference.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    const fn from_bits(bits: u32) -> Self {
        match bits & !HANDLER_MASK {
            0xD000_0000 => Priority::High,
            0xE000_0000 => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// A handler index and its [`Priority`], packed into a single integer.
///
/// Comparing two references compares their priorities first, and their
/// indices second; since indices are handed out in registration order, a
/// sorted list of references is in priority order, then registration order.
///
/// # Examples
/// ```rust
/// # use switchyard::{HandlerRef, Priority};
/// let first = HandlerRef::new(Priority::Low, 0).unwrap();
/// let second = HandlerRef::new(Priority::High, 7).unwrap();
/// assert!(second < first);
/// assert_eq!(second.index(), 7);
/// assert_eq!(second.priority(), Priority::High);
/// ```
pub struct HandlerRef(u32);

impl HandlerRef {
    /// Packs the given priority and handler index.  Returns `None` if the
    /// index does not fit in [`HANDLER_BITS`] bits.
    #[must_use]
    pub fn new(priority: Priority, index: usize) -> Option<Self> {
        let index = u32::try_from(index).ok().filter(|i| *i <= HANDLER_MASK)?;
        Some(HandlerRef(priority.bits() | index))
    }

    /// The index of the handler in the router's handler list.
    #[must_use]
    pub fn index(self) -> usize {
        (self.0 & HANDLER_MASK) as usize
    }

    /// The priority this reference was registered with.
    #[must_use]
    pub fn priority(self) -> Priority {
        Priority::from_bits(self.0)
    }

    /// The raw packed value.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HandlerRef({:?}, {})", self.priority(), self.index())
    }
}
