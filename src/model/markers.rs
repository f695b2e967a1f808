use bitflags::bitflags;

bitflags! {
    /// Hot-patch markers carried by a class or method
    ///
    /// Both flags can be present at once on a malformed unit, in which case `ADDED` wins.
    #[derive(Default)]
    pub struct MarkerFlags: u8 {
        /// Did not exist in the previous release
        const ADDED = 0x01;

        /// Body changed since the previous release
        const MODIFIED = 0x02;
    }
}

impl MarkerFlags {
    pub fn is_added(&self) -> bool {
        self.contains(MarkerFlags::ADDED)
    }

    pub fn is_modified(&self) -> bool {
        self.contains(MarkerFlags::MODIFIED)
    }

    /// Both markers at once, which only happens on a malformed unit
    pub fn is_conflicting(&self) -> bool {
        self.contains(MarkerFlags::ADDED | MarkerFlags::MODIFIED)
    }
}
