//! Newtype ids for every entity the store tracks.
//!
//! All ids are plain integers assigned by the storage backend. The newtypes
//! exist so a `WorkUnitId` can never be passed where an `AttachmentId` is
//! expected — the consolidation and scheduling paths mix both constantly.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident, $inner:ty) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub $inner);

        impl $name {
            pub fn new(raw: $inner) -> Self {
                Self(raw)
            }

            pub fn raw(&self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

define_id!(
    /// A polling table.
    TableId, u32
);
define_id!(
    /// A reporting category (one "column" of the tally sheet).
    CategoryId, u32
);
define_id!(
    /// A geographic circuit — the affinity unit for scheduling.
    CircuitId, u32
);
define_id!(
    /// A geographic section, grouping circuits.
    SectionId, u32
);
define_id!(
    /// One selectable option on a tally sheet.
    OptionId, u32
);
define_id!(
    /// A (table, category) work unit.
    WorkUnitId, u64
);
define_id!(
    /// A photographed tally sheet.
    AttachmentId, u64
);
define_id!(
    /// A vote-count submission.
    SubmissionId, u64
);
define_id!(
    /// A photo→table identification submission.
    IdentificationId, u64
);
define_id!(
    /// A volunteer. Submitters and workers are the same population.
    SubmitterId, u64
);
define_id!(
    /// An append-only reputation ledger entry.
    ReputationEventId, u64
);
define_id!(
    /// One claimable entry in the pending-work queue.
    QueueEntryId, u64
);
define_id!(
    /// A reported problem on a table or attachment.
    ProblemId, u64
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_type_and_raw() {
        assert_eq!(WorkUnitId::new(7).to_string(), "WorkUnitId#7");
        assert_eq!(TableId::new(12).raw(), 12);
    }

    #[test]
    fn ids_are_ordered_by_raw_value() {
        assert!(SubmissionId::new(1) < SubmissionId::new(2));
    }
}
