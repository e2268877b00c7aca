//! Per-behavior dispatch tables.

use crate::MessageKind;

/// Maps every message kind to the handler kind a behavior declared for it.
///
/// Built once when the behavior is registered: for each kind the exact
/// declared handler wins, otherwise the nearest declared ancestor.  Kinds
/// with no declared handler on their chain resolve to `None` and are skipped.
#[derive(Clone, Debug)]
pub struct DispatchTable {
    slots: [Option<MessageKind>; MessageKind::COUNT],
}

impl DispatchTable {
    pub fn new(handles: &[MessageKind]) -> Self {
        let mut slots = [None; MessageKind::COUNT];
        for kind in MessageKind::ALL {
            slots[kind.index()] = kind.chain().find(|k| handles.contains(k));
        }
        Self { slots }
    }

    #[inline]
    pub fn resolve(&self, kind: MessageKind) -> Option<MessageKind> {
        self.slots[kind.index()]
    }

    /// `true` if no kind resolves to a handler.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
