//! Target Selection
//!
//! Which target the composer sends to. `None` means every target.

use jrnl_common::WebhookTarget;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<Uuid>,
}

impl Selection {
    /// Start on the first target, or on "all" when there is none.
    pub fn first_of(targets: &[WebhookTarget]) -> Self {
        Self {
            selected: targets.first().map(|t| t.id),
        }
    }

    pub const fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn select(&mut self, id: Uuid) {
        self.selected = Some(id);
    }

    pub fn select_all(&mut self) {
        self.selected = None;
    }

    /// Move to the next target, wrapping at the end.
    pub fn select_next(&mut self, targets: &[WebhookTarget]) {
        self.step(targets, |current, len| (current + 1) % len);
    }

    /// Move to the previous target, wrapping at the start.
    pub fn select_previous(&mut self, targets: &[WebhookTarget]) {
        self.step(targets, |current, len| {
            if current == 0 {
                len - 1
            } else {
                current - 1
            }
        });
    }

    fn step(&mut self, targets: &[WebhookTarget], advance: impl Fn(usize, usize) -> usize) {
        if targets.is_empty() {
            return;
        }
        let index = self
            .position(targets)
            .map_or(0, |current| advance(current, targets.len()));
        self.selected = Some(targets[index].id);
    }

    /// Select by 1-based list number. Returns `false` if out of range.
    pub fn select_number(&mut self, targets: &[WebhookTarget], number: usize) -> bool {
        match number.checked_sub(1).and_then(|i| targets.get(i)) {
            Some(target) => {
                self.selected = Some(target.id);
                true
            }
            None => false,
        }
    }

    /// Drop a selection whose target no longer exists, falling back to the
    /// first target.
    pub fn reconcile(&mut self, targets: &[WebhookTarget]) {
        if self.selected.is_some() && self.position(targets).is_none() {
            *self = Self::first_of(targets);
        }
    }

    /// Short label for the current selection, e.g. `#general`.
    pub fn label(&self, targets: &[WebhookTarget]) -> String {
        self.position(targets)
            .map_or_else(|| "all channels".to_string(), |i| format!("#{}", targets[i].name))
    }

    fn position(&self, targets: &[WebhookTarget]) -> Option<usize> {
        let id = self.selected?;
        targets.iter().position(|t| t.id == id)
    }
}
