use std::time::Duration;

/// Idle time after which the menu hides itself.
pub const MENU_HIDE_DELAY: Duration = Duration::from_secs(3);

/// Menu visibility: manual collapse plus idle auto-hide.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MenuChrome {
    collapsed: bool,
    auto_hidden: bool,
    hovered: bool,
    hide_at: Option<Duration>,
}

impl MenuChrome {
    /// Manually collapsed.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Hidden by the idle timer.
    pub fn is_auto_hidden(&self) -> bool {
        self.auto_hidden
    }

    /// Neither collapsed nor auto-hidden.
    pub fn is_visible(&self) -> bool {
        !self.collapsed && !self.auto_hidden
    }

    /// Pending auto-hide deadline.
    pub fn hide_deadline(&self) -> Option<Duration> {
        self.hide_at
    }

    /// Pointer or key activity: show the menu and restart the idle window.
    pub(crate) fn activity(&mut self, now: Duration, recording: bool) {
        if self.collapsed || recording {
            return;
        }
        self.auto_hidden = false;
        self.hide_at = Some(now + MENU_HIDE_DELAY);
    }

    pub(crate) fn pointer_enter(&mut self, recording: bool) {
        self.hovered = true;
        if !self.collapsed && !recording {
            self.auto_hidden = false;
            self.hide_at = None;
        }
    }

    pub(crate) fn pointer_leave(&mut self, now: Duration, recording: bool) {
        self.hovered = false;
        self.activity(now, recording);
    }

    /// Fire the idle timer if due. Returns `true` when the menu just hid.
    pub(crate) fn poll(&mut self, now: Duration, recording: bool) -> bool {
        let Some(at) = self.hide_at else {
            return false;
        };
        if now < at {
            return false;
        }
        self.hide_at = None;
        if self.hovered || self.collapsed || recording {
            return false;
        }
        self.auto_hidden = true;
        true
    }

    pub(crate) fn toggle_collapse(&mut self, now: Duration, recording: bool) -> bool {
        if recording {
            return false;
        }
        self.collapsed = !self.collapsed;
        if self.collapsed {
            self.hide_at = None;
        } else {
            self.activity(now, recording);
        }
        true
    }

    pub(crate) fn force_collapse(&mut self) {
        self.collapsed = true;
        self.hide_at = None;
    }
}
