use serde::{Deserialize, Serialize};

/// Which settings pane is on screen. A visible submenu implies the menu is
/// open with the root list hidden; at most one pane shows at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MenuState {
    #[default]
    Closed,
    Root,
    Quality,
    Speed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmenuKind {
    Quality,
    Speed,
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        !matches!(self, MenuState::Closed)
    }

    /// Settings button press: closed opens the root, any open pane closes
    /// the whole menu.
    pub fn toggle(self) -> Self {
        match self {
            MenuState::Closed => MenuState::Root,
            _ => MenuState::Closed,
        }
    }

    pub fn open_submenu(self, kind: SubmenuKind) -> Self {
        match kind {
            SubmenuKind::Quality => MenuState::Quality,
            SubmenuKind::Speed => MenuState::Speed,
        }
    }

    /// Back returns a submenu to the root and does nothing elsewhere.
    pub fn back(self) -> Self {
        match self {
            MenuState::Quality | MenuState::Speed => MenuState::Root,
            other => other,
        }
    }

    /// Close everything at once, from any pane. Selection handlers and
    /// click-outside both land here.
    pub fn close(self) -> Self {
        MenuState::Closed
    }

    /// Pane name used in menu events.
    pub fn pane_name(&self) -> &'static str {
        match self {
            MenuState::Closed => "closed",
            MenuState::Root => "root",
            MenuState::Quality => "quality",
            MenuState::Speed => "speed",
        }
    }
}
