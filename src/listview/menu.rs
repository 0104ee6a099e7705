// src/listview/menu.rs

/// Which row's action menu is open. At most one at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuState {
    open: Option<String>,
}

impl MenuState {
    pub fn open(id: impl Into<String>) -> Self {
        Self {
            open: Some(id.into()),
        }
    }

    pub fn from_param(raw: Option<&str>) -> Self {
        Self {
            open: raw
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        }
    }

    pub fn open_id(&self) -> Option<&str> {
        self.open.as_deref()
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open.as_deref() == Some(id)
    }

    /// Toggling the open row closes it; any other row takes over.
    pub fn toggle(&self, id: &str) -> Self {
        if self.is_open(id) {
            Self::default()
        } else {
            Self::open(id)
        }
    }

    pub fn close(&self) -> Self {
        Self::default()
    }
}
