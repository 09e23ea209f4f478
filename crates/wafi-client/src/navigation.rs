//! Back/forward history over the storefront's top-level views.

use std::fmt;

/// Top-level page of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Products,
    Cart,
    Login,
    Register,
    Admin,
    Orders,
}

impl View {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Cart => "cart",
            Self::Login => "login",
            Self::Register => "register",
            Self::Admin => "admin",
            Self::Orders => "orders",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One history entry: a view and, on the catalog, the category being browsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub view: View,
    pub category: Option<String>,
}

impl Location {
    pub fn new(view: View) -> Self {
        Self {
            view,
            category: None,
        }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            view: View::Products,
            category: Some(category.into()),
        }
    }
}

/// Browser-style history stack.
///
/// Never empty; `index` always points at an entry.
#[derive(Debug, Clone)]
pub struct ViewHistory {
    entries: Vec<Location>,
    index: usize,
}

impl Default for ViewHistory {
    fn default() -> Self {
        Self::new(Location::default())
    }
}

impl ViewHistory {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    pub fn current(&self) -> &Location {
        &self.entries[self.index]
    }

    /// Push `location`, dropping any forward entries. Navigating to the
    /// current location is a no-op.
    pub fn navigate(&mut self, location: Location) {
        if *self.current() == location {
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index = self.entries.len() - 1;
    }

    /// Step back one entry. Returns whether the position moved.
    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Step forward one entry. Returns whether the position moved.
    pub fn forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Forget everything and start over at `location`.
    pub fn reset(&mut self, location: Location) {
        self.entries = vec![location];
        self.index = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
