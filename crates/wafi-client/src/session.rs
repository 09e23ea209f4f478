//! Signed-in state and the navigation rules that hang off it.

use wafi_domain::id::ProductId;

use crate::model::User;
use crate::navigation::{Location, View, ViewHistory};

/// What the storefront shows for the current session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Product page overlay, shown on top of whatever view is current.
    ProductDetail(ProductId),
    /// Hero and category grid.
    Home,
    CategoryListing(String),
    Cart,
    /// Admins have no cart.
    CartRefused,
    Login,
    Register,
    Admin,
    /// Non-admins asking for the admin page.
    AdminRefused,
    Orders,
}

/// Next step after a shopper asks to hear about a restock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestockNotice {
    /// Signed in: submit the reservation now.
    Reserve(ProductId),
    /// Anonymous: the reservation waits until the account exists.
    RegisterFirst,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
    history: ViewHistory,
    selected_product: Option<ProductId>,
    pending_reservation: Option<ProductId>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    pub fn history(&self) -> &ViewHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ViewHistory {
        &mut self.history
    }

    pub fn location(&self) -> &Location {
        self.history.current()
    }

    pub fn selected_product(&self) -> Option<ProductId> {
        self.selected_product
    }

    pub fn pending_reservation(&self) -> Option<ProductId> {
        self.pending_reservation
    }

    fn home(&self) -> Location {
        if self.is_admin() {
            Location::new(View::Admin)
        } else {
            Location::new(View::Products)
        }
    }

    /// Sign `user` in. Coming from anonymous resets history to the user's
    /// home and hands back the reservation requested before signing up.
    pub fn login(&mut self, user: User) -> Option<ProductId> {
        let was_anonymous = self.user.is_none();
        self.user = Some(user);
        if !was_anonymous {
            return None;
        }
        let home = self.home();
        self.history.reset(home);
        self.pending_reservation.take()
    }

    pub fn logout(&mut self) {
        if self.user.take().is_some() {
            self.history.reset(Location::new(View::Products));
        }
    }

    /// Switch to a top-level view, closing any product page.
    pub fn set_view(&mut self, view: View) {
        self.selected_product = None;
        self.history.navigate(Location::new(view));
    }

    pub fn select_category(&mut self, category: impl Into<String>) {
        self.history.navigate(Location::category(category));
    }

    pub fn logo_click(&mut self) {
        self.selected_product = None;
        let home = self.home();
        self.history.navigate(home);
    }

    pub fn open_product(&mut self, id: ProductId) {
        self.selected_product = Some(id);
    }

    pub fn close_product(&mut self) {
        self.selected_product = None;
    }

    pub fn continue_shopping(&mut self) {
        self.history.navigate(Location::new(View::Products));
    }

    pub fn back(&mut self) -> bool {
        self.history.back()
    }

    pub fn forward(&mut self) -> bool {
        self.history.forward()
    }

    pub fn request_restock_notice(&mut self, id: ProductId) -> RestockNotice {
        if self.user.is_some() {
            return RestockNotice::Reserve(id);
        }
        self.pending_reservation = Some(id);
        self.set_view(View::Register);
        RestockNotice::RegisterFirst
    }

    pub fn screen(&self) -> Screen {
        if let Some(id) = self.selected_product {
            return Screen::ProductDetail(id);
        }
        let location = self.history.current();
        match location.view {
            View::Login => Screen::Login,
            View::Register => Screen::Register,
            View::Admin if self.is_admin() => Screen::Admin,
            View::Admin => Screen::AdminRefused,
            View::Orders if self.user.is_some() => Screen::Orders,
            View::Orders => Screen::Login,
            View::Cart if self.is_admin() => Screen::CartRefused,
            View::Cart => Screen::Cart,
            View::Products if self.is_admin() => Screen::Admin,
            View::Products => match &location.category {
                Some(category) => Screen::CategoryListing(category.clone()),
                None => Screen::Home,
            },
        }
    }
}
