pub mod notification;
pub mod order;
pub mod product;
pub mod reservation;
pub mod user;
