//! User accounts.

mod controller;
pub mod dto;
mod password;
pub mod rdo;
mod service;

pub use controller::UserController;
pub use dto::{CreateUserDto, LoginUserDto};
pub use rdo::{LoggedUserRdo, UserRdo};
pub use service::{User, UserService};
