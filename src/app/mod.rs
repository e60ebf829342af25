pub mod session;

pub use session::{open_session, CartSession};
