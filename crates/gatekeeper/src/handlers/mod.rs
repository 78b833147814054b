pub mod home;
pub mod login;
pub mod protected;

pub use home::home;
pub use login::login;
pub use protected::get_protected;
