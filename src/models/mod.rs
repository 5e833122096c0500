pub mod category;
pub mod goal;
pub mod mood;
pub mod session;
pub mod user;
