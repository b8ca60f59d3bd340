pub mod credential;
pub mod login;
pub mod provision;
pub mod register;
pub mod token;
pub mod verify;
