mod helpers;

mod account_test;
mod provision_test;
mod token_test;
mod verify_test;
