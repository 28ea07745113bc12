pub mod account;
pub mod billing;
pub mod formations;
pub mod keys;
