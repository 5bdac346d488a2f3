pub mod suggest;
pub mod webhook;
