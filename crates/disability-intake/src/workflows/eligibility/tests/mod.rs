pub(super) mod common;

mod service;
