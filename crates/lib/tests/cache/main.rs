mod common;
mod lifecycle_tests;
mod namespace_tests;
