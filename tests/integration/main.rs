//! Integration tests for layered configuration resolution.

mod errors;
mod file_layer;
mod layered;
