//! Integration tests for resource_probe
//!
//! Each test starts its own server in-process on an ephemeral port, with
//! a temporary directory standing in for the cgroup v1 mount.
//!
//! Run with: cargo test --test integration

mod helpers;

mod limits;
mod probe;
mod routing;
mod internal;
