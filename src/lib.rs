//! Workspace tooling package.
//!
//! Carries the `rusty-hook` pre-commit configuration in the root manifest;
//! the library and CLI live under `crates/`.
