//! Shared fixture plumbing for the lock-test binaries and integration tests:
//! workspace-relative schema paths, disposable truth roots, and the small
//! decimal/day/producer builders every fixture needs.

pub mod helpers;
