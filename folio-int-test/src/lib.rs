//! Integration tests for folio. The tests live in `tests/`; this crate only
//! exports the shared harness and fixtures.

pub mod test_util;
