//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a subsystem against
//! mock adapters. All tests run on the host with no real hardware:
//! the controller and agent roles execute as cooperative tasks on one
//! executor, talking through the same shared channel the two CPUs use.

mod link_tests;
mod mock_hw;
