//! Crate-level scenario and property tests

mod property_tests;
