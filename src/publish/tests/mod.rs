//! Unit tests for the publish module.
