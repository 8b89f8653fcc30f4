//! Cross-module scenario tests for the collision pipeline
