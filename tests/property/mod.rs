// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! This module contains property-based tests using proptest to verify
//! replay and versioning properties of the event sourcing system.

mod replay;
mod versioning;
