//! Use-case services over the planning engines.

pub mod plan_service;
