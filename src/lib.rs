//! resource-sql - resource queries to SQL
//!
//! This crate compiles resource-level requests into parameterized SQL:
//! - a persisted schema description mapping resources onto tables
//! - query and write descriptions (filters, sorting, paging, includes)
//! - an immutable SQL tree built from those descriptions
//! - dialect-specific SQL text rendering

pub mod config;
pub mod query_description;
pub mod resource_catalog;
pub mod sql_generator;
pub mod sql_tree;
pub mod statement_builder;
