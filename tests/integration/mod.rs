//! Integration tests for the repository filesystem view

mod cli_parse;
mod listing;
mod pagination;
mod single_flight;
mod tree_properties;
