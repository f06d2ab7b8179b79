#![warn(
    clippy::all,
    clippy::pedantic,
    dead_code
)]
#![allow(
    clippy::inline_always,
    clippy::uninlined_format_args,
    clippy::borrow_as_ptr,
    clippy::single_match_else,
    clippy::collapsible_if,
    clippy::new_without_default,
    clippy::redundant_field_names,
    clippy::struct_field_names,
    clippy::missing_transmute_annotations,
    clippy::multiple_crate_versions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::similar_names,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::used_underscore_binding,
    clippy::enum_glob_use,
    clippy::cast_lossless,
    clippy::match_same_arms,
    clippy::too_many_lines,
    clippy::unnested_or_patterns,
    clippy::blocks_in_conditions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
)]

pub mod hash;
pub mod object;
pub mod error;
pub mod store;
pub mod refs;
pub mod index;
pub mod config;
pub mod workspace;
pub mod repository;
pub mod commit;
pub mod history;
pub mod merge;
pub mod checkout;
pub mod add;
pub mod branch;
pub mod log;
pub mod status;
