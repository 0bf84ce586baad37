//! # cfgsmith_merge
//!
//! Ordered deep merge of YAML variable mappings for cfgsmith.
//!
//! Variable files are folded from the most general to the most specific.
//! Nested mappings merge key by key; lists and scalars are replaced. Overriding
//! mappings may carry directives to remove keys, subtract from or append to
//! lists, and delete nested keys by dotted path.
//!
//! ## Example
//!
//! ```rust
//! use cfgsmith_merge::merge_mappings;
//! use serde_yaml::Mapping;
//!
//! let base: Mapping = serde_yaml::from_str("ntp: [10.0.0.1]\nmtu: 1500").unwrap();
//! let site: Mapping = serde_yaml::from_str("ntp__append: [10.0.0.2]\nmtu: false").unwrap();
//!
//! let merged = merge_mappings(&base, &site).unwrap();
//! let expected: Mapping = serde_yaml::from_str("ntp: [10.0.0.1, 10.0.0.2]").unwrap();
//! assert_eq!(merged, expected);
//! ```

pub mod directive;
pub mod error;
pub mod merge;

pub use directive::{
    apply_appends, apply_directives, delete_dotted_key, DirectiveKind, APPEND_SUFFIX,
    DELETE_KEYS, REMOVE_SUFFIX,
};
pub use error::{kind_name, MergeError, MergeResult};
pub use merge::{merge_all, merge_mappings, merge_values};

/// Variables of one source or one target: string keys to YAML values.
pub type VariableMapping = serde_yaml::Mapping;
