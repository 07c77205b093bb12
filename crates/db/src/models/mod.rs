//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A conversion into the corresponding `stryv-core` record

pub mod achievement;
pub mod challenge;
pub mod task_instance;
pub mod task_template;
