//! Task template scoping and the materialization fallback order (PRD-04).

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Valid template scope kinds as stored in the `scope` column.
pub const SCOPE_GLOBAL: &str = "global";
pub const SCOPE_USER: &str = "user";
pub const SCOPE_GROUP: &str = "group";

/// All valid scope kind strings.
pub const VALID_SCOPE_KINDS: &[&str] = &[SCOPE_GLOBAL, SCOPE_USER, SCOPE_GROUP];

/// Who a template set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "owner_id")]
pub enum TemplateScope {
    /// The built-in default set, owned by nobody.
    Global,
    /// A user's custom set.
    User(DbId),
    /// A group's shared set.
    Group(DbId),
}

impl TemplateScope {
    /// The `scope` column value for this variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Global => SCOPE_GLOBAL,
            Self::User(_) => SCOPE_USER,
            Self::Group(_) => SCOPE_GROUP,
        }
    }

    /// The owning user id, if user-scoped.
    pub fn user_id(&self) -> Option<DbId> {
        match self {
            Self::User(id) => Some(*id),
            _ => None,
        }
    }

    /// The owning group id, if group-scoped.
    pub fn group_id(&self) -> Option<DbId> {
        match self {
            Self::Group(id) => Some(*id),
            _ => None,
        }
    }

    /// Reassemble a scope from its stored parts.
    pub fn from_parts(
        kind: &str,
        user_id: Option<DbId>,
        group_id: Option<DbId>,
    ) -> Result<Self, String> {
        match kind {
            SCOPE_GLOBAL => Ok(Self::Global),
            SCOPE_USER => user_id
                .map(Self::User)
                .ok_or_else(|| "user-scoped template without user_id".to_string()),
            SCOPE_GROUP => group_id
                .map(Self::Group)
                .ok_or_else(|| "group-scoped template without group_id".to_string()),
            _ => Err(format!(
                "Invalid template scope '{kind}'. Must be one of: {}",
                VALID_SCOPE_KINDS.join(", ")
            )),
        }
    }
}

/// A weighted task definition. Immutable once referenced by an instance;
/// a set is superseded by archiving it and creating a new one, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Points awarded when an instance of this template is completed.
    pub weight: i32,
    pub scope: TemplateScope,
}

/// Maximum length for a template name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Validate a template name: non-empty after trimming, within length bounds.
pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Template name must not be empty".to_string());
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(format!(
            "Template name exceeds maximum length of {MAX_NAME_LENGTH}"
        ));
    }
    Ok(())
}

/// Validate a template weight: points must be positive.
pub fn validate_weight(weight: i32) -> Result<(), String> {
    if weight >= 1 {
        Ok(())
    } else {
        Err(format!("Template weight must be positive, got {weight}"))
    }
}

/// The strict tier order used when materializing a day.
///
/// Group-owned templates win for group-linked challenges, then the user's
/// custom set, then the global defaults. The first non-empty tier is used;
/// later tiers are never mixed in.
pub fn scope_fallback(user_id: DbId, group_id: Option<DbId>) -> Vec<TemplateScope> {
    match group_id {
        Some(group_id) => vec![
            TemplateScope::Group(group_id),
            TemplateScope::User(user_id),
            TemplateScope::Global,
        ],
        None => vec![TemplateScope::User(user_id), TemplateScope::Global],
    }
}
