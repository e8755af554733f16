//! Declarative per-model authorization rules.
//!
//! Every model lists the rules that grant access to it. A guest rule grants an
//! operation to every caller. An owner rule grants `Create` to any signed-in
//! principal and the other operations only on records that principal owns.

use super::Principal;
use crate::errors::AppError;

/// Operations a rule can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: &'static [Operation] = &[
        Operation::Read,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ];

    fn verb(self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// A single authorization rule.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Guest(&'static [Operation]),
    Owner(&'static [Operation]),
}

/// A persisted model and the rules protecting it.
pub trait Model {
    /// Human readable model name used in error messages.
    const NAME: &'static str;
    const RULES: &'static [Rule];

    /// Username of the principal that created the record.
    fn owner(&self) -> &str;
}

/// Which records a list query may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Everyone,
    Owner(String),
}

impl Scope {
    pub fn owner(&self) -> Option<&str> {
        match self {
            Scope::Everyone => None,
            Scope::Owner(owner) => Some(owner),
        }
    }
}

fn guest_allows<M: Model>(op: Operation) -> bool {
    M::RULES
        .iter()
        .any(|rule| matches!(rule, Rule::Guest(ops) if ops.contains(&op)))
}

fn owner_allows<M: Model>(op: Operation) -> bool {
    M::RULES
        .iter()
        .any(|rule| matches!(rule, Rule::Owner(ops) if ops.contains(&op)))
}

fn denied<M: Model>(principal: &Principal, op: Operation) -> AppError {
    match principal {
        Principal::Guest => AppError::Unauthorized(format!(
            "Sign in to {} {} records",
            op.verb(),
            M::NAME
        )),
        Principal::User(_) => {
            AppError::Forbidden(format!("Not allowed to {} this {}", op.verb(), M::NAME))
        }
    }
}

/// Resolve the list scope for a read of many records.
pub fn list_scope<M: Model>(principal: &Principal) -> Result<Scope, AppError> {
    if guest_allows::<M>(Operation::Read) {
        return Ok(Scope::Everyone);
    }
    match principal {
        Principal::User(name) if owner_allows::<M>(Operation::Read) => {
            Ok(Scope::Owner(name.clone()))
        }
        _ => Err(denied::<M>(principal, Operation::Read)),
    }
}

/// Authorize a create and return the username that will own the record.
pub fn authorize_create<M: Model>(principal: &Principal) -> Result<&str, AppError> {
    match principal {
        Principal::User(name) if owner_allows::<M>(Operation::Create) => Ok(name.as_str()),
        _ => Err(denied::<M>(principal, Operation::Create)),
    }
}

/// Authorize an operation on an existing record.
pub fn authorize_record<M: Model>(
    principal: &Principal,
    op: Operation,
    record: &M,
) -> Result<(), AppError> {
    if guest_allows::<M>(op) {
        return Ok(());
    }
    match principal {
        Principal::User(name) if owner_allows::<M>(op) && name == record.owner() => Ok(()),
        _ => Err(denied::<M>(principal, op)),
    }
}
