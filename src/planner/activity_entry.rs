use std::str::FromStr;

use crate::errors::AppError;
use crate::models::ActivityType;

const SEPARATOR: &str = ": ";

/// An activity as the planning form carries it: `"TYPE: name"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub activity_type: ActivityType,
    pub name: String,
}

impl ActivityEntry {
    fn new(activity_type: ActivityType, name: &str) -> Result<Self, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::required("Activity name"));
        }
        Ok(Self {
            activity_type,
            name: name.to_string(),
        })
    }
}

impl FromStr for ActivityEntry {
    type Err = AppError;

    /// Splits on the first `": "`; the rest of the string is the name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, name) = s.split_once(SEPARATOR).ok_or_else(|| {
            AppError::Validation(format!("Activity {:?} must look like \"TYPE: name\"", s))
        })?;
        ActivityEntry::new(kind.parse()?, name)
    }
}
