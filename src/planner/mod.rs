//! Planner workflows.
//!
//! These compose repository calls into the operations the pages perform:
//! resolving the signed-in user, listing (and seeding) resorts, planning an
//! adventure with its activities, editing the profile and summarising trips.

mod activity_entry;
mod current_user;
mod plan;
mod profile;
mod resorts;
mod seed;
mod trips;

pub use activity_entry::*;
pub use current_user::*;
pub use plan::*;
pub use profile::*;
pub use resorts::*;
pub use seed::*;
pub use trips::*;
