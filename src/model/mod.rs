//! Data model
//!
//! Profile documents with embedded experience and education entries,
//! the user records they reference, and the identifier types.

mod ids;
mod profile;

pub use ids::{EntryId, MalformedId, ProfileId, UserId};
pub use profile::{
    Education, Experience, Profile, ProfileFields, ProfileView, Social, User, UserSummary,
};
