// Profile route handlers
//
// Each handler is one route: parse the inputs it needs, run at most a
// couple of store operations, and return the response body.

use super::types::{EducationForm, ExperienceForm, Message, ProfileForm};
use crate::config::AppState;
use crate::error::{ApiError, ApiResult};
use crate::model::{EntryId, Profile, ProfileView, UserId};
use crate::store::ProfileChange;

/// `GET /me`
pub async fn current_profile(state: &AppState, user: UserId) -> ApiResult<ProfileView> {
    let profile = state
        .store
        .find_profile(user)
        .await?
        .ok_or_else(ApiError::no_profile)?;
    populate(state, profile).await
}

/// `POST /`: create or overwrite the caller's profile in one upsert
pub async fn upsert_profile(
    state: &AppState,
    user: UserId,
    form: ProfileForm,
) -> ApiResult<ProfileView> {
    let fields = form.into_fields(user).map_err(ApiError::Validation)?;
    let profile = state.store.upsert_profile(fields).await?;
    populate(state, profile).await
}

/// `GET /`
pub async fn list_profiles(state: &AppState) -> ApiResult<Vec<ProfileView>> {
    let profiles = state.store.list_profiles().await?;
    let mut views = Vec::with_capacity(profiles.len());
    for profile in profiles {
        views.push(populate(state, profile).await?);
    }
    Ok(views)
}

/// `GET /user/:id`
pub async fn profile_by_user(state: &AppState, raw_id: &str) -> ApiResult<ProfileView> {
    let user: UserId = raw_id.parse()?;
    let profile = state
        .store
        .find_profile(user)
        .await?
        .ok_or_else(ApiError::no_profile)?;
    populate(state, profile).await
}

/// `DELETE /`: remove the profile, then the account that owned it
pub async fn delete_account(state: &AppState, user: UserId) -> ApiResult<Message> {
    // TODO: remove the user's posts once posts are stored alongside profiles
    state.store.delete_profile(user).await?;
    state.store.delete_user(user).await?;
    Ok(Message::new("User deleted"))
}

/// `PUT /experience`
pub async fn add_experience(
    state: &AppState,
    user: UserId,
    form: ExperienceForm,
) -> ApiResult<Message> {
    let entry = form.into_entry().map_err(ApiError::Validation)?;
    edit_profile(
        state,
        user,
        Box::new(move |profile| {
            profile.add_experience(entry);
            true
        }),
    )
    .await?;
    Ok(Message::new("Experience added"))
}

/// `DELETE /experience/:id`; an id not in the list changes nothing
pub async fn delete_experience(state: &AppState, user: UserId, raw_id: &str) -> ApiResult<Message> {
    let id: EntryId = raw_id.parse()?;
    edit_profile(state, user, Box::new(move |profile| profile.remove_experience(id))).await?;
    Ok(Message::new("Experience removed"))
}

/// `PUT /education`
pub async fn add_education(
    state: &AppState,
    user: UserId,
    form: EducationForm,
) -> ApiResult<Message> {
    let entry = form.into_entry().map_err(ApiError::Validation)?;
    edit_profile(
        state,
        user,
        Box::new(move |profile| {
            profile.add_education(entry);
            true
        }),
    )
    .await?;
    Ok(Message::new("Education added"))
}

/// `DELETE /education/:id`
pub async fn delete_education(state: &AppState, user: UserId, raw_id: &str) -> ApiResult<Message> {
    let id: EntryId = raw_id.parse()?;
    edit_profile(state, user, Box::new(move |profile| profile.remove_education(id))).await?;
    Ok(Message::new("Education removed"))
}

/// Edit the caller's profile in place; a missing profile is never recreated
async fn edit_profile(state: &AppState, user: UserId, change: ProfileChange) -> ApiResult<Profile> {
    state
        .store
        .update_profile(user, change)
        .await?
        .ok_or_else(ApiError::profile_not_found)
}

async fn populate(state: &AppState, profile: Profile) -> ApiResult<ProfileView> {
    let owner = state.store.find_user(profile.user).await?;
    Ok(ProfileView::populate(profile, owner.as_ref()))
}
