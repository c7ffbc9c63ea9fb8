// Profile actions
// Each action makes its HTTP call and turns the outcome into events

use std::sync::Arc;

use super::events::{Alert, ProfileEvent};
use super::transport::{ApiClient, ClientError};
use super::{ClientConfig, Confirm, Dispatch, Navigator};
use crate::api::routes::API_PREFIX;
use crate::api::types::{EducationForm, ExperienceForm, Message, ProfileForm};
use crate::logger;
use crate::model::ProfileView;

const DASHBOARD: &str = "/dashboard";
const DELETE_PROMPT: &str = "Are you sure? This can NOT be undone!";

/// Client-side profile operations
pub struct ProfileActions {
    client: ApiClient,
    dispatch: Arc<dyn Dispatch>,
}

impl ProfileActions {
    pub fn new(config: &ClientConfig, dispatch: Arc<dyn Dispatch>) -> Self {
        Self {
            client: ApiClient::new(config),
            dispatch,
        }
    }

    /// Load the caller's own profile
    pub async fn get_current_profile(&self) {
        self.refresh_current().await;
    }

    /// Load every profile
    pub async fn get_profiles(&self) {
        self.emit(ProfileEvent::ProfileCleared);
        match self.client.get::<Vec<ProfileView>>(API_PREFIX).await {
            Ok(profiles) => self.emit(ProfileEvent::ProfilesLoaded(profiles)),
            Err(e) => self.fail(&e),
        }
    }

    /// Load the profile owned by `user_id`
    pub async fn get_profile_by_id(&self, user_id: &str) {
        self.emit(ProfileEvent::ProfileCleared);
        let path = format!("{API_PREFIX}/user/{user_id}");
        match self.client.get::<ProfileView>(&path).await {
            Ok(profile) => self.emit(ProfileEvent::ProfileLoaded(profile)),
            Err(e) => self.fail(&e),
        }
    }

    /// Create or update the caller's profile
    ///
    /// A fresh profile sends the user on to the dashboard; an edit stays put.
    pub async fn create_profile(&self, form: &ProfileForm, navigator: &dyn Navigator, is_edit: bool) {
        match self.client.post::<_, ProfileView>(API_PREFIX, form).await {
            Ok(profile) => {
                self.emit(ProfileEvent::ProfileLoaded(profile));
                let msg = if is_edit {
                    "Profile Updated"
                } else {
                    "Profile Created"
                };
                self.emit(ProfileEvent::Alert(Alert::success(msg)));
                if !is_edit {
                    navigator.push(DASHBOARD);
                }
            }
            Err(e) => self.fail_with_alerts(&e),
        }
    }

    pub async fn add_experience(&self, form: &ExperienceForm, navigator: &dyn Navigator) {
        let path = format!("{API_PREFIX}/experience");
        match self.client.put::<_, Message>(&path, form).await {
            Ok(_) => {
                if self.refresh_current().await {
                    self.emit(ProfileEvent::Alert(Alert::success("Experience Added")));
                    navigator.push(DASHBOARD);
                }
            }
            Err(e) => self.fail_with_alerts(&e),
        }
    }

    pub async fn add_education(&self, form: &EducationForm, navigator: &dyn Navigator) {
        let path = format!("{API_PREFIX}/education");
        match self.client.put::<_, Message>(&path, form).await {
            Ok(_) => {
                if self.refresh_current().await {
                    self.emit(ProfileEvent::Alert(Alert::success("Education Added")));
                    navigator.push(DASHBOARD);
                }
            }
            Err(e) => self.fail_with_alerts(&e),
        }
    }

    pub async fn delete_experience(&self, id: &str) {
        let path = format!("{API_PREFIX}/experience/{id}");
        self.delete_entry(&path, "Experience Removed").await;
    }

    pub async fn delete_education(&self, id: &str) {
        let path = format!("{API_PREFIX}/education/{id}");
        self.delete_entry(&path, "Education Removed").await;
    }

    /// Delete the profile and account after the user confirms
    pub async fn delete_account(&self, confirm: &dyn Confirm) {
        if !confirm.confirm(DELETE_PROMPT) {
            return;
        }

        match self.client.delete::<Message>(API_PREFIX).await {
            Ok(_) => {
                self.emit(ProfileEvent::ProfileCleared);
                self.emit(ProfileEvent::AccountDeleted);
                self.emit(ProfileEvent::Alert(Alert::success(
                    "Your account has been permanently deleted",
                )));
            }
            Err(e) => self.fail(&e),
        }
    }

    async fn delete_entry(&self, path: &str, done: &str) {
        match self.client.delete::<Message>(path).await {
            Ok(_) => {
                if self.refresh_current().await {
                    self.emit(ProfileEvent::Alert(Alert::success(done)));
                }
            }
            Err(e) => self.fail(&e),
        }
    }

    /// Fetch `/me` into the store; false when it failed and an error was emitted
    async fn refresh_current(&self) -> bool {
        let path = format!("{API_PREFIX}/me");
        match self.client.get::<ProfileView>(&path).await {
            Ok(profile) => {
                self.emit(ProfileEvent::ProfileLoaded(profile));
                true
            }
            Err(e) => {
                self.fail(&e);
                false
            }
        }
    }

    fn emit(&self, event: ProfileEvent) {
        self.dispatch.dispatch(event);
    }

    fn fail(&self, err: &ClientError) {
        logger::log_warning(&format!("Profile request failed: {err}"));
        self.emit(ProfileEvent::ProfileError {
            msg: err.message(),
            status: err.status(),
        });
    }

    /// Surface each field error as an alert, then report the failure
    fn fail_with_alerts(&self, err: &ClientError) {
        for field in err.field_errors() {
            self.emit(ProfileEvent::Alert(Alert::danger(field.msg)));
        }
        self.fail(err);
    }
}
