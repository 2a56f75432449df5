//! Profile use-case service.
//!
//! # Invariants
//! - Profile names are trimmed and 3 to 24 characters long.
//! - A caller may only delete profiles it holds.

use crate::model::name::validate_display_name;
use crate::model::profile::{Profile, ProfileId, UserId};
use crate::repo::profile_repo::ProfileRepository;
use crate::service::access::Caller;
use crate::service::error::ServiceError;
use log::info;

/// Profile service facade.
pub struct ProfileService<R: ProfileRepository> {
    repo: R,
}

impl<R: ProfileRepository> ProfileService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one profile for `user_id`.
    pub fn create_profile(&self, user_id: UserId, name: &str) -> Result<Profile, ServiceError> {
        let name = validate_display_name(name)?;
        let profile = self.repo.create_profile(user_id, &name)?;
        info!(
            "event=profile_create module=profiles status=ok profile_id={}",
            profile.id
        );
        Ok(profile)
    }

    /// Lists profiles of one user in creation order.
    pub fn list_profiles(&self, user_id: UserId) -> Result<Vec<Profile>, ServiceError> {
        Ok(self.repo.list_profiles(user_id)?)
    }

    /// Builds the caller context holding every profile of `user_id`.
    pub fn caller_for(&self, user_id: UserId) -> Result<Caller, ServiceError> {
        let profiles = self.repo.list_profiles(user_id)?;
        Ok(Caller::new(
            user_id,
            profiles.into_iter().map(|profile| profile.id),
        ))
    }

    /// Deletes one profile with its documents and alarms.
    pub fn delete_profile(
        &self,
        caller: &Caller,
        profile_id: ProfileId,
    ) -> Result<Profile, ServiceError> {
        let profile_id = caller.authorize(profile_id)?;
        let profile = self.repo.delete_profile(profile_id)?;
        info!("event=profile_delete module=profiles status=ok profile_id={profile_id}");
        Ok(profile)
    }
}
