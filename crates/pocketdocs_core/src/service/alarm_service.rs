//! Alarm use-case service.
//!
//! # Responsibility
//! - Validate alarm drafts into stored alarms.
//! - Scope every alarm operation to the caller's profiles.
//!
//! # Invariants
//! - An alarm outside the caller's profiles is reported as not found.
//! - Edit keeps the previous sound and active flag when the draft leaves
//!   them unset.

use crate::model::alarm::{Alarm, AlarmDraft, AlarmId, AlarmTime, DEFAULT_ALARM_SOUND};
use crate::model::name::normalize_name;
use crate::model::profile::ProfileId;
use crate::repo::alarm_repo::AlarmRepository;
use crate::service::access::Caller;
use crate::service::error::ServiceError;
use log::info;
use uuid::Uuid;

/// Alarm service facade.
pub struct AlarmService<R: AlarmRepository> {
    repo: R,
}

impl<R: AlarmRepository> AlarmService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one alarm in `profile_id`.
    pub fn create_alarm(
        &self,
        caller: &Caller,
        profile_id: ProfileId,
        draft: &AlarmDraft,
    ) -> Result<Alarm, ServiceError> {
        let profile_id = caller.authorize(profile_id)?;
        let alarm = Alarm {
            id: Uuid::new_v4(),
            profile_id,
            name: normalize_name(&draft.name)?,
            time: AlarmTime::parse(draft.time.trim())?,
            sound: resolve_sound(draft.sound.as_deref(), DEFAULT_ALARM_SOUND),
            repeat: draft.repeat.trim().to_string(),
            is_active: draft.is_active.unwrap_or(true),
        };

        let created = self.repo.create_alarm(&alarm)?;
        info!(
            "event=alarm_create module=alarms status=ok profile_id={profile_id} alarm_id={}",
            created.id
        );
        Ok(created)
    }

    pub fn list_alarms(
        &self,
        caller: &Caller,
        profile_id: ProfileId,
    ) -> Result<Vec<Alarm>, ServiceError> {
        let profile_id = caller.authorize(profile_id)?;
        Ok(self.repo.list_alarms(profile_id)?)
    }

    /// Replaces name, time and repeat; sound and active flag only when set.
    pub fn edit_alarm(
        &self,
        caller: &Caller,
        alarm_id: AlarmId,
        draft: &AlarmDraft,
    ) -> Result<Alarm, ServiceError> {
        let current = self.load_owned(caller, alarm_id)?;
        let edited = Alarm {
            name: normalize_name(&draft.name)?,
            time: AlarmTime::parse(draft.time.trim())?,
            sound: resolve_sound(draft.sound.as_deref(), &current.sound),
            repeat: draft.repeat.trim().to_string(),
            is_active: draft.is_active.unwrap_or(current.is_active),
            ..current
        };

        let updated = self.repo.update_alarm(&edited)?;
        info!("event=alarm_edit module=alarms status=ok alarm_id={alarm_id}");
        Ok(updated)
    }

    /// Flips the active flag.
    pub fn toggle_alarm(&self, caller: &Caller, alarm_id: AlarmId) -> Result<Alarm, ServiceError> {
        let current = self.load_owned(caller, alarm_id)?;
        let toggled = Alarm {
            is_active: !current.is_active,
            ..current
        };

        let updated = self.repo.update_alarm(&toggled)?;
        info!(
            "event=alarm_toggle module=alarms status=ok alarm_id={alarm_id} is_active={}",
            updated.is_active
        );
        Ok(updated)
    }

    /// Deletes one alarm and returns its prior state.
    pub fn delete_alarm(&self, caller: &Caller, alarm_id: AlarmId) -> Result<Alarm, ServiceError> {
        self.load_owned(caller, alarm_id)?;
        let deleted = self.repo.delete_alarm(alarm_id)?;
        info!("event=alarm_delete module=alarms status=ok alarm_id={alarm_id}");
        Ok(deleted)
    }

    fn load_owned(&self, caller: &Caller, alarm_id: AlarmId) -> Result<Alarm, ServiceError> {
        self.repo
            .get_alarm(alarm_id)?
            .filter(|alarm| caller.owns(alarm.profile_id))
            .ok_or(ServiceError::AlarmNotFound(alarm_id))
    }
}

fn resolve_sound(requested: Option<&str>, fallback: &str) -> String {
    match requested.map(str::trim) {
        Some(sound) if !sound.is_empty() => sound.to_string(),
        _ => fallback.to_string(),
    }
}
