//! Alarm repository contracts and SQLite implementation.

use crate::model::alarm::{Alarm, AlarmId, AlarmTime};
use crate::model::profile::ProfileId;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::{bool_to_int, ensure_table_ready, parse_bool, parse_uuid};
use rusqlite::{params, Connection, Row};

const ALARM_SELECT_SQL: &str = "SELECT
    id,
    profile_id,
    name,
    time_of_day,
    sound,
    repeat_days,
    is_active
FROM alarms";

/// Repository interface for alarms.
pub trait AlarmRepository {
    /// Inserts `alarm` as given, including its id.
    fn create_alarm(&self, alarm: &Alarm) -> RepoResult<Alarm>;
    fn get_alarm(&self, id: AlarmId) -> RepoResult<Option<Alarm>>;
    /// Lists alarms of one profile in creation order.
    fn list_alarms(&self, profile_id: ProfileId) -> RepoResult<Vec<Alarm>>;
    /// Overwrites every mutable field of an existing alarm.
    fn update_alarm(&self, alarm: &Alarm) -> RepoResult<Alarm>;
    /// Deletes one alarm and returns its prior state.
    fn delete_alarm(&self, id: AlarmId) -> RepoResult<Alarm>;
}

/// SQLite-backed alarm repository.
pub struct SqliteAlarmRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAlarmRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "alarms",
            &[
                "id",
                "profile_id",
                "name",
                "time_of_day",
                "sound",
                "repeat_days",
                "is_active",
            ],
        )?;
        Ok(Self { conn })
    }

    fn load_required(&self, id: AlarmId) -> RepoResult<Alarm> {
        self.get_alarm(id)?
            .ok_or_else(|| RepoError::not_found("alarm", id))
    }
}

impl AlarmRepository for SqliteAlarmRepository<'_> {
    fn create_alarm(&self, alarm: &Alarm) -> RepoResult<Alarm> {
        self.conn.execute(
            "INSERT INTO alarms (
                id,
                profile_id,
                name,
                time_of_day,
                sound,
                repeat_days,
                is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                alarm.id.to_string(),
                alarm.profile_id.to_string(),
                alarm.name.as_str(),
                alarm.time.to_string(),
                alarm.sound.as_str(),
                alarm.repeat.as_str(),
                bool_to_int(alarm.is_active),
            ],
        )?;
        self.load_required(alarm.id)
    }

    fn get_alarm(&self, id: AlarmId) -> RepoResult<Option<Alarm>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ALARM_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_alarm_row(row)?));
        }
        Ok(None)
    }

    fn list_alarms(&self, profile_id: ProfileId) -> RepoResult<Vec<Alarm>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ALARM_SELECT_SQL}
             WHERE profile_id = ?1
             ORDER BY seq ASC;"
        ))?;
        let mut rows = stmt.query([profile_id.to_string()])?;
        let mut alarms = Vec::new();
        while let Some(row) = rows.next()? {
            alarms.push(parse_alarm_row(row)?);
        }
        Ok(alarms)
    }

    fn update_alarm(&self, alarm: &Alarm) -> RepoResult<Alarm> {
        let changed = self.conn.execute(
            "UPDATE alarms
             SET name = ?2,
                 time_of_day = ?3,
                 sound = ?4,
                 repeat_days = ?5,
                 is_active = ?6
             WHERE id = ?1;",
            params![
                alarm.id.to_string(),
                alarm.name.as_str(),
                alarm.time.to_string(),
                alarm.sound.as_str(),
                alarm.repeat.as_str(),
                bool_to_int(alarm.is_active),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("alarm", alarm.id));
        }
        self.load_required(alarm.id)
    }

    fn delete_alarm(&self, id: AlarmId) -> RepoResult<Alarm> {
        let alarm = self.load_required(id)?;
        self.conn
            .execute("DELETE FROM alarms WHERE id = ?1;", [id.to_string()])?;
        Ok(alarm)
    }
}

fn parse_alarm_row(row: &Row<'_>) -> RepoResult<Alarm> {
    let id_text: String = row.get("id")?;
    let profile_text: String = row.get("profile_id")?;
    let time_text: String = row.get("time_of_day")?;
    let time = AlarmTime::parse(&time_text).map_err(|err| {
        RepoError::InvalidData(format!("{err} in alarms.time_of_day"))
    })?;

    Ok(Alarm {
        id: parse_uuid(&id_text, "alarms.id")?,
        profile_id: parse_uuid(&profile_text, "alarms.profile_id")?,
        name: row.get("name")?,
        time,
        sound: row.get("sound")?,
        repeat: row.get("repeat_days")?,
        is_active: parse_bool(row.get("is_active")?, "alarms.is_active")?,
    })
}
