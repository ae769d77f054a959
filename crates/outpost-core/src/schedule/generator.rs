//! The weekly plan generator.
//!
//! Round-robin assignment of accounts, groups, templates and images across
//! weekday time slots. Accounts rotate on a single counter that runs across
//! the whole week so slots spread evenly; groups prefer "not yet used this
//! week" before wrapping; templates and images are plain round-robin
//! cursors. Simple combinatorial assignment over in-memory slices.

use std::collections::HashSet;

use chrono::{Days, NaiveDate, NaiveTime};

use outpost_db::models::{Account, Group, Media, Template};
use outpost_db::queries::tasks::NewTask;

use crate::schedule::slots::slot_time;

/// Operator-tunable generation settings.
#[derive(Debug, Clone)]
pub struct PlanSettings {
    /// Posts per active day. Generation produces exactly
    /// `tasks_per_day * active_days` tasks.
    pub tasks_per_day: u32,
    /// Time of the first slot each day.
    pub start_time: NaiveTime,
    /// Fixed spacing between consecutive slots.
    pub interval_minutes: u32,
    /// Schedule all 7 days instead of Monday-Friday.
    pub force_full_week: bool,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            tasks_per_day: 5,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
            interval_minutes: 45,
            force_full_week: false,
        }
    }
}

impl PlanSettings {
    /// Number of days the generator will fill.
    pub fn active_days(&self) -> u32 {
        if self.force_full_week { 7 } else { 5 }
    }
}

/// Upper bound on posts per day: one slot every five minutes around the
/// clock.
pub const MAX_TASKS_PER_DAY: u32 = 288;

/// Why generation was refused. No partial plan is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("no active accounts available")]
    NoAccounts,
    #[error("no groups available")]
    NoGroups,
    #[error("no text templates available")]
    NoTemplates,
    #[error("tasks per day must be at least 1")]
    ZeroTasksPerDay,
    #[error("tasks per day must be at most {}", MAX_TASKS_PER_DAY)]
    TooManyTasksPerDay,
    #[error("slot interval must be at least 1 minute")]
    ZeroInterval,
}

/// Generate one week of posting tasks starting at `week_start` (a Monday).
///
/// Media is optional: with an empty media list every task posts text only.
/// Returns drafts in schedule order; the caller persists them atomically.
pub fn generate_week(
    settings: &PlanSettings,
    week_start: NaiveDate,
    accounts: &[Account],
    groups: &[Group],
    templates: &[Template],
    media: &[Media],
) -> Result<Vec<NewTask>, GenerateError> {
    if accounts.is_empty() {
        return Err(GenerateError::NoAccounts);
    }
    if groups.is_empty() {
        return Err(GenerateError::NoGroups);
    }
    if templates.is_empty() {
        return Err(GenerateError::NoTemplates);
    }
    if settings.tasks_per_day == 0 {
        return Err(GenerateError::ZeroTasksPerDay);
    }
    if settings.tasks_per_day > MAX_TASKS_PER_DAY {
        return Err(GenerateError::TooManyTasksPerDay);
    }
    // A zero interval would stack every slot at the same instant; slot
    // times must strictly increase within a day.
    if settings.interval_minutes == 0 {
        return Err(GenerateError::ZeroInterval);
    }

    let days = settings.active_days();
    let mut out = Vec::with_capacity((days * settings.tasks_per_day) as usize);

    // One counter for accounts across the whole week; per-resource cursors
    // for groups/templates/media; the used set drives the "fresh group
    // first" preference.
    let mut account_counter = 0usize;
    let mut group_cursor = 0usize;
    let mut template_cursor = 0usize;
    let mut media_cursor = 0usize;
    let mut used_groups: HashSet<uuid::Uuid> = HashSet::new();

    for day in 0..days {
        let date = week_start + Days::new(u64::from(day));

        for slot in 0..settings.tasks_per_day {
            let account = &accounts[account_counter % accounts.len()];
            account_counter += 1;

            let group = pick_group(groups, &mut group_cursor, &mut used_groups);

            let template = &templates[template_cursor % templates.len()];
            template_cursor += 1;

            let image = if media.is_empty() {
                None
            } else {
                let m = &media[media_cursor % media.len()];
                media_cursor += 1;
                Some(m)
            };

            out.push(NewTask {
                weekday: day as i32,
                slot: slot as i32,
                account_id: account.id,
                account_name: account.name.clone(),
                group_id: group.id,
                group_name: group.name.clone(),
                group_url: group.url.clone(),
                template_id: template.id,
                template_title: template.title.clone(),
                body: template.body.clone(),
                media_id: image.map(|m| m.id),
                media_url: image.map(|m| m.url.clone()),
                scheduled_at: slot_time(date, settings.start_time, settings.interval_minutes, slot),
            });
        }
    }

    Ok(out)
}

/// Pick the next group: the first one from the cursor onward that has not
/// been used this week, falling back to plain round-robin once all have.
fn pick_group<'a>(
    groups: &'a [Group],
    cursor: &mut usize,
    used: &mut HashSet<uuid::Uuid>,
) -> &'a Group {
    let idx = (0..groups.len())
        .map(|off| (*cursor + off) % groups.len())
        .find(|&i| !used.contains(&groups[i].id))
        .unwrap_or(*cursor % groups.len());

    *cursor = (idx + 1) % groups.len();
    used.insert(groups[idx].id);
    &groups[idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use outpost_db::models::AccountStatus;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn account(name: &str) -> Account {
        Account {
            id: Uuid::new_v4(),
            name: name.to_string(),
            fb_id: format!("fb-{name}"),
            status: AccountStatus::Active,
            browser_tag: None,
            profile_image: None,
            created_at: now(),
        }
    }

    fn group(name: &str) -> Group {
        Group {
            id: Uuid::new_v4(),
            name: name.to_string(),
            url: format!("https://facebook.com/groups/{name}"),
            member_count: 1000,
            language: None,
            tags: vec![],
            warning_count: 0,
            owner_account_id: None,
            created_at: now(),
        }
    }

    fn template(title: &str) -> Template {
        Template {
            id: Uuid::new_v4(),
            title: title.to_string(),
            body: format!("body of {title}"),
            created_at: now(),
        }
    }

    fn media_item(name: &str) -> Media {
        Media {
            id: Uuid::new_v4(),
            file_name: format!("{name}.jpg"),
            storage_path: format!("/media/{name}.jpg"),
            url: format!("https://media.example/{name}.jpg"),
            size_bytes: 1024,
            mime_type: "image/jpeg".to_string(),
            created_at: now(),
        }
    }

    fn monday() -> NaiveDate {
        // A Monday.
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn settings(tasks_per_day: u32) -> PlanSettings {
        PlanSettings {
            tasks_per_day,
            ..PlanSettings::default()
        }
    }

    #[test]
    fn produces_exact_task_count() {
        let accounts = vec![account("a1"), account("a2")];
        let groups = vec![group("g1"), group("g2"), group("g3")];
        let templates = vec![template("t1")];

        let tasks =
            generate_week(&settings(4), monday(), &accounts, &groups, &templates, &[]).unwrap();
        assert_eq!(tasks.len(), 4 * 5);

        let full_week = PlanSettings {
            tasks_per_day: 4,
            force_full_week: true,
            ..PlanSettings::default()
        };
        let tasks =
            generate_week(&full_week, monday(), &accounts, &groups, &templates, &[]).unwrap();
        assert_eq!(tasks.len(), 4 * 7);
    }

    #[test]
    fn account_round_robin_wraps() {
        // 3 accounts over 7 slots in one day: [0,1,2,0,1,2,0].
        let accounts = vec![account("a0"), account("a1"), account("a2")];
        let groups: Vec<Group> = (0..10).map(|i| group(&format!("g{i}"))).collect();
        let templates = vec![template("t")];

        let full_week = PlanSettings {
            tasks_per_day: 7,
            force_full_week: true,
            ..PlanSettings::default()
        };
        let tasks =
            generate_week(&full_week, monday(), &accounts, &groups, &templates, &[]).unwrap();

        let day_one: Vec<_> = tasks.iter().filter(|t| t.weekday == 0).collect();
        let sequence: Vec<Uuid> = day_one.iter().map(|t| t.account_id).collect();
        let expected: Vec<Uuid> = [0, 1, 2, 0, 1, 2, 0]
            .iter()
            .map(|&i| accounts[i].id)
            .collect();
        assert_eq!(sequence, expected);
    }

    #[test]
    fn times_strictly_increase_within_each_day() {
        let accounts = vec![account("a")];
        let groups = vec![group("g1"), group("g2")];
        let templates = vec![template("t1"), template("t2")];

        let tasks =
            generate_week(&settings(6), monday(), &accounts, &groups, &templates, &[]).unwrap();

        for day in 0..5 {
            let times: Vec<_> = tasks
                .iter()
                .filter(|t| t.weekday == day)
                .map(|t| t.scheduled_at)
                .collect();
            assert_eq!(times.len(), 6);
            for pair in times.windows(2) {
                assert!(pair[1] > pair[0], "slots must strictly increase");
            }
        }
    }

    #[test]
    fn groups_prefer_unused_before_wrapping() {
        let accounts = vec![account("a")];
        let groups = vec![group("g0"), group("g1"), group("g2")];
        let templates = vec![template("t")];

        // 5 days x 1 task = 5 tasks over 3 groups: each group appears at
        // least once before any repeats.
        let tasks =
            generate_week(&settings(1), monday(), &accounts, &groups, &templates, &[]).unwrap();

        let first_three: HashSet<Uuid> = tasks[..3].iter().map(|t| t.group_id).collect();
        assert_eq!(first_three.len(), 3, "first three picks must be distinct");
    }

    #[test]
    fn media_is_optional() {
        let accounts = vec![account("a")];
        let groups = vec![group("g")];
        let templates = vec![template("t")];

        let tasks =
            generate_week(&settings(2), monday(), &accounts, &groups, &templates, &[]).unwrap();
        assert!(tasks.iter().all(|t| t.media_id.is_none()));

        let media = vec![media_item("m1"), media_item("m2")];
        let tasks =
            generate_week(&settings(2), monday(), &accounts, &groups, &templates, &media)
                .unwrap();
        assert!(tasks.iter().all(|t| t.media_id.is_some()));
        assert_eq!(tasks[0].media_id, Some(media[0].id));
        assert_eq!(tasks[1].media_id, Some(media[1].id));
        assert_eq!(tasks[2].media_id, Some(media[0].id));
    }

    #[test]
    fn denormalized_copies_match_sources() {
        let accounts = vec![account("poster")];
        let groups = vec![group("target")];
        let templates = vec![template("pitch")];

        let tasks =
            generate_week(&settings(1), monday(), &accounts, &groups, &templates, &[]).unwrap();
        let t = &tasks[0];
        assert_eq!(t.account_name, "poster");
        assert_eq!(t.group_name, "target");
        assert_eq!(t.group_url, groups[0].url);
        assert_eq!(t.template_title, "pitch");
        assert_eq!(t.body, templates[0].body);
    }

    #[test]
    fn refuses_empty_inputs() {
        let accounts = vec![account("a")];
        let groups = vec![group("g")];
        let templates = vec![template("t")];

        assert_eq!(
            generate_week(&settings(1), monday(), &[], &groups, &templates, &[]).unwrap_err(),
            GenerateError::NoAccounts
        );
        assert_eq!(
            generate_week(&settings(1), monday(), &accounts, &[], &templates, &[]).unwrap_err(),
            GenerateError::NoGroups
        );
        assert_eq!(
            generate_week(&settings(1), monday(), &accounts, &groups, &[], &[]).unwrap_err(),
            GenerateError::NoTemplates
        );
        assert_eq!(
            generate_week(&settings(0), monday(), &accounts, &groups, &templates, &[])
                .unwrap_err(),
            GenerateError::ZeroTasksPerDay
        );
    }

    #[test]
    fn zero_interval_is_refused() {
        // With no spacing, consecutive slots on a day would all land on the
        // same timestamp.
        let accounts = vec![account("a")];
        let groups = vec![group("g")];
        let templates = vec![template("t")];

        let cfg = PlanSettings {
            tasks_per_day: 3,
            interval_minutes: 0,
            ..PlanSettings::default()
        };
        assert_eq!(
            generate_week(&cfg, monday(), &accounts, &groups, &templates, &[]).unwrap_err(),
            GenerateError::ZeroInterval
        );
    }

    #[test]
    fn tasks_per_day_is_bounded() {
        let accounts = vec![account("a")];
        let groups = vec![group("g")];
        let templates = vec![template("t")];

        assert_eq!(
            generate_week(
                &settings(MAX_TASKS_PER_DAY + 1),
                monday(),
                &accounts,
                &groups,
                &templates,
                &[]
            )
            .unwrap_err(),
            GenerateError::TooManyTasksPerDay
        );

        // The bound itself is still allowed.
        let tasks = generate_week(
            &settings(MAX_TASKS_PER_DAY),
            monday(),
            &accounts,
            &groups,
            &templates,
            &[],
        )
        .unwrap();
        assert_eq!(tasks.len(), (MAX_TASKS_PER_DAY * 5) as usize);
    }

    #[test]
    fn weekday_indices_cover_monday_to_friday() {
        let accounts = vec![account("a")];
        let groups = vec![group("g")];
        let templates = vec![template("t")];

        let tasks =
            generate_week(&settings(1), monday(), &accounts, &groups, &templates, &[]).unwrap();
        let weekdays: Vec<i32> = tasks.iter().map(|t| t.weekday).collect();
        assert_eq!(weekdays, vec![0, 1, 2, 3, 4]);
    }
}
