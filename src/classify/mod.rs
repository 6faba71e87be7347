//! Task classification engine.
//!
//! Buckets, filters, sorts and groups tasks relative to an explicit reference
//! time. Nothing in here reads the clock; callers pass `now` on the user's
//! calendar. Bucket assignment compares calendar dates only.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::{DefaultList, DueDate, Task, TaskList};

/// Named temporal window a task falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    Overdue,
    Today,
    Tomorrow,
    ThisWeek,
    Upcoming,
    Later,
}

/// How finely the days after today are split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    /// Tomorrow, this week and later are separate buckets.
    #[default]
    Detailed,
    /// Every dated task after today is `Upcoming`; `Later` holds undated tasks.
    Flat,
}

impl Granularity {
    /// Buckets in display order.
    pub fn buckets(self) -> &'static [Bucket] {
        match self {
            Granularity::Detailed => &[
                Bucket::Overdue,
                Bucket::Today,
                Bucket::Tomorrow,
                Bucket::ThisWeek,
                Bucket::Later,
            ],
            Granularity::Flat => &[
                Bucket::Overdue,
                Bucket::Today,
                Bucket::Upcoming,
                Bucket::Later,
            ],
        }
    }
}

/// Calendar anchors derived from the reference time. Weeks run Sunday to Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    pub today: NaiveDate,
    pub tomorrow: NaiveDate,
    pub week_end: NaiveDate,
}

impl Calendar {
    pub fn new(now: NaiveDateTime) -> Self {
        let today = now.date();
        let tomorrow = today.succ_opt().unwrap_or(NaiveDate::MAX);
        let days_left = 6 - u64::from(today.weekday().num_days_from_sunday());
        let week_end = today
            .checked_add_days(Days::new(days_left))
            .unwrap_or(NaiveDate::MAX);
        Self {
            today,
            tomorrow,
            week_end,
        }
    }
}

/// Assign exactly one bucket; first matching rule wins.
///
/// A completed task dated before today matches no dated rule and ends up in
/// `Later`.
pub fn classify(task: &Task, calendar: &Calendar, granularity: Granularity) -> Bucket {
    let Some(due) = task.due_date else {
        return Bucket::Later;
    };
    let date = due.date();

    if !task.completed && date < calendar.today {
        return Bucket::Overdue;
    }
    if date == calendar.today {
        return Bucket::Today;
    }
    match granularity {
        Granularity::Detailed => {
            if date == calendar.tomorrow {
                return Bucket::Tomorrow;
            }
            if date > calendar.tomorrow && date <= calendar.week_end {
                return Bucket::ThisWeek;
            }
        }
        Granularity::Flat => {
            if date > calendar.today {
                return Bucket::Upcoming;
            }
        }
    }
    Bucket::Later
}

impl Bucket {
    /// Whether a task belongs to this bucket when the bucket is used as a filter.
    pub fn matches(self, task: &Task, calendar: &Calendar) -> bool {
        match self {
            Bucket::Upcoming => classify(task, calendar, Granularity::Flat) == Bucket::Upcoming,
            bucket => classify(task, calendar, Granularity::Detailed) == bucket,
        }
    }
}

/// Named filter resolved from a URL segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    /// No restriction beyond completion visibility.
    #[default]
    All,
    Bucket(Bucket),
    /// Tasks on any list carrying this default kind.
    DefaultList(DefaultList),
}

impl TaskFilter {
    /// Resolve a filter name. Unknown names are not an error; they mean `All`.
    pub fn parse(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "today" => TaskFilter::Bucket(Bucket::Today),
            "tomorrow" => TaskFilter::Bucket(Bucket::Tomorrow),
            "upcoming" => TaskFilter::Bucket(Bucket::Upcoming),
            "this-week" | "thisweek" | "week" => TaskFilter::Bucket(Bucket::ThisWeek),
            "overdue" => TaskFilter::Bucket(Bucket::Overdue),
            "later" => TaskFilter::Bucket(Bucket::Later),
            other => DefaultList::from_key(other)
                .map(TaskFilter::DefaultList)
                .unwrap_or(TaskFilter::All),
        }
    }
}

/// Ordering applied to a selection. Overrides replace the due-date order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Ascending due date, undated last.
    #[default]
    DueDate,
    /// Newest first.
    CreatedDesc,
    /// Case-insensitive alphabetical.
    Title,
}

impl SortKey {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "created" | "createdat" | "created-desc" => SortKey::CreatedDesc,
            "title" | "alpha" | "priority" => SortKey::Title,
            _ => SortKey::DueDate,
        }
    }
}

/// Everything a view can ask of the engine.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub filter: TaskFilter,
    pub show_completed: bool,
    pub list_id: Option<String>,
    pub search: Option<String>,
    pub sort: SortKey,
}

/// Filter and sort tasks.
///
/// `lists` resolves default-list filters and should already be scoped to the
/// caller (their own lists plus global templates).
pub fn select(
    tasks: &[Task],
    query: &TaskQuery,
    now: NaiveDateTime,
    lists: &[TaskList],
) -> Vec<Task> {
    let calendar = Calendar::new(now);
    let default_list_ids: HashSet<&str> = match query.filter {
        TaskFilter::DefaultList(kind) => lists
            .iter()
            .filter(|l| l.default_kind == Some(kind))
            .map(|l| l.id.as_str())
            .collect(),
        _ => HashSet::new(),
    };
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut selected: Vec<Task> = tasks
        .iter()
        .filter(|t| query.show_completed || !t.completed)
        .filter(|t| match &query.list_id {
            Some(list_id) => t.list_id.as_deref() == Some(list_id.as_str()),
            None => true,
        })
        .filter(|t| match &needle {
            Some(needle) => matches_search(t, needle),
            None => true,
        })
        .filter(|t| match query.filter {
            TaskFilter::All => true,
            TaskFilter::Bucket(bucket) => bucket.matches(t, &calendar),
            TaskFilter::DefaultList(_) => t
                .list_id
                .as_deref()
                .is_some_and(|id| default_list_ids.contains(id)),
        })
        .cloned()
        .collect();

    sort_tasks(&mut selected, query.sort);
    selected
}

fn matches_search(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle)
        || task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

/// Stable sort by the given key.
pub fn sort_tasks(tasks: &mut [Task], key: SortKey) {
    match key {
        SortKey::DueDate => {
            tasks.sort_by(|a, b| compare_due(a.due_date.as_ref(), b.due_date.as_ref()))
        }
        SortKey::CreatedDesc => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Title => tasks.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title))
        }),
    }
}

fn compare_due(a: Option<&DueDate>, b: Option<&DueDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketGroup {
    pub bucket: Bucket,
    pub tasks: Vec<Task>,
}

/// Partition the selection into buckets in display order; empty buckets are omitted.
pub fn group_by_bucket(
    tasks: &[Task],
    query: &TaskQuery,
    now: NaiveDateTime,
    lists: &[TaskList],
    granularity: Granularity,
) -> Vec<BucketGroup> {
    let calendar = Calendar::new(now);
    let selected = select(tasks, query, now, lists);

    granularity
        .buckets()
        .iter()
        .map(|&bucket| BucketGroup {
            bucket,
            tasks: selected
                .iter()
                .filter(|t| classify(t, &calendar, granularity) == bucket)
                .cloned()
                .collect(),
        })
        .filter(|group| !group.tasks.is_empty())
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateGroup {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
}

/// Dated tasks of the selection grouped per calendar day, earliest day first.
pub fn group_by_date(
    tasks: &[Task],
    query: &TaskQuery,
    now: NaiveDateTime,
    lists: &[TaskList],
) -> Vec<DateGroup> {
    let mut days: BTreeMap<NaiveDate, Vec<Task>> = BTreeMap::new();
    for task in select(tasks, query, now, lists) {
        if let Some(due) = task.due_date {
            days.entry(due.date()).or_default().push(task);
        }
    }

    days.into_iter()
        .map(|(date, mut tasks)| {
            sort_tasks(&mut tasks, SortKey::DueDate);
            DateGroup { date, tasks }
        })
        .collect()
}

/// Pending-task counts per detailed bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSummary {
    pub overdue: usize,
    pub today: usize,
    pub tomorrow: usize,
    pub this_week: usize,
    pub later: usize,
    pub total_pending: usize,
}

pub fn summarize(tasks: &[Task], now: NaiveDateTime) -> BucketSummary {
    let calendar = Calendar::new(now);
    let mut summary = BucketSummary::default();

    for task in tasks.iter().filter(|t| !t.completed) {
        summary.total_pending += 1;
        match classify(task, &calendar, Granularity::Detailed) {
            Bucket::Overdue => summary.overdue += 1,
            Bucket::Today => summary.today += 1,
            Bucket::Tomorrow => summary.tomorrow += 1,
            Bucket::ThisWeek => summary.this_week += 1,
            Bucket::Later | Bucket::Upcoming => summary.later += 1,
        }
    }
    summary
}

/// Which tasks to move and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReschedulePlan {
    pub due_date: DueDate,
    pub task_ids: Vec<String>,
}

/// Move every incomplete overdue task to tomorrow, as a date-only due value.
pub fn plan_reschedule_overdue(tasks: &[Task], now: NaiveDateTime) -> ReschedulePlan {
    let calendar = Calendar::new(now);
    ReschedulePlan {
        due_date: DueDate::Date(calendar.tomorrow),
        task_ids: tasks
            .iter()
            .filter(|t| classify(t, &calendar, Granularity::Detailed) == Bucket::Overdue)
            .map(|t| t.id.clone())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    /// Wednesday; the week runs Sun 2025-03-09 to Sat 2025-03-15.
    fn noon(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn now() -> NaiveDateTime {
        noon(12)
    }

    fn task(id: &str, due: Option<&str>, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {}", id),
            description: None,
            completed,
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap(),
            due_date: due.map(|d| d.parse().unwrap()),
            list_id: None,
            user_id: None,
            section: None,
            subtasks: None,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    fn query(filter: &str) -> TaskQuery {
        TaskQuery {
            filter: TaskFilter::parse(filter),
            ..TaskQuery::default()
        }
    }

    #[test]
    fn test_calendar_week_ends_on_saturday() {
        let calendar = Calendar::new(now());
        assert_eq!(calendar.today, NaiveDate::from_ymd_opt(2025, 3, 12).unwrap());
        assert_eq!(calendar.tomorrow, NaiveDate::from_ymd_opt(2025, 3, 13).unwrap());
        assert_eq!(calendar.week_end, NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());

        // Saturday is its own week end
        let saturday = Calendar::new(noon(15));
        assert_eq!(saturday.week_end, saturday.today);
    }

    #[test]
    fn test_undated_tasks_are_later_and_sort_last() {
        let calendar = Calendar::new(now());
        let undated = task("u", None, false);
        assert_eq!(classify(&undated, &calendar, Granularity::Detailed), Bucket::Later);
        assert_eq!(classify(&undated, &calendar, Granularity::Flat), Bucket::Later);

        let tasks = vec![
            task("u", None, false),
            task("far", Some("2025-06-01"), false),
            task("past", Some("2025-03-01"), false),
        ];
        let selected = select(&tasks, &TaskQuery::default(), now(), &[]);
        assert_eq!(ids(&selected), vec!["past", "far", "u"]);
    }

    #[test]
    fn test_today_regardless_of_time_of_day() {
        let calendar = Calendar::new(now());
        for due in ["2025-03-12", "2025-03-12T00:00", "2025-03-12T09:00", "2025-03-12T23:59:59"] {
            let open = task("t", Some(due), false);
            let done = task("t", Some(due), true);
            assert_eq!(classify(&open, &calendar, Granularity::Detailed), Bucket::Today, "{}", due);
            assert_eq!(classify(&done, &calendar, Granularity::Detailed), Bucket::Today, "{}", due);
        }
    }

    #[test]
    fn test_yesterday_incomplete_is_overdue() {
        let calendar = Calendar::new(now());
        let open = task("y", Some("2025-03-11T23:30"), false);
        assert_eq!(classify(&open, &calendar, Granularity::Detailed), Bucket::Overdue);
        assert_eq!(classify(&open, &calendar, Granularity::Flat), Bucket::Overdue);
    }

    #[test]
    fn test_completed_past_task_is_hidden_by_default() {
        let tasks = vec![task("y", Some("2025-03-11"), true)];
        assert!(select(&tasks, &query("overdue"), now(), &[]).is_empty());

        let shown = TaskQuery {
            filter: TaskFilter::parse("overdue"),
            show_completed: true,
            ..TaskQuery::default()
        };
        assert!(select(&tasks, &shown, now(), &[]).is_empty());

        let calendar = Calendar::new(now());
        assert_eq!(classify(&tasks[0], &calendar, Granularity::Detailed), Bucket::Later);
    }

    #[test]
    fn test_today_filter_is_exact() {
        let tasks = vec![
            task("yesterday", Some("2025-03-11"), false),
            task("today-date", Some("2025-03-12"), false),
            task("today-time", Some("2025-03-12T18:00"), false),
            task("tomorrow", Some("2025-03-13"), false),
            task("none", None, false),
        ];
        let selected = select(&tasks, &query("today"), now(), &[]);
        assert_eq!(ids(&selected), vec!["today-date", "today-time"]);
        assert!(selected
            .iter()
            .all(|t| t.due_date.unwrap().date() == now().date()));
    }

    #[test]
    fn test_unknown_filter_falls_back_to_everything_visible() {
        let tasks = vec![
            task("a", Some("2025-03-11"), false),
            task("b", Some("2025-03-12"), true),
            task("c", None, false),
            task("d", Some("2025-04-01"), false),
        ];
        let unfiltered = select(&tasks, &TaskQuery::default(), now(), &[]);
        for name in ["banana", "", "TODAYY", "list2", "work-ish"] {
            assert_eq!(TaskFilter::parse(name), TaskFilter::All);
            assert_eq!(select(&tasks, &query(name), now(), &[]), unfiltered);
        }
        assert_eq!(ids(&unfiltered), vec!["a", "d", "c"]);
    }

    #[test]
    fn test_filter_names_are_case_insensitive() {
        assert_eq!(TaskFilter::parse("Today"), TaskFilter::Bucket(Bucket::Today));
        assert_eq!(TaskFilter::parse("UPCOMING"), TaskFilter::Bucket(Bucket::Upcoming));
        assert_eq!(TaskFilter::parse("This-Week"), TaskFilter::Bucket(Bucket::ThisWeek));
        assert_eq!(
            TaskFilter::parse("Work"),
            TaskFilter::DefaultList(DefaultList::Work)
        );
    }

    #[test]
    fn test_mixed_scenario() {
        let tasks = vec![
            task("1", Some("2025-03-12T09:00"), false),
            task("2", Some("2025-03-12T23:00"), true),
            task("3", Some("2025-03-11"), false),
            task("4", None, false),
        ];
        assert_eq!(ids(&select(&tasks, &query("today"), now(), &[])), vec!["1"]);
        assert_eq!(
            ids(&select(&tasks, &TaskQuery::default(), now(), &[])),
            vec!["3", "1", "4"]
        );
    }

    #[test]
    fn test_week_boundaries() {
        let tasks = vec![
            task("sat", Some("2025-03-15"), false),
            task("sun", Some("2025-03-16"), false),
            task("mon", Some("2025-03-17"), false),
        ];

        // On Friday, Saturday is tomorrow and nothing is left of the week
        let friday = Calendar::new(noon(14));
        assert_eq!(classify(&tasks[0], &friday, Granularity::Detailed), Bucket::Tomorrow);
        assert_eq!(classify(&tasks[1], &friday, Granularity::Detailed), Bucket::Later);

        // On Saturday, Sunday is tomorrow even though it starts a new week
        let saturday = Calendar::new(noon(15));
        assert_eq!(classify(&tasks[0], &saturday, Granularity::Detailed), Bucket::Today);
        assert_eq!(classify(&tasks[1], &saturday, Granularity::Detailed), Bucket::Tomorrow);
        assert_eq!(classify(&tasks[2], &saturday, Granularity::Detailed), Bucket::Later);

        // Midweek
        let wednesday = Calendar::new(now());
        assert_eq!(classify(&tasks[0], &wednesday, Granularity::Detailed), Bucket::ThisWeek);
        assert_eq!(classify(&tasks[1], &wednesday, Granularity::Detailed), Bucket::Later);
    }

    #[test]
    fn test_flat_granularity_unions_future_days() {
        let calendar = Calendar::new(now());
        for due in ["2025-03-13", "2025-03-14T10:00", "2025-05-20"] {
            assert_eq!(
                classify(&task("f", Some(due), false), &calendar, Granularity::Flat),
                Bucket::Upcoming
            );
        }
        assert_eq!(
            classify(&task("n", None, false), &calendar, Granularity::Flat),
            Bucket::Later
        );
    }

    #[test]
    fn test_upcoming_filter() {
        let tasks = vec![
            task("today", Some("2025-03-12"), false),
            task("next-month", Some("2025-04-20"), false),
            task("tomorrow", Some("2025-03-13T08:00"), false),
            task("none", None, false),
            task("done", Some("2025-03-14"), true),
        ];
        let selected = select(&tasks, &query("upcoming"), now(), &[]);
        assert_eq!(ids(&selected), vec!["tomorrow", "next-month"]);
    }

    #[test]
    fn test_default_list_filter_uses_kind_not_id() {
        let lists = vec![
            TaskList {
                id: "u1-work".into(),
                name: "Work".into(),
                color: "#4ECDC4".into(),
                user_id: Some("u1".into()),
                default_kind: Some(DefaultList::Work),
                template_id: Some("work".into()),
            },
            TaskList {
                id: "renamed-work".into(),
                name: "Office".into(),
                color: "#4ECDC4".into(),
                user_id: None,
                default_kind: Some(DefaultList::Work),
                template_id: None,
            },
            TaskList {
                id: "work-stuff".into(),
                name: "work".into(),
                color: "#000000".into(),
                user_id: Some("u1".into()),
                default_kind: None,
                template_id: None,
            },
        ];
        let mut on_clone = task("clone", None, false);
        on_clone.list_id = Some("u1-work".into());
        let mut on_template = task("template", None, false);
        on_template.list_id = Some("renamed-work".into());
        let mut on_custom = task("custom", None, false);
        on_custom.list_id = Some("work-stuff".into());
        let tasks = vec![on_clone, on_template, on_custom, task("none", None, false)];

        let selected = select(&tasks, &query("work"), now(), &lists);
        assert_eq!(ids(&selected), vec!["clone", "template"]);
    }

    #[test]
    fn test_search_and_list_restriction() {
        let mut groceries = task("g", None, false);
        groceries.title = "Buy MILK".into();
        groceries.list_id = Some("home".into());
        let mut report = task("r", None, false);
        report.title = "Quarterly report".into();
        report.description = Some("include milk budget".into());
        report.list_id = Some("office".into());
        let tasks = vec![groceries, report, task("x", None, false)];

        let search = TaskQuery {
            search: Some("  Milk ".into()),
            ..TaskQuery::default()
        };
        assert_eq!(ids(&select(&tasks, &search, now(), &[])), vec!["g", "r"]);

        let narrowed = TaskQuery {
            search: Some("milk".into()),
            list_id: Some("office".into()),
            ..TaskQuery::default()
        };
        assert_eq!(ids(&select(&tasks, &narrowed, now(), &[])), vec!["r"]);
    }

    #[test]
    fn test_sort_overrides_replace_due_order() {
        let mut a = task("a", Some("2025-03-20"), false);
        a.title = "banana".into();
        a.created_at = Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap();
        let mut b = task("b", Some("2025-03-13"), false);
        b.title = "Apple".into();
        b.created_at = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let mut c = task("c", None, false);
        c.title = "cherry".into();
        c.created_at = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
        let tasks = vec![a, b, c];

        let by = |sort: &str| {
            let q = TaskQuery {
                sort: SortKey::parse(sort),
                ..TaskQuery::default()
            };
            select(&tasks, &q, now(), &[])
        };
        assert_eq!(ids(&by("dueDate")), vec!["b", "a", "c"]);
        assert_eq!(ids(&by("created")), vec!["a", "c", "b"]);
        assert_eq!(ids(&by("title")), vec!["b", "a", "c"]);
        assert_eq!(ids(&by("nonsense")), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_group_by_bucket_order() {
        let tasks = vec![
            task("later", Some("2025-04-01"), false),
            task("today", Some("2025-03-12"), false),
            task("overdue", Some("2025-03-10"), false),
            task("week", Some("2025-03-15"), false),
            task("none", None, false),
        ];
        let groups = group_by_bucket(&tasks, &TaskQuery::default(), now(), &[], Granularity::Detailed);
        let buckets: Vec<Bucket> = groups.iter().map(|g| g.bucket).collect();
        assert_eq!(
            buckets,
            vec![Bucket::Overdue, Bucket::Today, Bucket::ThisWeek, Bucket::Later]
        );
        assert_eq!(ids(&groups[3].tasks), vec!["later", "none"]);

        let flat = group_by_bucket(&tasks, &TaskQuery::default(), now(), &[], Granularity::Flat);
        let flat_buckets: Vec<Bucket> = flat.iter().map(|g| g.bucket).collect();
        assert_eq!(
            flat_buckets,
            vec![Bucket::Overdue, Bucket::Today, Bucket::Upcoming, Bucket::Later]
        );
        assert_eq!(ids(&flat[2].tasks), vec!["week", "later"]);
        assert_eq!(ids(&flat[3].tasks), vec!["none"]);
    }

    #[test]
    fn test_group_by_date() {
        let tasks = vec![
            task("b2", Some("2025-03-14T15:00"), false),
            task("a", Some("2025-03-13"), false),
            task("b1", Some("2025-03-14T09:00"), false),
            task("none", None, false),
        ];
        let groups = group_by_date(&tasks, &query("upcoming"), now(), &[]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, NaiveDate::from_ymd_opt(2025, 3, 13).unwrap());
        assert_eq!(ids(&groups[1].tasks), vec!["b1", "b2"]);
    }

    #[test]
    fn test_summary_counts_pending_only() {
        let tasks = vec![
            task("o", Some("2025-03-01"), false),
            task("t", Some("2025-03-12"), false),
            task("t-done", Some("2025-03-12"), true),
            task("tm", Some("2025-03-13"), false),
            task("w", Some("2025-03-14"), false),
            task("l", None, false),
        ];
        assert_eq!(
            summarize(&tasks, now()),
            BucketSummary {
                overdue: 1,
                today: 1,
                tomorrow: 1,
                this_week: 1,
                later: 1,
                total_pending: 5,
            }
        );
    }

    #[test]
    fn test_reschedule_plan_targets_incomplete_overdue() {
        let tasks = vec![
            task("late", Some("2025-03-10T17:00"), false),
            task("late-done", Some("2025-03-10"), true),
            task("today", Some("2025-03-12T08:00"), false),
            task("none", None, false),
        ];
        let plan = plan_reschedule_overdue(&tasks, now());
        assert_eq!(plan.task_ids, vec!["late".to_string()]);
        assert_eq!(plan.due_date.to_string(), "2025-03-13");
        assert!(!plan.due_date.has_time());
    }
}
