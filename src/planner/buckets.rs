use chrono::{Days, NaiveDate, TimeZone};

use super::task::Task;

/// One of the three day columns, relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeDay {
    Yesterday,
    Today,
    Tomorrow,
}

impl RelativeDay {
    pub const ALL: [RelativeDay; 3] = [
        RelativeDay::Yesterday,
        RelativeDay::Today,
        RelativeDay::Tomorrow,
    ];

    pub fn index(self) -> usize {
        match self {
            RelativeDay::Yesterday => 0,
            RelativeDay::Today => 1,
            RelativeDay::Tomorrow => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RelativeDay::Yesterday => "Yesterday",
            RelativeDay::Today => "Today",
            RelativeDay::Tomorrow => "Tomorrow",
        }
    }

    /// Next column to the right, stopping at tomorrow.
    pub fn next(self) -> Self {
        match self {
            RelativeDay::Yesterday => RelativeDay::Today,
            RelativeDay::Today | RelativeDay::Tomorrow => RelativeDay::Tomorrow,
        }
    }

    /// Next column to the left, stopping at yesterday.
    pub fn prev(self) -> Self {
        match self {
            RelativeDay::Tomorrow => RelativeDay::Today,
            RelativeDay::Today | RelativeDay::Yesterday => RelativeDay::Yesterday,
        }
    }

    /// The calendar date this column stands for.
    pub fn date_from(self, reference: NaiveDate) -> NaiveDate {
        match self {
            RelativeDay::Yesterday => reference
                .checked_sub_days(Days::new(1))
                .unwrap_or(reference),
            RelativeDay::Today => reference,
            RelativeDay::Tomorrow => reference
                .checked_add_days(Days::new(1))
                .unwrap_or(reference),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket<'a> {
    pub day: RelativeDay,
    pub date: NaiveDate,
    pub tasks: Vec<&'a Task>,
}

/// Split tasks into yesterday/today/tomorrow around `reference`.
///
/// A task matches a bucket when its due date (creation date if unset), seen in
/// `tz`, falls on the bucket's calendar day. Tasks outside the three days are
/// left out. Order within a bucket follows `tasks`.
pub fn bucket_by_relative_day<'a, Tz: TimeZone>(
    tasks: &'a [Task],
    reference: NaiveDate,
    tz: &Tz,
) -> [DayBucket<'a>; 3] {
    let mut buckets = RelativeDay::ALL.map(|day| DayBucket {
        day,
        date: day.date_from(reference),
        tasks: Vec::new(),
    });

    for task in tasks {
        let date = task.effective_date().with_timezone(tz).date_naive();
        if let Some(bucket) = buckets.iter_mut().find(|b| b.date == date) {
            bucket.tasks.push(task);
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset, Utc};

    use super::*;
    use crate::planner::task::NewTask;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn task_due(title: &str, due: DateTime<Utc>) -> Task {
        NewTask {
            title: title.to_string(),
            description: String::new(),
            due_date: Some(due),
        }
        .into_task("a@b", at(2025, 1, 1, 0))
        .unwrap()
    }

    fn titles<'a>(bucket: &DayBucket<'a>) -> Vec<&'a str> {
        bucket.tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn task_due_today_lands_only_in_today() {
        let tasks = vec![task_due("Buy milk", at(2025, 3, 20, 9))];
        let [yesterday, today, tomorrow] = bucket_by_relative_day(&tasks, date(2025, 3, 20), &Utc);

        assert!(yesterday.tasks.is_empty());
        assert_eq!(titles(&today), vec!["Buy milk"]);
        assert!(tomorrow.tasks.is_empty());
    }

    #[test]
    fn buckets_carry_their_dates() {
        let buckets = bucket_by_relative_day(&[], date(2025, 3, 1), &Utc);
        assert_eq!(buckets[0].date, date(2025, 2, 28));
        assert_eq!(buckets[1].date, date(2025, 3, 1));
        assert_eq!(buckets[2].date, date(2025, 3, 2));
        assert_eq!(buckets.map(|b| b.day), RelativeDay::ALL);
    }

    #[test]
    fn time_of_day_is_ignored_and_far_dates_are_excluded() {
        let tasks = vec![
            task_due("late yesterday", at(2025, 3, 19, 23)),
            task_due("early tomorrow", at(2025, 3, 21, 0)),
            task_due("next week", at(2025, 3, 27, 12)),
            task_due("last year", at(2024, 3, 20, 12)),
        ];
        let buckets = bucket_by_relative_day(&tasks, date(2025, 3, 20), &Utc);

        assert_eq!(titles(&buckets[0]), vec!["late yesterday"]);
        assert!(buckets[1].tasks.is_empty());
        assert_eq!(titles(&buckets[2]), vec!["early tomorrow"]);
        let placed: usize = buckets.iter().map(|b| b.tasks.len()).sum();
        assert_eq!(placed, 2);
    }

    #[test]
    fn missing_due_date_uses_creation_date() {
        let mut task = task_due("created", at(2025, 3, 20, 9));
        task.due_date = None;
        task.created_at = at(2025, 3, 21, 9);
        let tasks = vec![task];

        let buckets = bucket_by_relative_day(&tasks, date(2025, 3, 20), &Utc);
        assert_eq!(titles(&buckets[2]), vec!["created"]);
    }

    #[test]
    fn day_boundary_follows_time_zone() {
        // 23:30 UTC on the 20th is already the 21st at UTC+2.
        let tasks = vec![task_due("edge", Utc.with_ymd_and_hms(2025, 3, 20, 23, 30, 0).unwrap())];
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();

        let buckets = bucket_by_relative_day(&tasks, date(2025, 3, 20), &plus_two);
        assert!(buckets[1].tasks.is_empty());
        assert_eq!(titles(&buckets[2]), vec!["edge"]);
    }

    #[test]
    fn bucketing_is_idempotent_and_exclusive() {
        let tasks: Vec<Task> = (0..12)
            .map(|h| task_due(&format!("t{h}"), at(2025, 3, 18 + (h % 5), h)))
            .collect();
        let reference = date(2025, 3, 20);

        let first = bucket_by_relative_day(&tasks, reference, &Utc);
        let second = bucket_by_relative_day(&tasks, reference, &Utc);
        assert_eq!(first, second);

        for task in &tasks {
            let hits = first
                .iter()
                .filter(|b| b.tasks.iter().any(|t| t.id == task.id))
                .count();
            assert!(hits <= 1, "{} placed {} times", task.title, hits);
        }
    }

    #[test]
    fn relative_day_navigation_stops_at_ends() {
        assert_eq!(RelativeDay::Yesterday.prev(), RelativeDay::Yesterday);
        assert_eq!(RelativeDay::Yesterday.next(), RelativeDay::Today);
        assert_eq!(RelativeDay::Tomorrow.next(), RelativeDay::Tomorrow);
        assert_eq!(RelativeDay::Tomorrow.prev(), RelativeDay::Today);
    }
}
