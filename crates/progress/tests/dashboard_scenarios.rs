//! End-to-end dashboard scenarios through storage and the tracker.

use agencyops_core::{Category, ClientId, PedItem, PedScope, TeamMember, Time, Work, WorkStatus};
use agencyops_progress::{
    compute_capacity, AggregationEngine, DashboardTracker, DeadlineBucket, EngineConfig,
    StorageDashboardTracker,
};
use agencyops_storage::{JsonStorage, Storage};
use chrono::{Duration, TimeZone, Utc};

fn now() -> Time {
    Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap()
}

#[tokio::test]
async fn ten_works_split_into_deadline_lists() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = JsonStorage::new(dir.path()).await.unwrap();
    let category = Category::new("Social");
    storage.save_category(&category).await.unwrap();
    let client = ClientId::new();

    let mut works = Vec::new();
    for i in 0..3 {
        works.push(Work::new(format!("Due {}", i), client, category.id).with_deadline(now() + Duration::days(2)));
    }
    for i in 0..2 {
        works.push(Work::new(format!("Late {}", i), client, category.id).with_deadline(now() - Duration::days(1)));
    }
    let review = Work::new("Review", client, category.id)
        .with_status(WorkStatus::InReview)
        .with_deadline(now() + Duration::days(100));
    works.push(review.clone());
    for i in 0..4 {
        works.push(Work::new(format!("Open {}", i), client, category.id));
    }
    assert_eq!(works.len(), 10);
    for work in &works {
        storage.save_work(work).await.unwrap();
    }

    let tracker = StorageDashboardTracker::new(storage, EngineConfig::default());
    let view = tracker.dashboard(now()).await.unwrap();

    assert_eq!(view.stats.total, 10);
    assert_eq!(view.deadlines.works_in_deadline.total, 3);
    assert_eq!(view.deadlines.expired_works.total, 2);
    assert_eq!(view.deadlines.in_review_works.total, 1);
    assert!(view.deadlines.in_review_works.contains(review.id));
    assert!(!view.deadlines.works_in_deadline.contains(review.id));
    assert!(!view.deadlines.expired_works.contains(review.id));
    assert_eq!(view.deadlines.in_review_works.entries[0].bucket, DeadlineBucket::Normal);
}

#[test]
fn team_over_ceiling_is_overloaded() {
    let works: Vec<Work> = (0..44)
        .map(|i| Work::new(format!("W{}", i), ClientId::new(), Category::new("x").id))
        .collect();
    let view = AggregationEngine::new(EngineConfig::default().with_max_team_capacity(40))
        .dashboard(&works, &[], now())
        .unwrap();
    assert_eq!(view.stats.capacity.saturation_pct, 110);
    assert!(view.stats.capacity.is_overloaded);
    assert_eq!(view.stats.capacity, compute_capacity(40, 44).unwrap());
}

#[tokio::test]
async fn weekly_rows_add_up() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = JsonStorage::new(dir.path()).await.unwrap();
    let members = [TeamMember::new("Ada"), TeamMember::new("Linus"), TeamMember::new("Grace")];
    for member in &members {
        storage.save_member(member).await.unwrap();
    }
    for (i, member) in members.iter().enumerate() {
        for d in 0..=i as i64 {
            let work = Work::new("W", ClientId::new(), Category::new("x").id)
                .with_assignee(member.id)
                .with_deadline(now() + Duration::days(d));
            storage.save_work(&work).await.unwrap();
            let item = PedItem::new(members[0].id, member.id, ClientId::new(), now().date_naive(), "post", d);
            storage.save_ped_item(&item).await.unwrap();
        }
    }

    let tracker = StorageDashboardTracker::new(storage, EngineConfig::default());
    let overview = tracker.weekly_load(now(), PedScope::Assignee).await.unwrap();

    assert_eq!(overview.rows.len(), 3);
    for row in &overview.rows {
        assert_eq!(row.total, row.task_count + row.work_count);
    }
    let names: Vec<&str> = overview.rows.iter().map(|r| r.user_name.as_str()).collect();
    assert_eq!(names, vec!["Ada", "Grace", "Linus"]);
    assert_eq!(overview.row_for(members[0].id).unwrap().total, 2);
    assert_eq!(overview.row_for(members[1].id).unwrap().total, 4);
    assert_eq!(overview.row_for(members[2].id).unwrap().total, 6);
    assert_eq!(overview.max_total, 6);

    let by_owner = tracker.weekly_load(now(), PedScope::Owner).await.unwrap();
    assert_eq!(by_owner.row_for(members[0].id).unwrap().task_count, 6);
    assert_eq!(by_owner.row_for(members[2].id).unwrap().task_count, 0);
}
