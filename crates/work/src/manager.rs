//! Work management service.

use std::sync::Arc;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use tokio::sync::Mutex;
use tracing::{debug, info};
use agencyops_core::{
    next_sort_order_in, sort_for_display, CategoryId, ClientId, PedFilter, PedItem, PedItemId,
    PedKind, PedPriority, PedScope, PedStatus, StepId, Time, TodoId, TransitionKind, UserId,
    UserTodo, Work, WorkId, WorkStatus, WorkStep,
};
use agencyops_storage::Storage;
use crate::{Result, WorkError};

/// Work management service.
#[async_trait]
pub trait WorkManager: Send + Sync {
    /// Create a new work in `Todo`.
    async fn create_work(&self, spec: WorkSpec) -> Result<Work>;

    /// Move a work to any status.
    async fn change_work_status(&self, id: WorkId, requested: WorkStatus, now: Time) -> Result<Work>;

    /// Pause a work, remembering where it was.
    async fn pause_work(&self, id: WorkId, now: Time) -> Result<Work>;

    /// Resume a paused work.
    async fn resume_work(&self, id: WorkId, now: Time) -> Result<Work>;

    /// Reopen a finished work.
    async fn reopen_work(&self, id: WorkId, now: Time) -> Result<Work>;

    /// Append a step to a work.
    async fn add_step(&self, work_id: WorkId, title: String) -> Result<WorkStep>;

    /// Flip a step between open and done.
    async fn toggle_step(&self, id: StepId, now: Time) -> Result<WorkStep>;

    /// Steps of a work in display order.
    async fn list_steps(&self, work_id: WorkId) -> Result<Vec<WorkStep>>;

    /// Append a todo to a user's list.
    async fn add_todo(&self, user: UserId, title: String) -> Result<UserTodo>;

    /// Complete or reopen one of `user`'s todos.
    async fn set_todo_completed(&self, user: UserId, id: TodoId, completed: bool, now: Time) -> Result<UserTodo>;

    /// A user's todos in display order.
    async fn list_todos(&self, user: UserId) -> Result<Vec<UserTodo>>;

    /// Add a plan item at the end of its day for its assignee.
    async fn add_ped_item(&self, spec: PedItemSpec) -> Result<PedItem>;

    /// Change a plan item's status.
    async fn set_ped_status(&self, id: PedItemId, status: PedStatus) -> Result<PedItem>;
}

/// Specification for creating a work.
#[derive(Debug, Clone)]
pub struct WorkSpec {
    /// Title
    pub title: String,
    /// Owning client
    pub client_id: ClientId,
    /// Category
    pub category_id: CategoryId,
    /// Assignee
    pub assigned_to: Option<UserId>,
    /// Deadline
    pub deadline: Option<Time>,
}

/// Specification for creating a plan item.
#[derive(Debug, Clone)]
pub struct PedItemSpec {
    /// Planner
    pub owner_id: UserId,
    /// Executor
    pub assigned_to: UserId,
    /// Client
    pub client_id: ClientId,
    /// Plan day
    pub date: NaiveDate,
    /// Title
    pub title: String,
    /// Content or task
    pub kind: PedKind,
    /// Free-form content type
    pub content_type: String,
    /// Priority
    pub priority: PedPriority,
    /// Ad-hoc addition outside the plan
    pub is_extra: bool,
}

/// Basic work manager implementation.
pub struct BasicWorkManager<S: Storage> {
    storage: Arc<Mutex<S>>,
}

impl<S: Storage> BasicWorkManager<S> {
    /// Create a new work manager.
    pub fn new(storage: S) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
        }
    }

    /// Commit pending writes in the underlying storage.
    pub async fn commit(&self, message: &str) -> Result<()> {
        self.storage.lock().await.commit(message).await?;
        Ok(())
    }

    /// Load a work by ID.
    pub async fn load_work(&self, id: WorkId) -> Result<Work> {
        self.storage
            .lock()
            .await
            .load_work(id)
            .await?
            .ok_or_else(|| WorkError::not_found("work", id))
    }

    async fn apply<F>(&self, id: WorkId, change: F) -> Result<Work>
    where
        F: FnOnce(&mut Work) -> TransitionKind + Send,
    {
        let mut storage = self.storage.lock().await;
        let mut work = storage
            .load_work(id)
            .await?
            .ok_or_else(|| WorkError::not_found("work", id))?;

        let from = work.status;
        let kind = change(&mut work);
        if kind == TransitionKind::Unchanged {
            debug!("Work {} left in {}", id, from);
            return Ok(work);
        }
        storage.save_work(&work).await?;
        info!("Work {}: {} -> {} ({:?})", id, from, work.status, kind);
        Ok(work)
    }
}

#[async_trait]
impl<S: Storage + 'static> WorkManager for BasicWorkManager<S> {
    async fn create_work(&self, spec: WorkSpec) -> Result<Work> {
        let mut work = Work::new(spec.title, spec.client_id, spec.category_id);
        work.assigned_to = spec.assigned_to;
        work.deadline = spec.deadline;

        self.storage.lock().await.save_work(&work).await?;
        info!("Created work {} ({})", work.id, work.title);
        Ok(work)
    }

    async fn change_work_status(&self, id: WorkId, requested: WorkStatus, now: Time) -> Result<Work> {
        self.apply(id, |work| work.set_status(requested, now)).await
    }

    async fn pause_work(&self, id: WorkId, now: Time) -> Result<Work> {
        self.apply(id, |work| work.pause(now)).await
    }

    async fn resume_work(&self, id: WorkId, now: Time) -> Result<Work> {
        self.apply(id, |work| work.resume(now)).await
    }

    async fn reopen_work(&self, id: WorkId, now: Time) -> Result<Work> {
        self.apply(id, |work| work.reopen(now)).await
    }

    async fn add_step(&self, work_id: WorkId, title: String) -> Result<WorkStep> {
        let mut storage = self.storage.lock().await;
        if storage.load_work(work_id).await?.is_none() {
            return Err(WorkError::not_found("work", work_id));
        }

        let existing = storage.list_steps(work_id).await?;
        let step = WorkStep::new(work_id, title, next_sort_order_in(&existing));
        storage.save_step(&step).await?;

        info!("Added step {} to work {} at {}", step.id, work_id, step.sort_order);
        Ok(step)
    }

    async fn toggle_step(&self, id: StepId, now: Time) -> Result<WorkStep> {
        let mut storage = self.storage.lock().await;
        let mut step = storage
            .load_step(id)
            .await?
            .ok_or_else(|| WorkError::not_found("step", id))?;

        let status = step.toggle(now);
        storage.save_step(&step).await?;

        info!("Step {} is now {:?}", id, status);
        Ok(step)
    }

    async fn list_steps(&self, work_id: WorkId) -> Result<Vec<WorkStep>> {
        let mut steps = self.storage.lock().await.list_steps(work_id).await?;
        sort_for_display(&mut steps);
        Ok(steps)
    }

    async fn add_todo(&self, user: UserId, title: String) -> Result<UserTodo> {
        let mut storage = self.storage.lock().await;
        let existing = storage.list_todos(user).await?;
        let todo = UserTodo::new(user, title, next_sort_order_in(&existing));
        storage.save_todo(&todo).await?;

        info!("Added todo {} for {}", todo.id, user);
        Ok(todo)
    }

    async fn set_todo_completed(&self, user: UserId, id: TodoId, completed: bool, now: Time) -> Result<UserTodo> {
        let mut storage = self.storage.lock().await;
        let mut todo = storage
            .load_todo(id)
            .await?
            .ok_or_else(|| WorkError::not_found("todo", id))?;

        if todo.user_id != user {
            return Err(WorkError::NotOwner {
                kind: "todo",
                id: id.to_string(),
                user,
            });
        }

        todo.set_completed(completed, now);
        storage.save_todo(&todo).await?;
        Ok(todo)
    }

    async fn list_todos(&self, user: UserId) -> Result<Vec<UserTodo>> {
        let mut todos = self.storage.lock().await.list_todos(user).await?;
        sort_for_display(&mut todos);
        Ok(todos)
    }

    async fn add_ped_item(&self, spec: PedItemSpec) -> Result<PedItem> {
        let mut storage = self.storage.lock().await;

        // Scope: same day, same assignee
        let scope = PedFilter {
            from: Some(spec.date),
            until: Some(spec.date + Duration::days(1)),
            user: Some(spec.assigned_to),
            scope: PedScope::Assignee,
            client_id: None,
        };
        let existing = storage.list_ped_items(&scope).await?;

        let mut item = PedItem::new(
            spec.owner_id,
            spec.assigned_to,
            spec.client_id,
            spec.date,
            spec.content_type,
            next_sort_order_in(&existing),
        );
        item.title = spec.title;
        item.kind = spec.kind;
        item.priority = spec.priority;
        item.is_extra = spec.is_extra;
        storage.save_ped_item(&item).await?;

        info!("Planned {} for {} on {} at {}", item.id, item.assigned_to, item.date, item.sort_order);
        Ok(item)
    }

    async fn set_ped_status(&self, id: PedItemId, status: PedStatus) -> Result<PedItem> {
        let mut storage = self.storage.lock().await;
        let mut item = storage
            .load_ped_item(id)
            .await?
            .ok_or_else(|| WorkError::not_found("plan item", id))?;

        item.set_status(status);
        storage.save_ped_item(&item).await?;
        Ok(item)
    }
}
