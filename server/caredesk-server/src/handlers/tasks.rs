use crate::error::{ApiError, OptionExt};
use crate::flash::{self, Flash, IncomingFlash};
use crate::forms::{FormValidation, TaskForm};
use crate::middleware::DoctorContext;
use crate::routes::paths;
use crate::server::ClinicServer;
use crate::views;
use axum::{
    extract::{Form, Path, State},
    response::Response,
};
use tracing::{error, info};

/// Task board, oldest first
pub async fn list(
    State(server): State<ClinicServer>,
    DoctorContext(auth): DoctorContext,
    incoming: IncomingFlash,
) -> Result<Response, ApiError> {
    let tasks = server.db.tasks.list().await?;
    let html = views::tasks::task_board(&auth, incoming.get(), &tasks);
    Ok(flash::page(html, &incoming))
}

pub async fn add(
    State(server): State<ClinicServer>,
    DoctorContext(auth): DoctorContext,
    Form(form): Form<TaskForm>,
) -> Response {
    let input = match form.validate() {
        Ok(input) => input,
        Err(e) => return flash::redirect(paths::TASKS, Flash::error(e.to_string())),
    };

    match server.db.tasks.create(&input.content).await {
        Ok(task) => {
            info!(user_id = auth.user_id, task_id = task.id, "Task added");
            flash::redirect(paths::TASKS, Flash::success("Task added."))
        }
        Err(e) => {
            error!(error = %e, "Failed to add task");
            flash::redirect(paths::TASKS, Flash::error("There was an issue adding your task."))
        }
    }
}

pub async fn edit_form(
    State(server): State<ClinicServer>,
    DoctorContext(auth): DoctorContext,
    Path(id): Path<i64>,
    incoming: IncomingFlash,
) -> Result<Response, ApiError> {
    let task = server.db.tasks.find_by_id(id).await?.or_not_found("Task")?;
    let html = views::tasks::task_edit(&auth, incoming.get(), id, &TaskForm::from(&task));
    Ok(flash::page(html, &incoming))
}

pub async fn update(
    State(server): State<ClinicServer>,
    DoctorContext(auth): DoctorContext,
    Path(id): Path<i64>,
    Form(form): Form<TaskForm>,
) -> Result<Response, ApiError> {
    server.db.tasks.find_by_id(id).await?.or_not_found("Task")?;

    let input = match form.validate() {
        Ok(input) => input,
        Err(e) => {
            return Ok(flash::redirect(
                &paths::fill(paths::UPDATE_TASK, id),
                Flash::error(e.to_string()),
            ))
        }
    };

    match server.db.tasks.update(id, &input).await {
        Ok(Some(task)) => {
            info!(user_id = auth.user_id, task_id = id, completed = task.completed, "Task updated");
            Ok(flash::redirect(paths::TASKS, Flash::success("Task updated.")))
        }
        Ok(None) => Err(ApiError::not_found("Task")),
        Err(e) => {
            error!(task_id = id, error = %e, "Failed to update task");
            Ok(flash::redirect(
                paths::TASKS,
                Flash::error("There was an issue updating your task."),
            ))
        }
    }
}

pub async fn delete(
    State(server): State<ClinicServer>,
    DoctorContext(auth): DoctorContext,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    server.db.tasks.find_by_id(id).await?.or_not_found("Task")?;

    match server.db.tasks.delete(id).await {
        Ok(_) => {
            info!(user_id = auth.user_id, task_id = id, "Task deleted");
            Ok(flash::redirect(paths::TASKS, Flash::success("Task deleted.")))
        }
        Err(e) => {
            error!(task_id = id, error = %e, "Failed to delete task");
            Ok(flash::redirect(
                paths::TASKS,
                Flash::error("There was an issue deleting that task."),
            ))
        }
    }
}
