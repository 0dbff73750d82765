use super::{delete_button, escape, layout};
use crate::flash::Flash;
use crate::forms::TaskForm;
use crate::middleware::AuthContext;
use crate::routes::paths;
use database_layer::Task;

pub fn task_board(auth: &AuthContext, flash: Option<&Flash>, tasks: &[Task]) -> String {
    let rows: String = if tasks.is_empty() {
        r#"<tr><td colspan="3">There are no tasks. Create one below!</td></tr>"#.to_string()
    } else {
        tasks
            .iter()
            .map(|task| {
                format!(
                    r#"<tr><td{class}>{content}</td><td>{added}</td><td><a href="{update}">Update</a> {delete}</td></tr>"#,
                    class = if task.completed { r#" class="done""# } else { "" },
                    content = escape(&task.content),
                    added = task.created_at.format("%Y-%m-%d"),
                    update = paths::fill(paths::UPDATE_TASK, task.id),
                    delete = delete_button(
                        &paths::fill(paths::DELETE_TASK, task.id),
                        "Delete",
                        "Delete this task?"
                    ),
                )
            })
            .collect()
    };

    let body = format!(
        r#"<section>
            <h1>Clinic tasks</h1>
            <table>
                <tr><th>Task</th><th>Added</th><th>Actions</th></tr>
                {rows}
            </table>
            <form method="post" action="{tasks}">
                <label>New task <input type="text" name="content" required></label>
                <p><button type="submit">Add task</button></p>
            </form>
        </section>"#,
        tasks = paths::TASKS,
    );
    layout("Tasks", Some(auth), flash, &body)
}

pub fn task_edit(auth: &AuthContext, flash: Option<&Flash>, id: i64, form: &TaskForm) -> String {
    let body = format!(
        r#"<section>
            <h1>Update task</h1>
            <form method="post" action="{action}">
                <label>Task <input type="text" name="content" value="{content}" required></label>
                <label><input type="checkbox" name="completed"{checked}> Completed</label>
                <p><button type="submit">Update</button> <a href="{tasks}">Cancel</a></p>
            </form>
        </section>"#,
        action = paths::fill(paths::UPDATE_TASK, id),
        content = escape(&form.content),
        checked = if form.completed.is_some() { " checked" } else { "" },
        tasks = paths::TASKS,
    );
    layout("Update task", Some(auth), flash, &body)
}
