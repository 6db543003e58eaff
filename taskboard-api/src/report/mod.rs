/// PDF report compiler
///
/// Turns user and task rows into downloadable PDF documents. Two reports
/// exist: a global one covering every user and task, and a per-user one
/// covering a single user's profile and assigned tasks. Both are built with
/// the built-in Helvetica fonts and manual table layout; see [`writer`] for
/// the page geometry.
///
/// # Example
///
/// ```no_run
/// use taskboard_api::report;
///
/// # fn example(users: &[taskboard_shared::models::user::UserSummary],
/// #            tasks: &[taskboard_shared::models::task::TaskWithNames])
/// #            -> Result<(), report::ReportError> {
/// let bytes = report::global_report(users, tasks)?;
/// assert!(bytes.starts_with(b"%PDF"));
/// # Ok(())
/// # }
/// ```

mod writer;

use chrono::Utc;
use taskboard_shared::models::{
    task::{TaskStatus, TaskWithNames},
    user::{Role, UserSummary},
};
use thiserror::Error;
use uuid::Uuid;

use writer::DocWriter;

/// Description column limit in the global report
const GLOBAL_DESC_LIMIT: usize = 65;

/// Description column limit in the per-user report
const USER_DESC_LIMIT: usize = 70;

/// Cursor position (mm from top) past which a per-user status table starts
/// on a fresh page
const USER_SECTION_BREAK: f32 = 220.0;

/// Errors produced while compiling a report
#[derive(Debug, Error)]
pub enum ReportError {
    /// The PDF backend failed to encode the document
    #[error("PDF generation failed: {0}")]
    Pdf(#[from] printpdf::Error),
}

/// Truncates a string to at most `max` characters
///
/// Strings longer than `max` are cut to `max - 3` characters with `...`
/// appended, so the result never exceeds `max`. Counts characters, not
/// bytes, so multi-byte text is never split mid-character.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut cut: String = text.chars().take(max - 3).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

/// Completion rate as a whole percentage, rounded half-up
fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 * 100.0) / total as f64).round() as u32
}

/// Per-employee task metrics for the global report
#[derive(Debug, Clone, PartialEq)]
struct EmployeeMetrics {
    name: String,
    total: usize,
    completed: usize,
    pending: usize,
    in_progress: usize,
    review: usize,
}

impl EmployeeMetrics {
    fn completion_rate(&self) -> u32 {
        completion_rate(self.completed, self.total)
    }
}

/// Computes metrics per employee, skipping employees with no tasks
///
/// Order follows the user listing. Counts assignment, not creation.
fn employee_metrics(users: &[UserSummary], tasks: &[TaskWithNames]) -> Vec<EmployeeMetrics> {
    users
        .iter()
        .filter(|u| u.role == Role::Employee)
        .filter_map(|user| {
            let assigned: Vec<&TaskWithNames> =
                tasks.iter().filter(|t| t.assigned_to == user.id).collect();
            if assigned.is_empty() {
                return None;
            }

            let count =
                |s: TaskStatus| assigned.iter().filter(|t| t.status == s).count();

            Some(EmployeeMetrics {
                name: user.name.clone(),
                total: assigned.len(),
                completed: count(TaskStatus::Completed),
                pending: count(TaskStatus::Pending),
                in_progress: count(TaskStatus::InProgress),
                review: count(TaskStatus::Review),
            })
        })
        .collect()
}

fn count_by_status(tasks: &[TaskWithNames], status: TaskStatus) -> usize {
    tasks.iter().filter(|t| t.status == status).count()
}

fn short_id(id: Uuid) -> String {
    let full = id.to_string();
    format!("{}...", &full[..8])
}

/// Compiles the global report: every user, every task
///
/// Layout: title page with user summaries and the full user listing, a page
/// of task summaries by status and priority, one page per non-empty status
/// with its task table, and a final page of per-employee metrics.
pub fn global_report(
    users: &[UserSummary],
    tasks: &[TaskWithNames],
) -> Result<Vec<u8>, ReportError> {
    let mut doc = DocWriter::new("TaskBoard Global Report")?;

    doc.title("TaskBoard Global Report");
    doc.text(&format!("Generated: {}", Utc::now().format("%Y-%m-%d %H:%M UTC")));
    doc.rule();

    // Users by role
    doc.heading("Users by Role");
    let rows: Vec<Vec<String>> = [Role::Admin, Role::Employee]
        .iter()
        .map(|role| {
            let count = users.iter().filter(|u| u.role == *role).count();
            vec![role.label().to_string(), count.to_string()]
        })
        .collect();
    doc.table(&["Role", "Count"], &[60.0, 30.0], &rows);

    // Full user listing
    doc.heading("All Users");
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.username.clone(),
                u.name.clone(),
                u.email.clone(),
                u.role.label().to_string(),
            ]
        })
        .collect();
    doc.table(
        &["Username", "Name", "Email", "Role"],
        &[40.0, 50.0, 60.0, 32.0],
        &rows,
    );

    // Task summaries
    doc.new_page();
    doc.heading("Tasks by Status");
    let rows: Vec<Vec<String>> = TaskStatus::ALL
        .iter()
        .map(|s| vec![s.label().to_string(), count_by_status(tasks, *s).to_string()])
        .collect();
    doc.table(&["Status", "Count"], &[60.0, 30.0], &rows);

    doc.heading("Tasks by Priority");
    use taskboard_shared::models::task::TaskPriority;
    let rows: Vec<Vec<String>> = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High]
        .iter()
        .map(|p| {
            let count = tasks.iter().filter(|t| t.priority == *p).count();
            vec![p.label().to_string(), count.to_string()]
        })
        .collect();
    doc.table(&["Priority", "Count"], &[60.0, 30.0], &rows);

    // One page per non-empty status
    for status in TaskStatus::ALL {
        let in_status: Vec<&TaskWithNames> =
            tasks.iter().filter(|t| t.status == status).collect();
        if in_status.is_empty() {
            continue;
        }

        doc.new_page();
        doc.heading(&format!("{} Tasks", status.label()));
        let rows: Vec<Vec<String>> = in_status
            .iter()
            .map(|t| {
                vec![
                    truncate(&t.title, 30),
                    t.assignee_name.clone(),
                    t.priority.label().to_string(),
                    truncate(&t.description, GLOBAL_DESC_LIMIT),
                ]
            })
            .collect();
        doc.table(
            &["Title", "Assignee", "Priority", "Description"],
            &[45.0, 35.0, 22.0, 80.0],
            &rows,
        );
    }

    // Per-employee metrics
    doc.new_page();
    doc.heading("Employee Metrics");
    let metrics = employee_metrics(users, tasks);
    if metrics.is_empty() {
        doc.text("No task metrics available.");
    } else {
        let rows: Vec<Vec<String>> = metrics
            .iter()
            .map(|m| {
                vec![
                    m.name.clone(),
                    m.total.to_string(),
                    m.completed.to_string(),
                    m.pending.to_string(),
                    m.in_progress.to_string(),
                    m.review.to_string(),
                    format!("{}%", m.completion_rate()),
                ]
            })
            .collect();
        doc.table(
            &[
                "Employee",
                "Total",
                "Done",
                "Pending",
                "Active",
                "Review",
                "Rate",
            ],
            &[50.0, 20.0, 20.0, 22.0, 22.0, 22.0, 22.0],
            &rows,
        );
    }

    doc.finish()
}

/// Compiles the per-user report: profile plus assigned tasks
///
/// `tasks` must already be filtered to the user's assignments. Each status
/// section starts on a fresh page when the cursor is low on the current one.
pub fn user_report(
    user: &UserSummary,
    tasks: &[TaskWithNames],
) -> Result<Vec<u8>, ReportError> {
    let mut doc = DocWriter::new("TaskBoard User Report")?;

    doc.title(&format!("TaskBoard Report: {}", user.name));
    doc.text(&format!("Generated: {}", Utc::now().format("%Y-%m-%d %H:%M UTC")));
    doc.rule();

    // Profile
    doc.heading("Profile");
    let rows = vec![
        vec!["ID".to_string(), short_id(user.id)],
        vec!["Username".to_string(), user.username.clone()],
        vec!["Name".to_string(), user.name.clone()],
        vec!["Email".to_string(), user.email.clone()],
        vec!["Role".to_string(), user.role.label().to_string()],
    ];
    doc.table(&["Field", "Value"], &[40.0, 120.0], &rows);

    // Summary
    doc.heading("Task Summary");
    let mut rows = vec![vec!["Total".to_string(), tasks.len().to_string()]];
    for status in TaskStatus::ALL {
        rows.push(vec![
            status.label().to_string(),
            count_by_status(tasks, status).to_string(),
        ]);
    }
    doc.table(&["Status", "Count"], &[60.0, 30.0], &rows);

    if tasks.is_empty() {
        doc.text("No tasks assigned.");
        return doc.finish();
    }

    for status in TaskStatus::ALL {
        let in_status: Vec<&TaskWithNames> =
            tasks.iter().filter(|t| t.status == status).collect();
        if in_status.is_empty() {
            continue;
        }

        // Keep each status table away from the bottom of the page
        if doc.cursor() > USER_SECTION_BREAK {
            doc.new_page();
        }

        doc.heading(&format!("{} Tasks", status.label()));
        let rows: Vec<Vec<String>> = in_status
            .iter()
            .map(|t| {
                vec![
                    truncate(&t.title, 35),
                    t.priority.label().to_string(),
                    truncate(&t.description, USER_DESC_LIMIT),
                ]
            })
            .collect();
        doc.table(
            &["Title", "Priority", "Description"],
            &[55.0, 25.0, 100.0],
            &rows,
        );
    }

    doc.finish()
}
