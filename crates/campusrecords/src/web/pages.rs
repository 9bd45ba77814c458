//! Page handlers and their askama templates.
//!
//! Each handler makes one or two data store calls and renders a template.
//! List pages fall back to a "no results" message; detail pages answer 404
//! and form posts answer 500 when the store call fails.

use std::collections::HashMap;

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use super::nav::{nav_links, NavLink};
use super::AppState;
use crate::model::{Course, Student, StudentFields, StudentUpdate};

/// Message shown when a list query fails.
const NO_RESULTS: &str = "no results";

// ============================================================================
// Templates
// ============================================================================

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    nav: Vec<NavLink>,
}

#[derive(Template)]
#[template(path = "about.html")]
struct AboutTemplate {
    nav: Vec<NavLink>,
}

#[derive(Template)]
#[template(path = "html_demo.html")]
struct HtmlDemoTemplate {
    nav: Vec<NavLink>,
}

#[derive(Template)]
#[template(path = "students.html")]
struct StudentsTemplate {
    nav: Vec<NavLink>,
    students: Vec<Student>,
    message: Option<String>,
}

#[derive(Template)]
#[template(path = "courses.html")]
struct CoursesTemplate {
    nav: Vec<NavLink>,
    courses: Vec<Course>,
    message: Option<String>,
}

#[derive(Template)]
#[template(path = "course.html")]
struct CourseTemplate {
    nav: Vec<NavLink>,
    course: Course,
}

#[derive(Template)]
#[template(path = "student.html")]
struct StudentTemplate {
    nav: Vec<NavLink>,
    student: Student,
    courses: Vec<Course>,
}

#[derive(Template)]
#[template(path = "add_student.html")]
struct AddStudentTemplate {
    nav: Vec<NavLink>,
    courses: Vec<Course>,
}

#[derive(Template)]
#[template(path = "404.html")]
struct NotFoundTemplate {
    nav: Vec<NavLink>,
}

// ============================================================================
// Error Handling
// ============================================================================

/// Failure responses for page handlers.
#[derive(Debug)]
pub enum PageError {
    /// 404 with a short plain-text body.
    NotFound(&'static str),
    /// 500 with a short plain-text body.
    Server(&'static str),
    /// A template failed to render.
    Render(askama::Error),
}

impl From<askama::Error> for PageError {
    fn from(err: askama::Error) -> Self {
        Self::Render(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            Self::Server(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response(),
            Self::Render(err) => {
                error!("Template error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

type PageResult = Result<Html<String>, PageError>;

fn page<T: Template>(template: &T) -> PageResult {
    Ok(Html(template.render()?))
}

/// Split a list query into rows and an optional fallback message.
fn listing<T>(result: crate::Result<Vec<T>>) -> (Vec<T>, Option<String>) {
    match result {
        Ok(rows) => (rows, None),
        Err(e) => {
            debug!("List query failed: {}", e);
            (Vec::new(), Some(NO_RESULTS.to_string()))
        }
    }
}

/// Convert url-encoded form fields into a JSON object of strings.
fn form_object(form: HashMap<String, String>) -> Value {
    Value::Object(
        form.into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect::<Map<String, Value>>(),
    )
}

// ============================================================================
// Static Pages
// ============================================================================

/// `GET /`
pub async fn home(uri: Uri) -> PageResult {
    page(&HomeTemplate {
        nav: nav_links(uri.path()),
    })
}

/// `GET /about`
pub async fn about(uri: Uri) -> PageResult {
    page(&AboutTemplate {
        nav: nav_links(uri.path()),
    })
}

/// `GET /htmlDemo`
pub async fn html_demo(uri: Uri) -> PageResult {
    page(&HtmlDemoTemplate {
        nav: nav_links(uri.path()),
    })
}

/// Fallback page for unknown paths.
pub async fn not_found(uri: Uri) -> Response {
    debug!("No route or file for {}", uri.path());
    match page(&NotFoundTemplate {
        nav: nav_links(uri.path()),
    }) {
        Ok(html) => (StatusCode::NOT_FOUND, html).into_response(),
        Err(e) => e.into_response(),
    }
}

// ============================================================================
// Record Pages
// ============================================================================

/// Query string for the student list.
#[derive(Debug, Default, Deserialize)]
pub struct StudentsQuery {
    /// Restrict the list to one course.
    pub course: Option<String>,
}

/// `GET /students`, optionally filtered with `?course=`.
///
/// An empty `course` value lists everyone.
pub async fn students(
    State(state): State<AppState>,
    Query(query): Query<StudentsQuery>,
    uri: Uri,
) -> PageResult {
    let result = match query.course.as_deref().filter(|c| !c.is_empty()) {
        Some(course) => state.store.get_students_by_course(course).await,
        None => state.store.get_all_students().await,
    };
    let (students, message) = listing(result);

    page(&StudentsTemplate {
        nav: nav_links(uri.path()),
        students,
        message,
    })
}

/// `GET /courses`
pub async fn courses(State(state): State<AppState>, uri: Uri) -> PageResult {
    let (courses, message) = listing(state.store.get_courses().await);

    page(&CoursesTemplate {
        nav: nav_links(uri.path()),
        courses,
        message,
    })
}

/// `GET /course/:id`
pub async fn course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
) -> PageResult {
    let course = state
        .store
        .get_course_by_id(id.as_str())
        .await
        .map_err(|_| PageError::NotFound("Course not found"))?;

    page(&CourseTemplate {
        nav: nav_links(uri.path()),
        course,
    })
}

/// `GET /student/:studentNum`, the edit form for one student.
pub async fn student(
    State(state): State<AppState>,
    Path(student_num): Path<String>,
    uri: Uri,
) -> PageResult {
    let student = state
        .store
        .get_student_by_num(student_num.as_str())
        .await
        .map_err(|_| PageError::NotFound("Student not found"))?;
    let courses = state.store.get_courses().await.unwrap_or_default();

    page(&StudentTemplate {
        nav: nav_links(uri.path()),
        student,
        courses,
    })
}

/// `GET /students/add`
pub async fn add_student_form(State(state): State<AppState>, uri: Uri) -> PageResult {
    let courses = state.store.get_courses().await.unwrap_or_default();

    page(&AddStudentTemplate {
        nav: nav_links(uri.path()),
        courses,
    })
}

/// `POST /students/add`
pub async fn add_student(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Redirect, PageError> {
    let fields: StudentFields = serde_json::from_value(form_object(form)).map_err(|e| {
        warn!("Rejected student form: {}", e);
        PageError::Server("Unable to add student")
    })?;

    state
        .store
        .add_student(fields)
        .await
        .map_err(|_| PageError::Server("Unable to add student"))?;

    Ok(Redirect::to("/students"))
}

/// `POST /student/update`
///
/// The form carries `studentNum` in a hidden field. An unchecked `TA` box
/// sends nothing, which clears the flag.
pub async fn update_student(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Redirect, PageError> {
    let update: StudentUpdate = serde_json::from_value(form_object(form)).map_err(|e| {
        warn!("Rejected student update form: {}", e);
        PageError::Server("Unable to update student")
    })?;

    state
        .store
        .update_student(update)
        .await
        .map_err(|_| PageError::Server("Unable to update student"))?;

    Ok(Redirect::to("/students"))
}
