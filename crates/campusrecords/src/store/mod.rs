//! Data store for campusrecords.
//!
//! Holds the student and course collections in memory after a one-time load
//! from their JSON documents, answers queries against them, and writes the
//! student document back after every add or update.
//!
//! Mutations go through a single FIFO writer queue. Each one builds the new
//! collection from a snapshot, persists it, and only then swaps it into
//! memory, so a failed write leaves both memory and disk untouched. Reads
//! take a short shared lock and never wait on file I/O.

pub mod document;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, OnceCell, RwLock};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Course, RecordKey, Student, StudentFields, StudentUpdate};

pub use document::WriteMode;

/// Both collections, created once by [`DataStore::initialize`].
#[derive(Debug)]
struct Collections {
    students: RwLock<Vec<Student>>,
    courses: Vec<Course>,
    loaded_at: DateTime<Utc>,
}

/// In-memory store over the student and course documents.
///
/// Construct one per process and share it (e.g. behind an `Arc`). Every
/// query and mutation fails with [`Error::Uninitialized`] until
/// [`initialize`](Self::initialize) has succeeded.
#[derive(Debug)]
pub struct DataStore {
    /// Path to the student document.
    students_path: PathBuf,
    /// Path to the course document.
    courses_path: PathBuf,
    /// How the student document is written back.
    write_mode: WriteMode,
    /// The loaded collections.
    collections: OnceCell<Collections>,
    /// Serializes mutations, one in flight at a time.
    writer: Mutex<()>,
}

impl DataStore {
    /// Create an uninitialized store over the given documents.
    #[must_use]
    pub fn new(students_path: impl Into<PathBuf>, courses_path: impl Into<PathBuf>) -> Self {
        Self {
            students_path: students_path.into(),
            courses_path: courses_path.into(),
            write_mode: WriteMode::default(),
            collections: OnceCell::new(),
            writer: Mutex::new(()),
        }
    }

    /// Create an uninitialized store from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.students_path(), config.courses_path())
            .with_write_mode(WriteMode::from_atomic(config.data.atomic_writes))
    }

    /// Set how the student document is written back.
    #[must_use]
    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    /// Create a store from configuration and initialize it.
    ///
    /// # Errors
    ///
    /// Returns a load error if either document cannot be read or parsed.
    pub async fn open(config: &Config) -> Result<Self> {
        let store = Self::from_config(config);
        store.initialize().await?;
        Ok(store)
    }

    /// Load both documents into memory.
    ///
    /// The student document is read first; a failure on either document
    /// leaves the store uninitialized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] or [`Error::Parse`] naming the failing
    /// document, or [`Error::AlreadyInitialized`] on a second call.
    pub async fn initialize(&self) -> Result<()> {
        if self.collections.initialized() {
            return Err(Error::AlreadyInitialized);
        }

        let students: Vec<Student> = document::load(&self.students_path).await?;
        let courses: Vec<Course> = document::load(&self.courses_path).await?;

        info!(
            "Loaded {} students from {} and {} courses from {}",
            students.len(),
            self.students_path.display(),
            courses.len(),
            self.courses_path.display()
        );

        self.collections
            .set(Collections {
                students: RwLock::new(students),
                courses,
                loaded_at: Utc::now(),
            })
            .map_err(|_| Error::AlreadyInitialized)
    }

    /// Check whether [`initialize`](Self::initialize) has succeeded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.collections.initialized()
    }

    /// Get the student document path.
    #[must_use]
    pub fn students_path(&self) -> &Path {
        &self.students_path
    }

    /// Get the course document path.
    #[must_use]
    pub fn courses_path(&self) -> &Path {
        &self.courses_path
    }

    fn collections(&self) -> Result<&Collections> {
        self.collections.get().ok_or(Error::Uninitialized)
    }

    /// Get every student, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResult`] if there are no students.
    pub async fn get_all_students(&self) -> Result<Vec<Student>> {
        let students = self.collections()?.students.read().await;
        non_empty(students.clone())
    }

    /// Get every course, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResult`] if there are no courses.
    #[allow(clippy::unused_async)]
    pub async fn get_courses(&self) -> Result<Vec<Course>> {
        non_empty(self.collections()?.courses.clone())
    }

    /// Get the students enrolled in a course, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResult`] if no student matches.
    pub async fn get_students_by_course(
        &self,
        course_id: impl Into<RecordKey>,
    ) -> Result<Vec<Student>> {
        let course_id = course_id.into();
        let students = self.collections()?.students.read().await;
        let matched = students
            .iter()
            .filter(|s| s.is_enrolled_in(&course_id))
            .cloned()
            .collect();
        debug!("Filtering students by course {}", course_id);
        non_empty(matched)
    }

    /// Get the first student whose number matches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResult`] if no student matches.
    pub async fn get_student_by_num(&self, num: impl Into<RecordKey>) -> Result<Student> {
        let num = num.into();
        let students = self.collections()?.students.read().await;
        students
            .iter()
            .find(|s| num.matches_int(i64::from(s.student_num)))
            .cloned()
            .ok_or(Error::EmptyResult)
    }

    /// Get the first course whose id matches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no course matches.
    #[allow(clippy::unused_async)]
    pub async fn get_course_by_id(&self, id: impl Into<RecordKey>) -> Result<Course> {
        let id = id.into();
        self.collections()?
            .courses
            .iter()
            .find(|c| id.matches_int(c.course_id))
            .cloned()
            .ok_or_else(|| Error::not_found("query returned 0 results"))
    }

    /// Add a student numbered `count + 1` and persist the collection.
    ///
    /// Returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persist`] if the student document cannot be written;
    /// the in-memory collection is left unchanged in that case.
    pub async fn add_student(&self, fields: StudentFields) -> Result<Student> {
        let collections = self.collections()?;
        let _turn = self.writer.lock().await;

        let mut next = collections.students.read().await.clone();
        let student_num = u32::try_from(next.len() + 1)
            .map_err(|_| Error::internal("student collection is full"))?;
        let student = fields.into_student(student_num);
        next.push(student.clone());

        self.commit(collections, next).await?;
        info!("Added student {} ({})", student_num, student.full_name());
        Ok(student)
    }

    /// Merge new fields over an existing student and persist the collection.
    ///
    /// Returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no student has the given number, or
    /// [`Error::Persist`] if the student document cannot be written.
    pub async fn update_student(&self, update: StudentUpdate) -> Result<Student> {
        let collections = self.collections()?;
        let _turn = self.writer.lock().await;

        let mut next = collections.students.read().await.clone();
        let Some(index) = next
            .iter()
            .position(|s| update.student_num.matches_int(i64::from(s.student_num)))
        else {
            warn!("Student not found: {}", update.student_num);
            return Err(Error::not_found("Student not found"));
        };

        update.fields.merge_into(&mut next[index]);
        let student = next[index].clone();

        self.commit(collections, next).await?;
        info!("Updated student {}", student.student_num);
        Ok(student)
    }

    /// Persist `next`, then make it the live collection.
    async fn commit(&self, collections: &Collections, next: Vec<Student>) -> Result<()> {
        let text = document::render(&next)?;
        if let Err(e) = document::save(&self.students_path, text, self.write_mode).await {
            error!("{e}");
            return Err(e);
        }
        *collections.students.write().await = next;
        Ok(())
    }

    /// Get store statistics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Uninitialized`] before initialization.
    pub async fn stats(&self) -> Result<StoreStats> {
        let collections = self.collections()?;
        Ok(StoreStats {
            total_students: collections.students.read().await.len(),
            total_courses: collections.courses.len(),
            students_path: self.students_path.clone(),
            courses_path: self.courses_path.clone(),
            loaded_at: collections.loaded_at,
        })
    }
}

/// Zero records is a query failure, not an empty success.
fn non_empty<T>(records: Vec<T>) -> Result<Vec<T>> {
    if records.is_empty() {
        Err(Error::EmptyResult)
    } else {
        Ok(records)
    }
}

/// Statistics about the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of students in memory.
    pub total_students: usize,
    /// Number of courses in memory.
    pub total_courses: usize,
    /// Path to the student document.
    pub students_path: PathBuf,
    /// Path to the course document.
    pub courses_path: PathBuf,
    /// When the documents were loaded.
    pub loaded_at: DateTime<Utc>,
}
