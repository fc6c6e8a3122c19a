//! Vec-backed store for router tests, paging the same way the Postgres query does.

use crate::{
    data::{
        StudentStore,
        pagination::PageRequest,
        student::{NewStudent, Student, StudentUpdate},
    },
    error::{MakeQuerySnafu, RollcallResult},
};
use async_trait::async_trait;
use snafu::ResultExt;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    students: RwLock<Vec<Student>>,
}

impl MemoryStudentStore {
    pub fn with_students(students: impl IntoIterator<Item = Student>) -> Self {
        Self {
            students: RwLock::new(students.into_iter().collect()),
        }
    }

    pub async fn len(&self) -> usize {
        self.students.read().await.len()
    }
}

fn matches_search(student: &Student, search: &str) -> bool {
    let search = search.to_lowercase();
    [&student.first_name, &student.last_name, &student.email]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&search))
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn get_page(&self, request: &PageRequest) -> RollcallResult<Vec<Student>> {
        let students = self.students.read().await;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(request.limit()).unwrap_or(0);

        Ok(students
            .iter()
            .filter(|student| request.search().is_none_or(|search| matches_search(student, search)))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: &str) -> RollcallResult<Option<Student>> {
        Ok(self
            .students
            .read()
            .await
            .iter()
            .find(|student| student.id == id)
            .cloned())
    }

    async fn insert(&self, to_be_added: NewStudent) -> RollcallResult<String> {
        let student = to_be_added.into_student();
        let mut students = self.students.write().await;

        if students.iter().any(|existing| existing.id == student.id) {
            return Err(sqlx::Error::Protocol(format!(
                "duplicate key value violates unique constraint: {}",
                student.id
            )))
            .context(MakeQuerySnafu);
        }

        let id = student.id.clone();
        students.push(student);
        Ok(id)
    }

    async fn update(&self, id: &str, update: StudentUpdate) -> RollcallResult<u64> {
        let mut students = self.students.write().await;
        let mut affected = 0;

        for student in students.iter_mut().filter(|student| student.id == id) {
            student.first_name.clone_from(&update.first_name);
            student.last_name.clone_from(&update.last_name);
            student.email.clone_from(&update.email);
            affected += 1;
        }

        Ok(affected)
    }

    async fn remove(&self, id: &str) -> RollcallResult<u64> {
        let mut students = self.students.write().await;
        let before = students.len();
        students.retain(|student| student.id != id);

        Ok((before - students.len()) as u64)
    }

    async fn close(&self) {}
}

/// A store whose every call fails, for exercising the 500 paths.
#[derive(Debug, Default)]
pub struct BrokenStudentStore;

fn broken<T>() -> RollcallResult<T> {
    Err(sqlx::Error::PoolClosed).context(MakeQuerySnafu)
}

#[async_trait]
impl StudentStore for BrokenStudentStore {
    async fn get_page(&self, _request: &PageRequest) -> RollcallResult<Vec<Student>> {
        broken()
    }

    async fn get_by_id(&self, _id: &str) -> RollcallResult<Option<Student>> {
        broken()
    }

    async fn insert(&self, _to_be_added: NewStudent) -> RollcallResult<String> {
        broken()
    }

    async fn update(&self, _id: &str, _update: StudentUpdate) -> RollcallResult<u64> {
        broken()
    }

    async fn remove(&self, _id: &str) -> RollcallResult<u64> {
        broken()
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, first_name: &str) -> Student {
        Student {
            id: id.into(),
            first_name: Some(first_name.into()),
            last_name: None,
            email: None,
        }
    }

    #[tokio::test]
    async fn search_applies_before_paging() {
        let store = MemoryStudentStore::with_students([
            student("a", "Ada"),
            student("b", "Bob"),
            student("c", "adam"),
            student("d", "Adaline"),
        ]);

        let first = store
            .get_page(&PageRequest::from_raw(Some("1"), Some("ADA")))
            .await
            .unwrap();
        let second = store
            .get_page(&PageRequest::from_raw(Some("2"), Some("ADA")))
            .await
            .unwrap();

        let ids = |page: Vec<Student>| page.into_iter().map(|s| s.id).collect::<Vec<_>>();
        assert_eq!(ids(first), ["a", "c"]);
        assert_eq!(ids(second), ["d"]);
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let store = MemoryStudentStore::with_students([student("a", "Ada")]);
        let result = store
            .insert(NewStudent {
                id: Some("a".into()),
                ..NewStudent::default()
            })
            .await;

        assert!(result.is_err());
        assert_eq!(store.len().await, 1);
    }
}
