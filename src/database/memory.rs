use async_trait::async_trait;
use mongodb::bson::DateTime as BsonDateTime;
use std::sync::Mutex;

use super::Store;
use crate::models::{Movie, ProfileChanges, SavedMovie, User};
use crate::utils::AppError;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    movies: Vec<Movie>,
    saved: Vec<SavedMovie>,
}

/// `Store` over plain vectors, for tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn with_movies(movies: Vec<Movie>) -> Self {
        let store = Self::default();
        store.tables.lock().unwrap().movies = movies;
        store
    }

    pub fn movie_count(&self) -> usize {
        self.tables.lock().unwrap().movies.len()
    }

    pub fn saved_count(&self) -> usize {
        self.tables.lock().unwrap().saved.len()
    }

    pub fn user(&self, email: &str) -> Option<User> {
        self.tables.lock().unwrap().users.iter().find(|u| u.email == email).cloned()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.user(email))
    }

    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::AlreadyExists("User already exists".to_string()));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn update_user_password(&self, user_id: &str, password_hash: &str) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        match tables.users.iter_mut().find(|u| u.user_id == user_id) {
            Some(user) => {
                user.password = password_hash.to_string();
                user.updated_at = Some(BsonDateTime::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_user_profile(&self, user_id: &str, changes: &ProfileChanges) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(user) = tables.users.iter_mut().find(|u| u.user_id == user_id) else {
            return Ok(false);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(question) = &changes.recovery_question {
            user.recovery_question = question.clone();
        }
        if let Some(answer) = &changes.recovery_answer {
            user.recovery_answer = answer.clone();
        }
        user.updated_at = Some(BsonDateTime::now());
        Ok(true)
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.users.len();
        tables.users.retain(|u| u.user_id != user_id);
        if tables.users.len() == before {
            return Ok(false);
        }
        tables.saved.retain(|row| row.user_id != user_id);
        Ok(true)
    }

    async fn find_movie(&self, imdb_id: &str) -> Result<Option<Movie>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.movies.iter().find(|m| m.imdb_id == imdb_id).cloned())
    }

    async fn search_movies(&self, title: &str) -> Result<Vec<Movie>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.movies.iter().filter(|m| m.title_contains(title)).cloned().collect())
    }

    async fn upsert_movie(&self, movie: &Movie) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        match tables.movies.iter_mut().find(|m| m.imdb_id == movie.imdb_id) {
            Some(existing) => *existing = movie.clone(),
            None => tables.movies.push(movie.clone()),
        }
        Ok(())
    }

    async fn insert_movie_if_absent(&self, movie: &Movie) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.movies.iter().any(|m| m.imdb_id == movie.imdb_id) {
            return Ok(false);
        }
        tables.movies.push(movie.clone());
        Ok(true)
    }

    async fn save_movie(&self, user_id: &str, imdb_id: &str) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.saved.iter().any(|row| row.user_id == user_id && row.imdb_id == imdb_id) {
            return Ok(false);
        }
        tables.saved.push(SavedMovie {
            user_id: user_id.to_string(),
            imdb_id: imdb_id.to_string(),
            saved_at: BsonDateTime::now(),
        });
        Ok(true)
    }

    async fn remove_saved_movie(&self, user_id: &str, imdb_id: &str) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.saved.len();
        tables.saved.retain(|row| !(row.user_id == user_id && row.imdb_id == imdb_id));
        Ok(tables.saved.len() < before)
    }

    async fn saved_movies(&self, user_id: &str, title: Option<&str>) -> Result<Vec<Movie>, AppError> {
        let tables = self.tables.lock().unwrap();
        let title = title.filter(|t| !t.trim().is_empty());
        Ok(tables
            .saved
            .iter()
            .filter(|row| row.user_id == user_id)
            .filter_map(|row| tables.movies.iter().find(|m| m.imdb_id == row.imdb_id))
            .filter(|m| title.map_or(true, |t| m.title_contains(t)))
            .cloned()
            .collect())
    }
}
