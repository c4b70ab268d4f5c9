#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, DateTime as BsonDateTime, Document};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use std::error::Error;

use crate::models::{Movie, ProfileChanges, SavedMovie, User};
use crate::utils::AppError;

const USERS: &str = "users";
const MOVIES: &str = "movies";
const SAVED_MOVIES: &str = "saved_movies";

/// Persistence used by the services. Every write keyed by a unique field is
/// atomic at the storage layer, so concurrent requests cannot duplicate rows.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, AppError>;
    /// Fails with `AlreadyExists` when the email is taken.
    async fn insert_user(&self, user: &User) -> Result<(), AppError>;
    async fn update_user_password(&self, user_id: &str, password_hash: &str) -> Result<bool, AppError>;
    async fn update_user_profile(&self, user_id: &str, changes: &ProfileChanges) -> Result<bool, AppError>;
    /// Removes the user and their saved-movie rows.
    async fn delete_user(&self, user_id: &str) -> Result<bool, AppError>;

    async fn find_movie(&self, imdb_id: &str) -> Result<Option<Movie>, AppError>;
    /// Movies whose title contains `title`, ignoring case.
    async fn search_movies(&self, title: &str) -> Result<Vec<Movie>, AppError>;
    /// Insert, or overwrite the row with the same `imdb_id`.
    async fn upsert_movie(&self, movie: &Movie) -> Result<(), AppError>;
    /// Insert only when no row with the same `imdb_id` exists. Returns whether it inserted.
    async fn insert_movie_if_absent(&self, movie: &Movie) -> Result<bool, AppError>;

    /// Idempotent. Returns whether a new ledger row was created.
    async fn save_movie(&self, user_id: &str, imdb_id: &str) -> Result<bool, AppError>;
    async fn remove_saved_movie(&self, user_id: &str, imdb_id: &str) -> Result<bool, AppError>;
    async fn saved_movies(&self, user_id: &str, title: Option<&str>) -> Result<Vec<Movie>, AppError>;
}

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        // Database name from the URI path, or the default
        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| "favorite_movies".to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;
        log::info!("✅ Connected to MongoDB database: {}", db_name);

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Unique indexes back the invariants on email, imdb_id and the ledger pair.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        let indexes: [(&str, Document); 4] = [
            (USERS, doc! { "email": 1 }),
            (USERS, doc! { "user_id": 1 }),
            (MOVIES, doc! { "imdb_id": 1 }),
            (SAVED_MOVIES, doc! { "user_id": 1, "imdb_id": 1 }),
        ];

        for (collection, keys) in indexes {
            let index = IndexModel::builder()
                .keys(keys.clone())
                .options(IndexOptions::builder().unique(true).build())
                .build();

            self.db
                .collection::<Document>(collection)
                .create_index(index)
                .await?;
            log::info!("   ✅ Index ready: {} {}", collection, keys);
        }

        log::info!("✅ Database indexes ready");
        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    fn users(&self) -> Collection<User> {
        self.collection(USERS)
    }

    fn movies(&self) -> Collection<Movie> {
        self.collection(MOVIES)
    }

    fn saved(&self) -> Collection<SavedMovie> {
        self.collection(SAVED_MOVIES)
    }
}

/// Case-insensitive containment condition for the `title` field.
fn title_condition(title: &str) -> Document {
    doc! { "$regex": escape_regex(title), "$options": "i" }
}

/// Escapes for MongoDB's PCRE `$regex`, where a backslash before any
/// punctuation character is a literal match.
fn escape_regex(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if "\\.+*?()|[]{}^$#&-~".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[async_trait]
impl Store for MongoDB {
    async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users().find_one(doc! { "user_id": user_id }).await?)
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        self.users().insert_one(user).await.map_err(|e| match AppError::from(e) {
            AppError::AlreadyExists(_) => AppError::AlreadyExists("User already exists".to_string()),
            other => other,
        })?;
        Ok(())
    }

    async fn update_user_password(&self, user_id: &str, password_hash: &str) -> Result<bool, AppError> {
        let result = self
            .users()
            .update_one(
                doc! { "user_id": user_id },
                doc! { "$set": { "password": password_hash, "updated_at": BsonDateTime::now() } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn update_user_profile(&self, user_id: &str, changes: &ProfileChanges) -> Result<bool, AppError> {
        let mut set = doc! { "updated_at": BsonDateTime::now() };
        if let Some(name) = &changes.name {
            set.insert("name", name.as_str());
        }
        if let Some(question) = &changes.recovery_question {
            set.insert("recovery_question", question.as_str());
        }
        if let Some(answer) = &changes.recovery_answer {
            set.insert("recovery_answer", answer.as_str());
        }

        let result = self
            .users()
            .update_one(doc! { "user_id": user_id }, doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool, AppError> {
        let deleted = self.users().delete_one(doc! { "user_id": user_id }).await?;
        if deleted.deleted_count == 0 {
            return Ok(false);
        }

        let ledger = self.saved().delete_many(doc! { "user_id": user_id }).await?;
        log::info!("🗑️ Deleted user {} and {} saved movies", user_id, ledger.deleted_count);
        Ok(true)
    }

    async fn find_movie(&self, imdb_id: &str) -> Result<Option<Movie>, AppError> {
        Ok(self.movies().find_one(doc! { "imdb_id": imdb_id }).await?)
    }

    async fn search_movies(&self, title: &str) -> Result<Vec<Movie>, AppError> {
        let cursor = self
            .movies()
            .find(doc! { "title": title_condition(title) })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn upsert_movie(&self, movie: &Movie) -> Result<(), AppError> {
        let fields = mongodb::bson::to_document(movie)?;
        self.movies()
            .update_one(doc! { "imdb_id": &movie.imdb_id }, doc! { "$set": fields })
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn insert_movie_if_absent(&self, movie: &Movie) -> Result<bool, AppError> {
        let fields = mongodb::bson::to_document(movie)?;
        let result = self
            .movies()
            .update_one(doc! { "imdb_id": &movie.imdb_id }, doc! { "$setOnInsert": fields })
            .upsert(true)
            .await?;
        Ok(result.upserted_id.is_some())
    }

    async fn save_movie(&self, user_id: &str, imdb_id: &str) -> Result<bool, AppError> {
        let result = self
            .saved()
            .update_one(
                doc! { "user_id": user_id, "imdb_id": imdb_id },
                doc! { "$setOnInsert": {
                    "user_id": user_id,
                    "imdb_id": imdb_id,
                    "saved_at": BsonDateTime::now(),
                } },
            )
            .upsert(true)
            .await?;
        Ok(result.upserted_id.is_some())
    }

    async fn remove_saved_movie(&self, user_id: &str, imdb_id: &str) -> Result<bool, AppError> {
        let result = self
            .saved()
            .delete_one(doc! { "user_id": user_id, "imdb_id": imdb_id })
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn saved_movies(&self, user_id: &str, title: Option<&str>) -> Result<Vec<Movie>, AppError> {
        let rows: Vec<SavedMovie> = self
            .saved()
            .find(doc! { "user_id": user_id })
            .await?
            .try_collect()
            .await?;

        if rows.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<String> = rows.into_iter().map(|row| row.imdb_id).collect();
        let mut filter = doc! { "imdb_id": { "$in": ids } };
        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            filter.insert("title", title_condition(title));
        }

        let cursor = self.movies().find(filter).await?;
        Ok(cursor.try_collect().await?)
    }
}
