use async_trait::async_trait;
use sqlx::PgPool;

use super::manager::DatabaseError;
use super::models::{Actor, ActorFields, Movie, MovieFields};
use super::store::{not_found, Store};

/// Postgres-backed store for both tables; clones share the pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store<Actor> for PgStore {
    async fn list(&self) -> Result<Vec<Actor>, DatabaseError> {
        let actors = sqlx::query_as::<_, Actor>("SELECT id, name, age, gender FROM actors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(actors)
    }

    async fn create(&self, fields: ActorFields) -> Result<Actor, DatabaseError> {
        let actor = sqlx::query_as::<_, Actor>(
            "INSERT INTO actors (name, age, gender) VALUES ($1, $2, $3)
             RETURNING id, name, age, gender",
        )
        .bind(fields.name)
        .bind(fields.age)
        .bind(fields.gender)
        .fetch_one(&self.pool)
        .await?;
        Ok(actor)
    }

    async fn get(&self, id: i64) -> Result<Option<Actor>, DatabaseError> {
        let actor = sqlx::query_as::<_, Actor>("SELECT id, name, age, gender FROM actors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(actor)
    }

    async fn update(&self, actor: &Actor) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE actors SET name = $2, age = $3, gender = $4 WHERE id = $1")
            .bind(actor.id)
            .bind(&actor.name)
            .bind(actor.age)
            .bind(&actor.gender)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found::<Actor>(actor.id));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM actors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found::<Actor>(id));
        }
        Ok(())
    }
}

#[async_trait]
impl Store<Movie> for PgStore {
    async fn list(&self) -> Result<Vec<Movie>, DatabaseError> {
        let movies = sqlx::query_as::<_, Movie>(r#"SELECT id, title, "release" FROM movies ORDER BY id"#)
            .fetch_all(&self.pool)
            .await?;
        Ok(movies)
    }

    async fn create(&self, fields: MovieFields) -> Result<Movie, DatabaseError> {
        let movie = sqlx::query_as::<_, Movie>(
            r#"INSERT INTO movies (title, "release") VALUES ($1, $2)
               RETURNING id, title, "release""#,
        )
        .bind(fields.title)
        .bind(fields.release)
        .fetch_one(&self.pool)
        .await?;
        Ok(movie)
    }

    async fn get(&self, id: i64) -> Result<Option<Movie>, DatabaseError> {
        let movie = sqlx::query_as::<_, Movie>(r#"SELECT id, title, "release" FROM movies WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(movie)
    }

    async fn update(&self, movie: &Movie) -> Result<(), DatabaseError> {
        let result = sqlx::query(r#"UPDATE movies SET title = $2, "release" = $3 WHERE id = $1"#)
            .bind(movie.id)
            .bind(&movie.title)
            .bind(&movie.release)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found::<Movie>(movie.id));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found::<Movie>(id));
        }
        Ok(())
    }
}

// Run against a scratch database: DATABASE_URL=postgres://... cargo test -- --ignored
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database::manager::{connect, ensure_schema};

    async fn store() -> PgStore {
        let config = DatabaseConfig {
            url: std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database"),
            max_connections: 2,
            connection_timeout: 5,
        };
        let pool = connect(&config).await.unwrap();
        ensure_schema(&pool).await.unwrap();
        PgStore::new(pool)
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn actor_rows_round_trip() {
        let store = store().await;
        let created = Store::<Actor>::create(
            &store,
            ActorFields {
                name: Some("Test_actor".to_string()),
                age: Some(30),
                gender: Some("M".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(created.name.as_deref(), Some("Test_actor"));

        let mut fetched = Store::<Actor>::get(&store, created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        fetched.age = Some(31);
        Store::<Actor>::update(&store, &fetched).await.unwrap();
        assert_eq!(Store::<Actor>::get(&store, created.id).await.unwrap(), Some(fetched));

        let listed = Store::<Actor>::list(&store).await.unwrap();
        assert!(listed.windows(2).all(|pair| pair[0].id < pair[1].id));

        Store::<Actor>::delete(&store, created.id).await.unwrap();
        assert_eq!(Store::<Actor>::get(&store, created.id).await.unwrap(), None);
        assert!(matches!(
            Store::<Actor>::delete(&store, created.id).await,
            Err(DatabaseError::NotFound(_))
        ));
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn movie_release_column_round_trips() {
        let store = store().await;
        let created = Store::<Movie>::create(
            &store,
            MovieFields {
                title: Some("Dune".to_string()),
                release: Some("2021-10-22".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(created.release.as_deref(), Some("2021-10-22"));

        let mut movie = created.clone();
        movie.release = Some("2021-10-21".to_string());
        Store::<Movie>::update(&store, &movie).await.unwrap();
        assert_eq!(Store::<Movie>::get(&store, movie.id).await.unwrap(), Some(movie.clone()));

        Store::<Movie>::delete(&store, movie.id).await.unwrap();
        assert!(matches!(
            Store::<Movie>::update(&store, &movie).await,
            Err(DatabaseError::NotFound(_))
        ));
    }
}
