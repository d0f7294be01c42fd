use axum::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::macros::format_description;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Denormalized username of the creator; ownership checks compare this
    /// against the session's username.
    pub author: String,
    /// Web path under `/uploads/`, or the empty string when no image was
    /// attached.
    pub image_path: String,
    /// `dd/mm/yyyy`, fixed at creation.
    pub date: String,
}

/// Fields a caller supplies when creating or replacing a post. The id and
/// the creation date stay repository-owned.
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub author: String,
    pub image_path: String,
}

pub fn creation_date() -> String {
    let format = format_description!("[day]/[month]/[year]");
    OffsetDateTime::now_utc()
        .format(&format)
        .expect("date format is static")
}

#[async_trait]
pub trait BlogRepo: Send + Sync {
    async fn count(&self) -> anyhow::Result<i64>;

    /// Window over the collection in insertion order.
    async fn list_page(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Blog>>;

    async fn create(&self, new: NewBlog) -> anyhow::Result<Blog>;

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Blog>>;

    /// Full-field replacement; the creation date is preserved. Returns
    /// whether a document matched.
    async fn replace(&self, id: Uuid, new: NewBlog) -> anyhow::Result<bool>;

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

pub struct PgBlogRepo {
    db: PgPool,
}

impl PgBlogRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BlogRepo for PgBlogRepo {
    async fn count(&self) -> anyhow::Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blogs")
            .fetch_one(&self.db)
            .await?;
        Ok(total)
    }

    async fn list_page(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Blog>> {
        let rows = sqlx::query_as::<_, Blog>(
            r#"
            SELECT id, title, content, author, image_path, date
            FROM blogs
            ORDER BY seq ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create(&self, new: NewBlog) -> anyhow::Result<Blog> {
        let blog = sqlx::query_as::<_, Blog>(
            r#"
            INSERT INTO blogs (id, title, content, author, image_path, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, content, author, image_path, date
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.content)
        .bind(&new.author)
        .bind(&new.image_path)
        .bind(creation_date())
        .fetch_one(&self.db)
        .await?;
        Ok(blog)
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Blog>> {
        let blog = sqlx::query_as::<_, Blog>(
            r#"
            SELECT id, title, content, author, image_path, date
            FROM blogs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(blog)
    }

    async fn replace(&self, id: Uuid, new: NewBlog) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE blogs
            SET title = $2, content = $3, author = $4, image_path = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&new.title)
        .bind(&new.content)
        .bind(&new.author)
        .bind(&new.image_path)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// In-memory blog store for tests; the Vec preserves insertion order.
#[derive(Default)]
pub struct MemoryBlogRepo {
    inner: RwLock<Vec<Blog>>,
}

#[async_trait]
impl BlogRepo for MemoryBlogRepo {
    async fn count(&self) -> anyhow::Result<i64> {
        Ok(self.inner.read().await.len() as i64)
    }

    async fn list_page(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Blog>> {
        let blogs = self.inner.read().await;
        Ok(blogs
            .iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, new: NewBlog) -> anyhow::Result<Blog> {
        let blog = Blog {
            id: Uuid::new_v4(),
            title: new.title,
            content: new.content,
            author: new.author,
            image_path: new.image_path,
            date: creation_date(),
        };
        self.inner.write().await.push(blog.clone());
        Ok(blog)
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Blog>> {
        let blogs = self.inner.read().await;
        Ok(blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn replace(&self, id: Uuid, new: NewBlog) -> anyhow::Result<bool> {
        let mut blogs = self.inner.write().await;
        match blogs.iter_mut().find(|b| b.id == id) {
            Some(blog) => {
                blog.title = new.title;
                blog.content = new.content;
                blog.author = new.author;
                blog.image_path = new.image_path;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut blogs = self.inner.write().await;
        let before = blogs.len();
        blogs.retain(|b| b.id != id);
        Ok(blogs.len() < before)
    }
}
