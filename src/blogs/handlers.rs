use askama::Template;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    routing::get,
    Router,
};
use tower_sessions::Session;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::session::CurrentUser,
    blogs::{
        dto::PageQuery,
        repo::{Blog, NewBlog},
        services::{read_submission, require_owner},
    },
    error::{AppError, Reply},
    pagination::PageWindow,
    state::AppState,
    uploads::save_image,
};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    blogs: Vec<Blog>,
    logged_in: bool,
    limit: i64,
    pages: Vec<i64>,
}

#[derive(Template)]
#[template(path = "blog.html")]
struct BlogTemplate {
    blog: Blog,
    logged_in: bool,
    is_owner: bool,
}

#[derive(Template)]
#[template(path = "create.html")]
struct CreateTemplate;

#[derive(Template)]
#[template(path = "edit.html")]
struct EditTemplate {
    blog: Blog,
}

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/blog/:id", get(show_blog))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/create-blog", get(create_page).post(create_blog))
        .route("/edit/:id", get(edit_page).post(edit_blog))
        .route("/blog/delete/:id", get(delete_blog))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB
}

fn not_found() -> AppError {
    AppError::NotFound("blog post not found".into())
}

#[instrument(skip(state, session))]
async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PageQuery>,
) -> Result<Reply, AppError> {
    let viewer = CurrentUser::from_session(&session).await?;

    let total = state.blogs.count().await?;
    let window = PageWindow::new(total, query.page, query.limit);
    let blogs = state.blogs.list_page(window.limit, window.skip).await?;

    Reply::page(&IndexTemplate {
        blogs,
        logged_in: viewer.is_some(),
        limit: window.limit,
        pages: (1..=window.total_pages).collect(),
    })
}

#[instrument(skip(state, session))]
async fn show_blog(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Reply, AppError> {
    let blog = state.blogs.find(id).await?.ok_or_else(not_found)?;
    let viewer = CurrentUser::from_session(&session).await?;
    let is_owner = viewer
        .as_ref()
        .map(|u| u.username == blog.author)
        .unwrap_or(false);

    Reply::page(&BlogTemplate {
        blog,
        logged_in: viewer.is_some(),
        is_owner,
    })
}

async fn create_page(_user: CurrentUser) -> Result<Reply, AppError> {
    Reply::page(&CreateTemplate)
}

#[instrument(skip(state, multipart))]
async fn create_blog(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Reply, AppError> {
    let submission = read_submission(&mut multipart).await?;

    // No upload means an empty web path, not a missing field.
    let image_path = match &submission.image {
        Some(file) => save_image(&state.config.uploads_dir, &file.filename, &file.data).await?,
        None => String::new(),
    };

    let blog = state
        .blogs
        .create(NewBlog {
            title: submission.title,
            content: submission.content,
            author: user.username.clone(),
            image_path,
        })
        .await?;

    info!(blog_id = %blog.id, author = %blog.author, "blog created");
    Ok(Reply::Redirect(format!("/blog/{}", blog.id)))
}

#[instrument(skip(state))]
async fn edit_page(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Reply, AppError> {
    let blog = state.blogs.find(id).await?.ok_or_else(not_found)?;
    require_owner(&blog.author, &user)?;

    Reply::page(&EditTemplate { blog })
}

#[instrument(skip(state, multipart))]
async fn edit_blog(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Reply, AppError> {
    let existing = state.blogs.find(id).await?.ok_or_else(not_found)?;
    require_owner(&existing.author, &user)?;

    let submission = read_submission(&mut multipart).await?;

    // Only a fresh upload changes the stored path.
    let image_path = match &submission.image {
        Some(file) => save_image(&state.config.uploads_dir, &file.filename, &file.data).await?,
        None => existing.image_path,
    };

    let replaced = state
        .blogs
        .replace(
            id,
            NewBlog {
                title: submission.title,
                content: submission.content,
                author: user.username.clone(),
                image_path,
            },
        )
        .await?;
    if !replaced {
        return Err(not_found());
    }

    info!(blog_id = %id, author = %user.username, "blog replaced");
    Ok(Reply::Redirect(format!("/blog/{id}")))
}

#[instrument(skip(state))]
async fn delete_blog(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Reply, AppError> {
    let blog = state.blogs.find(id).await?.ok_or_else(not_found)?;
    require_owner(&blog.author, &user)?;

    state.blogs.delete(id).await?;
    info!(blog_id = %id, author = %user.username, "blog deleted");
    Ok(Reply::Redirect("/".into()))
}
