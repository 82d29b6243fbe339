use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::{
    db,
    dto::{optional, required, AuthorQuery, NewNewsDto},
    errors::ApiError,
    models::News,
    PGPool,
};

use super::{
    auth::UserAuthData,
    permission::{self, Permissions},
};

pub async fn get_all(pool: &PGPool) -> Result<Vec<News>, ApiError> {
    Ok(db::news::get_all(pool).await?)
}

pub async fn get_by_author(query: AuthorQuery, pool: &PGPool) -> Result<Vec<News>, ApiError> {
    let author_id = query
        .author_id
        .as_deref()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .ok_or_else(|| ApiError::bad_request("invalid author_id"))?;
    Ok(db::news::get_by_author(author_id, pool).await?)
}

pub fn build(dto: NewNewsDto, author_id: Uuid) -> Result<News, ApiError> {
    match (required(&dto.title), required(&dto.content)) {
        (Some(title), Some(content)) => Ok(News {
            id: Uuid::new_v4(),
            title,
            content,
            event_id: dto.event_id,
            image_url: optional(dto.image_url),
            author_id,
            published_at: Utc::now(),
        }),
        _ => Err(ApiError::bad_request("title and content are required")),
    }
}

pub async fn create(dto: NewNewsDto, user_auth_data: &UserAuthData, pool: &PGPool) -> Result<Uuid, ApiError> {
    permission::ensure(user_auth_data, Permissions::PUBLISH_NEWS, "not enough rights to publish news")?;
    let news = build(dto, user_auth_data.user_id)?;
    if let Some(event_id) = news.event_id {
        if db::event::get_by_id(event_id, pool).await?.is_none() {
            return Err(ApiError::not_found("event not found"));
        }
    }
    db::news::create(&news, pool).await?;
    info!("news {} published by {}", news.id, user_auth_data.user_id);
    Ok(news.id)
}

/// Only the author or an admin may delete.
pub async fn delete(id: Uuid, user_auth_data: &UserAuthData, pool: &PGPool) -> Result<(), ApiError> {
    let existing = db::news::get_by_id(id, pool)
        .await?
        .ok_or_else(|| ApiError::not_found("news not found"))?;
    permission::ensure_owner_or(
        user_auth_data,
        existing.author_id,
        Permissions::MANAGE_ANY_NEWS,
        "not enough rights to delete the news",
    )?;
    db::news::delete(id, pool).await?;
    info!("news {} deleted by {}", id, user_auth_data.user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn news_needs_title_and_content() {
        let dto = NewNewsDto {
            title: Some("Launch".to_string()),
            ..Default::default()
        };
        assert!(build(dto, Uuid::new_v4()).is_err());
    }

    #[test]
    fn news_is_attributed_to_the_author() {
        let author = Uuid::new_v4();
        let dto = NewNewsDto {
            title: Some("Launch".to_string()),
            content: Some("We shipped.".to_string()),
            image_url: Some("".to_string()),
            ..Default::default()
        };
        let news = build(dto, author).unwrap();
        assert_eq!(news.author_id, author);
        assert_eq!(news.image_url, None);
    }
}
