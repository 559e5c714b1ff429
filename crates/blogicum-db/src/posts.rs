use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use blogicum_core::{FeedEntry, FeedQuery, FeedScope, Post, PostDraft, PostId, UserId, Validator};

use crate::rows::{PostRow, POST_COLUMNS, POST_JOINS};
use crate::{current_epoch_ms, to_epoch_ms, DbError};

const COMMENT_COUNT_COLUMN: &str =
    ", (SELECT COUNT(*) FROM comments cm WHERE cm.post_id = p.id) AS comment_count";
const NO_COMMENT_COUNT_COLUMN: &str = ", NULL AS comment_count";

fn validate_draft(draft: &PostDraft) -> Result<(), DbError> {
    Validator::validate_title("title", &draft.title)?;
    Validator::validate_text("text", &draft.text)?;
    Ok(())
}

/// Fetch a single post with its relations, whatever its publication state.
pub async fn get_post(pool: &SqlitePool, id: PostId) -> Result<Post, DbError> {
    let sql = format!("SELECT {POST_COLUMNS}{NO_COMMENT_COUNT_COLUMN} {POST_JOINS} WHERE p.id = ?");
    let row = sqlx::query_as::<_, PostRow>(&sql)
        .bind(id.0)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound("post"))?;
    Ok(row.into_entry()?.post)
}

/// Run a feed query.
///
/// Returns every qualifying post in one round trip, each with author,
/// category and location loaded. Pagination is left to the caller.
pub async fn fetch_feed(pool: &SqlitePool, query: &FeedQuery) -> Result<Vec<FeedEntry>, DbError> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
    qb.push(POST_COLUMNS);
    qb.push(if query.options.include_comment_count {
        COMMENT_COUNT_COLUMN
    } else {
        NO_COMMENT_COUNT_COLUMN
    });
    qb.push(POST_JOINS);
    qb.push(" WHERE 1 = 1");

    match query.scope {
        FeedScope::All => {}
        FeedScope::Category(id) => {
            qb.push(" AND p.category_id = ").push_bind(id.0);
        }
        FeedScope::Author(id) => {
            qb.push(" AND p.author_id = ").push_bind(id.0);
        }
    }

    // Mirrors blogicum_core::is_generally_visible.
    if query.options.apply_visibility_filter {
        qb.push(" AND p.is_published = 1 AND p.pub_date <= ")
            .push_bind(to_epoch_ms(query.now))
            .push(" AND (p.category_id IS NULL OR c.is_published = 1)");
    }

    if query.options.order_by_pub_date_desc {
        qb.push(" ORDER BY p.pub_date DESC, p.id ASC");
    } else {
        qb.push(" ORDER BY p.id ASC");
    }

    let rows = qb.build_query_as::<PostRow>().fetch_all(pool).await?;
    rows.into_iter().map(PostRow::into_entry).collect()
}

pub async fn create_post(
    pool: &SqlitePool,
    author: UserId,
    draft: &PostDraft,
) -> Result<PostId, DbError> {
    validate_draft(draft)?;

    let done = sqlx::query(
        r#"
        INSERT INTO posts
            (title, text, pub_date, is_published, created_at, image, author_id, category_id, location_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&draft.title)
    .bind(&draft.text)
    .bind(to_epoch_ms(draft.pub_date))
    .bind(draft.is_published)
    .bind(current_epoch_ms())
    .bind(draft.image.as_deref())
    .bind(author.0)
    .bind(draft.category_id.map(|c| c.0))
    .bind(draft.location_id.map(|l| l.0))
    .execute(pool)
    .await?;

    let id = PostId(done.last_insert_rowid());
    tracing::info!("Created {} by {}", id, author);
    Ok(id)
}

/// Replace the editable fields of a post. Author and creation time stay.
pub async fn update_post(pool: &SqlitePool, id: PostId, draft: &PostDraft) -> Result<(), DbError> {
    validate_draft(draft)?;

    let done = sqlx::query(
        r#"
        UPDATE posts
        SET title = ?, text = ?, pub_date = ?, is_published = ?, image = ?,
            category_id = ?, location_id = ?
        WHERE id = ?
        "#,
    )
    .bind(&draft.title)
    .bind(&draft.text)
    .bind(to_epoch_ms(draft.pub_date))
    .bind(draft.is_published)
    .bind(draft.image.as_deref())
    .bind(draft.category_id.map(|c| c.0))
    .bind(draft.location_id.map(|l| l.0))
    .bind(id.0)
    .execute(pool)
    .await?;

    if done.rows_affected() == 0 {
        return Err(DbError::NotFound("post"));
    }
    tracing::info!("Updated {}", id);
    Ok(())
}

/// Delete a post and, by cascade, its comments.
pub async fn delete_post(pool: &SqlitePool, id: PostId) -> Result<(), DbError> {
    let done = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id.0)
        .execute(pool)
        .await?;
    if done.rows_affected() == 0 {
        return Err(DbError::NotFound("post"));
    }
    tracing::info!("Deleted {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};

    use blogicum_core::{is_generally_visible, Category, CategoryId, User};

    use super::*;
    use crate::comments::create_comment;
    use crate::taxonomy::{delete_category, delete_location, set_category_published};
    use crate::testing::{self, setup_test_db};

    fn draft(title: &str, pub_date: DateTime<Utc>, category: Option<&Category>) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            text: "Some text".to_string(),
            pub_date,
            is_published: true,
            image: None,
            category_id: category.map(|c| c.id),
            location_id: None,
        }
    }

    fn titles(entries: &[FeedEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.post.title.as_str()).collect()
    }

    async fn post(pool: &SqlitePool, author: &User, draft: PostDraft) -> PostId {
        create_post(pool, author.id, &draft).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_post() {
        let pool = setup_test_db().await;
        let author = testing::user(&pool, "anna").await;
        let category = testing::category(&pool, "travel", true).await;
        let location = testing::location(&pool, "Kazan").await;

        let now = Utc::now();
        let mut d = draft("Trip", now, Some(&category));
        d.location_id = Some(location.id);
        d.image = Some("posts_images/trip.jpg".to_string());
        let id = post(&pool, &author, d).await;

        let post = get_post(&pool, id).await.unwrap();
        assert_eq!(post.title, "Trip");
        assert_eq!(post.author, author);
        assert_eq!(post.category, Some(category));
        assert_eq!(post.location, Some(location));
        assert_eq!(post.image.as_deref(), Some("posts_images/trip.jpg"));
        assert_eq!(post.pub_date.timestamp_millis(), now.timestamp_millis());
    }

    #[tokio::test]
    async fn test_get_missing_post() {
        let pool = setup_test_db().await;
        assert!(matches!(
            get_post(&pool, PostId(1)).await,
            Err(DbError::NotFound("post"))
        ));
    }

    #[tokio::test]
    async fn test_default_feed_filters_hidden_posts() {
        let pool = setup_test_db().await;
        let author = testing::user(&pool, "anna").await;
        let open = testing::category(&pool, "open", true).await;
        let closed = testing::category(&pool, "closed", false).await;
        let now = Utc::now();
        let yesterday = now - Duration::days(1);

        post(&pool, &author, draft("visible", yesterday, Some(&open))).await;
        post(&pool, &author, draft("no category", yesterday, None)).await;
        post(&pool, &author, draft("future", now + Duration::days(1), Some(&open))).await;
        post(&pool, &author, draft("hidden category", yesterday, Some(&closed))).await;
        let mut unpublished = draft("unpublished", yesterday, Some(&open));
        unpublished.is_published = false;
        post(&pool, &author, unpublished).await;

        let feed = fetch_feed(&pool, &FeedQuery::all(now)).await.unwrap();
        let mut got = titles(&feed);
        got.sort();
        assert_eq!(got, vec!["no category", "visible"]);
        assert!(feed.iter().all(|e| is_generally_visible(&e.post, now)));

        let everything = fetch_feed(&pool, &FeedQuery::all(now).with_visibility_filter(false))
            .await
            .unwrap();
        assert_eq!(everything.len(), 5);
    }

    #[tokio::test]
    async fn test_feed_order_is_pub_date_desc_and_stable() {
        let pool = setup_test_db().await;
        let author = testing::user(&pool, "anna").await;
        let now = Utc::now();
        let day = Duration::days(1);

        post(&pool, &author, draft("oldest", now - day * 3, None)).await;
        post(&pool, &author, draft("tie first", now - day, None)).await;
        post(&pool, &author, draft("newest", now - Duration::hours(1), None)).await;
        post(&pool, &author, draft("tie second", now - day, None)).await;

        let feed = fetch_feed(&pool, &FeedQuery::all(now)).await.unwrap();
        assert_eq!(
            titles(&feed),
            vec!["newest", "tie first", "tie second", "oldest"]
        );
        assert!(feed
            .windows(2)
            .all(|w| w[0].post.pub_date >= w[1].post.pub_date));

        let unordered = fetch_feed(&pool, &FeedQuery::all(now).ordered_by_pub_date(false))
            .await
            .unwrap();
        assert_eq!(
            titles(&unordered),
            vec!["oldest", "tie first", "newest", "tie second"]
        );
    }

    #[tokio::test]
    async fn test_feed_comment_counts() {
        let pool = setup_test_db().await;
        let author = testing::user(&pool, "anna").await;
        let reader = testing::user(&pool, "boris").await;
        let now = Utc::now();

        let busy = post(&pool, &author, draft("busy", now - Duration::hours(2), None)).await;
        post(&pool, &author, draft("quiet", now - Duration::hours(1), None)).await;
        for _ in 0..3 {
            create_comment(&pool, busy, reader.id, "Nice").await.unwrap();
        }
        let hidden = create_comment(&pool, busy, author.id, "Thanks").await.unwrap();
        sqlx::query("UPDATE comments SET is_published = 0 WHERE id = ?")
            .bind(hidden.0)
            .execute(&pool)
            .await
            .unwrap();

        let feed = fetch_feed(&pool, &FeedQuery::all(now)).await.unwrap();
        let counts: Vec<(&str, Option<i64>)> = feed
            .iter()
            .map(|e| (e.post.title.as_str(), e.comment_count))
            .collect();
        // Unpublished comments are counted too.
        assert_eq!(counts, vec![("quiet", Some(0)), ("busy", Some(4))]);

        let bare = fetch_feed(&pool, &FeedQuery::all(now).with_comment_count(false))
            .await
            .unwrap();
        assert!(bare.iter().all(|e| e.comment_count.is_none()));
    }

    #[tokio::test]
    async fn test_feed_scopes() {
        let pool = setup_test_db().await;
        let anna = testing::user(&pool, "anna").await;
        let boris = testing::user(&pool, "boris").await;
        let travel = testing::category(&pool, "travel", true).await;
        let food = testing::category(&pool, "food", true).await;
        let now = Utc::now();
        let yesterday = now - Duration::days(1);

        post(&pool, &anna, draft("anna travel", yesterday, Some(&travel))).await;
        post(&pool, &anna, draft("anna food", yesterday, Some(&food))).await;
        post(&pool, &boris, draft("boris travel", yesterday, Some(&travel))).await;
        let mut draft_post = draft("anna draft", yesterday, Some(&travel));
        draft_post.is_published = false;
        post(&pool, &anna, draft_post).await;

        let in_travel = fetch_feed(
            &pool,
            &FeedQuery::new(FeedScope::Category(travel.id), now),
        )
        .await
        .unwrap();
        assert_eq!(titles(&in_travel), vec!["anna travel", "boris travel"]);

        let public_profile = fetch_feed(&pool, &FeedQuery::profile(anna.id, false, now))
            .await
            .unwrap();
        assert_eq!(titles(&public_profile), vec!["anna travel", "anna food"]);

        let own_profile = fetch_feed(&pool, &FeedQuery::profile(anna.id, true, now))
            .await
            .unwrap();
        assert_eq!(
            titles(&own_profile),
            vec!["anna travel", "anna food", "anna draft"]
        );

        let empty = fetch_feed(
            &pool,
            &FeedQuery::new(FeedScope::Category(CategoryId(99)), now),
        )
        .await
        .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_unpublishing_category_removes_post_from_feeds() {
        let pool = setup_test_db().await;
        let author = testing::user(&pool, "anna").await;
        let category = testing::category(&pool, "travel", true).await;
        let now = Utc::now();
        let id = post(&pool, &author, draft("C", now - Duration::days(1), Some(&category))).await;

        let queries = [
            FeedQuery::all(now),
            FeedQuery::new(FeedScope::Category(category.id), now),
            FeedQuery::profile(author.id, false, now),
        ];
        for query in &queries {
            assert_eq!(fetch_feed(&pool, query).await.unwrap().len(), 1);
        }

        set_category_published(&pool, category.id, false)
            .await
            .unwrap();
        for query in &queries {
            assert!(fetch_feed(&pool, query).await.unwrap().is_empty());
        }
        assert!(get_post(&pool, id).await.unwrap().is_published);
    }

    #[tokio::test]
    async fn test_deleting_relations_nullifies_post_fields() {
        let pool = setup_test_db().await;
        let author = testing::user(&pool, "anna").await;
        let category = testing::category(&pool, "travel", true).await;
        let location = testing::location(&pool, "Kazan").await;
        let mut d = draft("Trip", Utc::now() - Duration::days(1), Some(&category));
        d.location_id = Some(location.id);
        let id = post(&pool, &author, d).await;

        delete_category(&pool, category.id).await.unwrap();
        delete_location(&pool, location.id).await.unwrap();

        let post = get_post(&pool, id).await.unwrap();
        assert_eq!(post.category, None);
        assert_eq!(post.location, None);

        let feed = fetch_feed(&pool, &FeedQuery::all(Utc::now())).await.unwrap();
        assert_eq!(titles(&feed), vec!["Trip"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_post() {
        let pool = setup_test_db().await;
        let author = testing::user(&pool, "anna").await;
        let reader = testing::user(&pool, "boris").await;
        let now = Utc::now();
        let id = post(&pool, &author, draft("Before", now, None)).await;
        create_comment(&pool, id, reader.id, "Hi").await.unwrap();

        let mut changed = draft("After", now + Duration::days(1), None);
        changed.is_published = false;
        update_post(&pool, id, &changed).await.unwrap();

        let post = get_post(&pool, id).await.unwrap();
        assert_eq!(post.title, "After");
        assert!(!post.is_published);
        assert_eq!(post.author.id, author.id);

        delete_post(&pool, id).await.unwrap();
        assert!(matches!(
            get_post(&pool, id).await,
            Err(DbError::NotFound("post"))
        ));
        let comments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(comments, 0);

        assert!(matches!(
            update_post(&pool, id, &changed).await,
            Err(DbError::NotFound("post"))
        ));
        assert!(matches!(
            delete_post(&pool, id).await,
            Err(DbError::NotFound("post"))
        ));
    }

    #[tokio::test]
    async fn test_invalid_draft_rejected() {
        let pool = setup_test_db().await;
        let author = testing::user(&pool, "anna").await;

        let blank = draft("  ", Utc::now(), None);
        assert!(matches!(
            create_post(&pool, author.id, &blank).await,
            Err(DbError::Validation(_))
        ));
    }
}
