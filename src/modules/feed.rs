use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::modules::models::car::Car;
use crate::modules::models::car_comment::CarComment;
use crate::modules::models::follow::{CarFollow, UserFollow};
use crate::modules::models::photo::{Photo, PhotoRating};
use crate::modules::models::post::Post;
use crate::modules::models::rating::Rating;
use crate::modules::models::user::User;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 50;

/// newest rows scanned per source before merging. covers the largest page plus
/// cursor skips; paginating past the window ends the feed early.
pub const SOURCE_WINDOW: i64 = 100;

/**************************************************************************************************/
/**************** FEED ITEMS **********************************************************************/
/**************************************************************************************************/

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    Post,
    Car,
    Rating,
    CarComment,
    Photo,
}

/// which sources a feed request wants merged in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedType {
    All,
    Posts,
    Cars,
    Activity,
}

impl FeedType {
    pub fn from_param(param: Option<&str>) -> FeedType {
        match param {
            Some("posts") => FeedType::Posts,
            Some("cars") => FeedType::Cars,
            Some("activity") => FeedType::Activity,
            _ => FeedType::All,
        }
    }

    pub fn includes(&self, kind: FeedKind) -> bool {
        match self {
            FeedType::All => true,
            FeedType::Posts => kind == FeedKind::Post,
            FeedType::Cars => kind == FeedKind::Car,
            FeedType::Activity => matches!(
                kind,
                FeedKind::Rating | FeedKind::CarComment | FeedKind::Photo
            ),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: i32,
    pub username: String,
    pub display_name: String,
}

impl UserRef {
    fn from_user(user: &User) -> UserRef {
        UserRef {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarRef {
    pub id: i32,
    pub name: String,
}

impl CarRef {
    fn from_car(car: &Car) -> CarRef {
        CarRef {
            id: car.id,
            name: car.name.clone(),
        }
    }
}

/// per-kind payload. strongly typed per activity kind, and denormalized far
/// enough that the caller renders without further lookups.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum FeedData {
    Post {
        author: UserRef,
        content: String,
        like_count: i32,
    },
    Car {
        owner: UserRef,
        car: CarRef,
    },
    Rating {
        author: UserRef,
        car: CarRef,
        score: i32,
    },
    CarComment {
        author: UserRef,
        car: CarRef,
        content: String,
    },
    Photo {
        author: UserRef,
        car: Option<CarRef>,
        caption: Option<String>,
        avg_rating: Option<i32>,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FeedKind,
    pub created_at: NaiveDateTime,
    pub activity_text: String,
    pub data: FeedData,
}

impl FeedItem {
    pub fn from_post(post: &Post, author: &User) -> FeedItem {
        FeedItem {
            id: format!("post-{}", post.id),
            kind: FeedKind::Post,
            created_at: post.created_at,
            activity_text: "shared a post".to_string(),
            data: FeedData::Post {
                author: UserRef::from_user(author),
                content: post.content.clone(),
                like_count: post.like_count,
            },
        }
    }

    pub fn from_car(car: &Car, owner: &User) -> FeedItem {
        FeedItem {
            id: format!("car-{}", car.id),
            kind: FeedKind::Car,
            created_at: car.created_at,
            activity_text: format!("added {} to their garage", car.name),
            data: FeedData::Car {
                owner: UserRef::from_user(owner),
                car: CarRef::from_car(car),
            },
        }
    }

    pub fn from_rating(rating: &Rating, author: &User, car: &Car) -> FeedItem {
        FeedItem {
            id: format!("rating-{}", rating.id),
            kind: FeedKind::Rating,
            created_at: rating.created_at,
            activity_text: format!("rated {} {}/10", car.name, rating.score),
            data: FeedData::Rating {
                author: UserRef::from_user(author),
                car: CarRef::from_car(car),
                score: rating.score,
            },
        }
    }

    pub fn from_comment(comment: &CarComment, author: &User, car: &Car) -> FeedItem {
        FeedItem {
            id: format!("car_comment-{}", comment.id),
            kind: FeedKind::CarComment,
            created_at: comment.created_at,
            activity_text: format!("commented on {}", car.name),
            data: FeedData::CarComment {
                author: UserRef::from_user(author),
                car: CarRef::from_car(car),
                content: comment.content.clone(),
            },
        }
    }

    pub fn from_photo(
        photo: &Photo,
        author: &User,
        car: Option<&Car>,
        avg_rating: Option<i32>,
    ) -> FeedItem {
        let activity_text = match car {
            Some(car) => format!("added a photo of {}", car.name),
            None => "added a photo".to_string(),
        };

        FeedItem {
            id: format!("photo-{}", photo.id),
            kind: FeedKind::Photo,
            created_at: photo.created_at,
            activity_text,
            data: FeedData::Photo {
                author: UserRef::from_user(author),
                car: car.map(CarRef::from_car),
                caption: photo.caption.clone(),
                avg_rating,
            },
        }
    }

    fn author(&self) -> &UserRef {
        match &self.data {
            FeedData::Post { author, .. } => author,
            FeedData::Car { owner, .. } => owner,
            FeedData::Rating { author, .. } => author,
            FeedData::CarComment { author, .. } => author,
            FeedData::Photo { author, .. } => author,
        }
    }

    fn car_name(&self) -> Option<&str> {
        match &self.data {
            FeedData::Post { .. } => None,
            FeedData::Car { car, .. } => Some(&car.name),
            FeedData::Rating { car, .. } => Some(&car.name),
            FeedData::CarComment { car, .. } => Some(&car.name),
            FeedData::Photo { car, .. } => car.as_ref().map(|c| c.name.as_str()),
        }
    }

    fn text_content(&self) -> Option<&str> {
        match &self.data {
            FeedData::Post { content, .. } => Some(content),
            FeedData::CarComment { content, .. } => Some(content),
            FeedData::Photo { caption, .. } => caption.as_deref(),
            FeedData::Car { .. } | FeedData::Rating { .. } => None,
        }
    }

    /// case insensitive match against the activity text, author, car name and
    /// the item's own text (post body, comment body, photo caption).
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        if self.activity_text.to_lowercase().contains(&needle) {
            return true;
        }

        let author = self.author();
        if author.username.to_lowercase().contains(&needle)
            || author.display_name.to_lowercase().contains(&needle)
        {
            return true;
        }

        if let Some(content) = self.text_content() {
            if content.to_lowercase().contains(&needle) {
                return true;
            }
        }

        match self.car_name() {
            Some(name) => name.to_lowercase().contains(&needle),
            None => false,
        }
    }
}

/**************************************************************************************************/
/**************** MERGING *************************************************************************/
/**************************************************************************************************/

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub items: Vec<FeedItem>,
    pub next_cursor: Option<String>,
}

/// # merge heterogeneous items into one page
/// sorts by created_at descending (ties by id descending so pagination is
/// deterministic), skips past the cursor item when given, truncates to limit.
/// next_cursor is the last returned id when more items remain.
///
/// a cursor that no longer appears in the window (the item aged out or was
/// filtered away) ends the feed instead of replaying page one.
pub fn merge(mut items: Vec<FeedItem>, cursor: Option<&str>, limit: i64) -> FeedPage {
    items.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });

    if let Some(cursor) = cursor {
        match items.iter().position(|item| item.id == cursor) {
            Some(position) => {
                items.drain(..=position);
            }
            None => {
                return FeedPage {
                    items: Vec::new(),
                    next_cursor: None,
                };
            }
        }
    }

    let has_more = items.len() as i64 > limit;
    items.truncate(limit as usize);

    let next_cursor = if has_more {
        items.last().map(|item| item.id.clone())
    } else {
        None
    };

    FeedPage { items, next_cursor }
}

pub fn clamp_limit(raw: Option<i64>) -> i64 {
    raw.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/**************************************************************************************************/
/**************** AGGREGATION *********************************************************************/
/**************************************************************************************************/

pub struct FeedQuery {
    pub feed_type: FeedType,
    pub search: Option<String>,
    pub cursor: Option<String>,
    pub limit: i64,
}

enum FeedScope {
    Global,
    Following {
        user_ids: Vec<i32>,
        car_ids: Vec<i32>,
    },
}

/// # the global feed
/// every public source merged, newest first. any failing source query fails
/// the whole request, there is no partial feed.
pub fn global_feed(conn: &mut PgConnection, query: &FeedQuery) -> QueryResult<FeedPage> {
    let mut items = collect_items(conn, &FeedScope::Global, query.feed_type)?;

    if let Some(search) = &query.search {
        if !search.trim().is_empty() {
            items.retain(|item| item.matches_search(search.trim()));
        }
    }

    Ok(merge(items, query.cursor.as_deref(), query.limit))
}

/// # the following-only feed
/// restricted to the viewer's followed users and cars. a viewer following
/// nobody gets an empty page without touching the source tables.
pub fn following_feed(conn: &mut PgConnection, viewer_id: i32, limit: i64) -> QueryResult<FeedPage> {
    let user_ids = UserFollow::followed_user_ids(conn, viewer_id)?;
    let car_ids = CarFollow::followed_car_ids(conn, viewer_id)?;

    if user_ids.is_empty() && car_ids.is_empty() {
        return Ok(FeedPage {
            items: Vec::new(),
            next_cursor: None,
        });
    }

    let items = collect_items(conn, &FeedScope::Following { user_ids, car_ids }, FeedType::All)?;
    Ok(merge(items, None, limit))
}

/// query every contributing source independently and synthesize feed items
/// with their denormalized payloads.
fn collect_items(
    conn: &mut PgConnection,
    scope: &FeedScope,
    feed_type: FeedType,
) -> QueryResult<Vec<FeedItem>> {
    let posts = if feed_type.includes(FeedKind::Post) {
        match scope {
            FeedScope::Global => Post::recent_public(conn, SOURCE_WINDOW)?,
            FeedScope::Following { user_ids, .. } => {
                Post::recent_by_authors(conn, user_ids, SOURCE_WINDOW)?
            }
        }
    } else {
        Vec::new()
    };

    let cars = if feed_type.includes(FeedKind::Car) {
        match scope {
            FeedScope::Global => Car::recent_public(conn, SOURCE_WINDOW)?,
            FeedScope::Following { user_ids, car_ids } => {
                Car::recent_from_circle(conn, user_ids, car_ids, SOURCE_WINDOW)?
            }
        }
    } else {
        Vec::new()
    };

    let ratings = if feed_type.includes(FeedKind::Rating) {
        match scope {
            FeedScope::Global => Rating::recent(conn, SOURCE_WINDOW)?,
            FeedScope::Following { user_ids, car_ids } => {
                Rating::recent_from_circle(conn, user_ids, car_ids, SOURCE_WINDOW)?
            }
        }
    } else {
        Vec::new()
    };

    let comments = if feed_type.includes(FeedKind::CarComment) {
        match scope {
            FeedScope::Global => CarComment::recent(conn, SOURCE_WINDOW)?,
            FeedScope::Following { user_ids, car_ids } => {
                CarComment::recent_from_circle(conn, user_ids, car_ids, SOURCE_WINDOW)?
            }
        }
    } else {
        Vec::new()
    };

    let photos = if feed_type.includes(FeedKind::Photo) {
        match scope {
            FeedScope::Global => Photo::recent_public(conn, SOURCE_WINDOW)?,
            FeedScope::Following { user_ids, car_ids } => {
                Photo::recent_from_circle(conn, user_ids, car_ids, SOURCE_WINDOW)?
            }
        }
    } else {
        Vec::new()
    };

    // batch resolve the authors and cars the items reference
    let mut author_ids: Vec<i32> = Vec::new();
    author_ids.extend(posts.iter().map(|p| p.author_id));
    author_ids.extend(cars.iter().map(|c| c.owner_id));
    author_ids.extend(ratings.iter().map(|r| r.user_id));
    author_ids.extend(comments.iter().map(|c| c.user_id));
    author_ids.extend(photos.iter().map(|p| p.user_id));
    author_ids.sort_unstable();
    author_ids.dedup();

    let mut referenced_car_ids: Vec<i32> = Vec::new();
    referenced_car_ids.extend(ratings.iter().map(|r| r.car_id));
    referenced_car_ids.extend(comments.iter().map(|c| c.car_id));
    referenced_car_ids.extend(photos.iter().filter_map(|p| p.car_id));
    referenced_car_ids.sort_unstable();
    referenced_car_ids.dedup();

    let users_by_id = User::as_map(User::from_ids(conn, &author_ids)?);
    let cars_by_id = Car::as_map(Car::from_ids(conn, &referenced_car_ids)?);

    let photo_ids: Vec<i32> = photos.iter().map(|p| p.id).collect();
    let photo_averages = PhotoRating::average_per_photo(&PhotoRating::for_photos(conn, &photo_ids)?);

    let mut items: Vec<FeedItem> = Vec::new();

    for post in &posts {
        if let Some(author) = users_by_id.get(&post.author_id) {
            items.push(FeedItem::from_post(post, author));
        }
    }

    for car in &cars {
        if let Some(owner) = users_by_id.get(&car.owner_id) {
            items.push(FeedItem::from_car(car, owner));
        }
    }

    for rating in &ratings {
        if let (Some(author), Some(car)) = (
            users_by_id.get(&rating.user_id),
            cars_by_id.get(&rating.car_id),
        ) {
            items.push(FeedItem::from_rating(rating, author, car));
        }
    }

    for comment in &comments {
        if let (Some(author), Some(car)) = (
            users_by_id.get(&comment.user_id),
            cars_by_id.get(&comment.car_id),
        ) {
            items.push(FeedItem::from_comment(comment, author, car));
        }
    }

    for photo in &photos {
        if let Some(author) = users_by_id.get(&photo.user_id) {
            let car = photo.car_id.and_then(|car_id| cars_by_id.get(&car_id));
            items.push(FeedItem::from_photo(
                photo,
                author,
                car,
                photo_averages.get(&photo.id).copied(),
            ));
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(seconds: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            + chrono::Duration::seconds(seconds)
    }

    fn user(id: i32, name: &str) -> User {
        User {
            id,
            username: name.to_lowercase(),
            display_name: name.to_string(),
            created_at: at(0),
        }
    }

    fn car(id: i32, owner: &User, name: &str, seconds: i64) -> Car {
        Car {
            id,
            owner_id: owner.id,
            name: name.to_string(),
            is_public: true,
            created_at: at(seconds),
        }
    }

    fn post(id: i32, author: &User, seconds: i64) -> Post {
        Post {
            id,
            author_id: author.id,
            content: "first drive of the season".to_string(),
            like_count: 3,
            is_public: true,
            created_at: at(seconds),
        }
    }

    #[test]
    fn merge_sorts_newest_first_and_truncates() {
        let author = user(1, "Jens");
        let items = vec![
            FeedItem::from_post(&post(1, &author, 10), &author),
            FeedItem::from_car(&car(5, &author, "Supra", 30), &author),
            FeedItem::from_post(&post(2, &author, 20), &author),
        ];

        let page = merge(items, None, 2);

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, "car-5");
        assert_eq!(page.items[1].id, "post-2");
        assert!(page.items[0].created_at >= page.items[1].created_at);
        assert_eq!(page.next_cursor, Some("post-2".to_string()));
    }

    #[test]
    fn merge_resumes_after_cursor() {
        let author = user(1, "Jens");
        let items: Vec<FeedItem> = (1..=4)
            .map(|n| FeedItem::from_post(&post(n, &author, n as i64), &author))
            .collect();

        let first = merge(items.clone(), None, 2);
        assert_eq!(first.items[0].id, "post-4");
        assert_eq!(first.next_cursor, Some("post-3".to_string()));

        let second = merge(items, first.next_cursor.as_deref(), 2);
        assert_eq!(second.items[0].id, "post-2");
        assert_eq!(second.items[1].id, "post-1");
        assert_eq!(second.next_cursor, None);
    }

    #[test]
    fn unknown_cursor_ends_the_feed_instead_of_replaying_it() {
        let author = user(1, "Jens");
        let items: Vec<FeedItem> = (1..=5)
            .map(|n| FeedItem::from_post(&post(n, &author, n as i64), &author))
            .collect();

        // cursor for an item that has aged out of the window
        let page = merge(items, Some("post-999"), 2);

        assert!(page.items.is_empty());
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        let page = merge(Vec::new(), None, 20);
        assert!(page.items.is_empty());
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn following_scenario_two_items_newest_first() {
        // one followed user, one post and one car
        let followed = user(2, "Marta");
        let items = vec![
            FeedItem::from_post(&post(1, &followed, 10), &followed),
            FeedItem::from_car(&car(9, &followed, "E46 330i", 50), &followed),
        ];

        let page = merge(items, None, DEFAULT_LIMIT);

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, "car-9");
        assert_eq!(page.items[1].id, "post-1");
    }

    #[test]
    fn rating_activity_text_is_templated() {
        let author = user(1, "Jens");
        let rated = car(3, &author, "Supra", 0);
        let rating = Rating {
            id: 7,
            user_id: author.id,
            car_id: rated.id,
            score: 9,
            created_at: at(5),
        };

        let item = FeedItem::from_rating(&rating, &author, &rated);

        assert_eq!(item.id, "rating-7");
        assert_eq!(item.activity_text, "rated Supra 9/10");
    }

    #[test]
    fn search_matches_car_and_author_names() {
        let author = user(1, "Jens");
        let item = FeedItem::from_car(&car(5, &author, "Supra MK4", 0), &author);

        assert!(item.matches_search("supra"));
        assert!(item.matches_search("jens"));
        assert!(!item.matches_search("miata"));
    }

    #[test]
    fn search_matches_the_post_body_itself() {
        let author = user(1, "Jens");
        // post content is "first drive of the season", the activity text is
        // the constant "shared a post"
        let item = FeedItem::from_post(&post(1, &author, 0), &author);

        assert!(item.matches_search("season"));
        assert!(!item.matches_search("winter"));
    }

    #[test]
    fn limit_clamps_into_allowed_range() {
        assert_eq!(clamp_limit(None), DEFAULT_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(500)), MAX_LIMIT);
        assert_eq!(clamp_limit(Some(35)), 35);
    }
}
