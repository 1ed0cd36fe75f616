use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct Photo {
    pub id: i32,
    pub user_id: i32,
    pub car_id: Option<i32>,
    pub caption: Option<String>,
    pub is_public: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct PhotoRating {
    pub id: i32,
    pub photo_id: i32,
    pub user_id: i32,
    pub score: i32,
    pub created_at: NaiveDateTime,
}

impl Photo {
    pub fn recent_public(conn: &mut PgConnection, window: i64) -> QueryResult<Vec<Photo>> {
        use crate::schema::photos::dsl::*;
        photos
            .filter(is_public.eq(true))
            .order(created_at.desc())
            .limit(window)
            .load::<Photo>(conn)
    }

    pub fn recent_from_circle(
        conn: &mut PgConnection,
        user_ids: &[i32],
        car_ids: &[i32],
        window: i64,
    ) -> QueryResult<Vec<Photo>> {
        use crate::schema::photos::dsl::*;

        let car_ids_in: Vec<Option<i32>> = car_ids.iter().map(|c| Some(*c)).collect();
        photos
            .filter(is_public.eq(true))
            .filter(user_id.eq_any(user_ids.to_vec()).or(car_id.eq_any(car_ids_in)))
            .order(created_at.desc())
            .limit(window)
            .load::<Photo>(conn)
    }
}

impl PhotoRating {
    pub fn for_photos(conn: &mut PgConnection, photo_ids: &[i32]) -> QueryResult<Vec<PhotoRating>> {
        use crate::schema::photo_ratings::dsl::*;
        photo_ratings
            .filter(photo_id.eq_any(photo_ids.to_vec()))
            .load::<PhotoRating>(conn)
    }

    /// # average score per photo
    /// mean of the individual scores rounded to the nearest integer. photos
    /// without ratings are absent from the map.
    pub fn average_per_photo(ratings: &[PhotoRating]) -> HashMap<i32, i32> {
        let mut scores_per_photo: HashMap<i32, Vec<i32>> = HashMap::new();
        for rating in ratings {
            scores_per_photo
                .entry(rating.photo_id)
                .or_default()
                .push(rating.score);
        }

        scores_per_photo
            .into_iter()
            .map(|(photo, scores)| {
                let sum: i32 = scores.iter().sum();
                let mean = sum as f64 / scores.len() as f64;
                (photo, mean.round() as i32)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(photo_id: i32, score: i32) -> PhotoRating {
        PhotoRating {
            id: 0,
            photo_id,
            user_id: 1,
            score,
            created_at: chrono::NaiveDateTime::from_timestamp_opt(0, 0).unwrap(),
        }
    }

    #[test]
    fn average_rounds_to_nearest_integer() {
        let ratings = vec![rating(1, 3), rating(1, 4), rating(2, 10)];
        let averages = PhotoRating::average_per_photo(&ratings);

        // 3.5 rounds up
        assert_eq!(averages.get(&1), Some(&4));
        assert_eq!(averages.get(&2), Some(&10));
    }

    #[test]
    fn unrated_photo_has_no_average() {
        let averages = PhotoRating::average_per_photo(&[]);
        assert!(averages.get(&7).is_none());
    }
}
