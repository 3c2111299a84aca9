//! Full-stack tests over the SQLite backend: schema bootstrap, seeds,
//! the film join aggregation, edge uniqueness constraints and cascade
//! deletes.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use cinetrack::db::Database;
use cinetrack::models::{CreateFilm, CreateUser, UpdateFilm};
use cinetrack::services::{EntityValidator, FilmService, ReferenceService, UserService};
use cinetrack::store::{FilmStore, FriendshipStore, GenreStore, LikeStore, RatingStore, UserStore};
use cinetrack::{Config, Error};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

async fn database() -> Database {
    init_tracing();
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    let db = Database::connect_with(&config).await.unwrap();
    db.init().await.unwrap();
    db
}

fn services(db: &Database) -> (FilmService, UserService) {
    let films: Arc<dyn FilmStore> = Arc::new(db.films());
    let users: Arc<dyn UserStore> = Arc::new(db.users());
    let genres: Arc<dyn GenreStore> = Arc::new(db.genres());
    let ratings: Arc<dyn RatingStore> = Arc::new(db.ratings());
    let friendships: Arc<dyn FriendshipStore> = Arc::new(db.friendships());
    let likes: Arc<dyn LikeStore> = Arc::new(db.likes());

    let validator = EntityValidator::new(
        films.clone(),
        users.clone(),
        genres.clone(),
        ratings.clone(),
    );
    (
        FilmService::new(films, likes, validator.clone()),
        UserService::new(users, friendships, validator),
    )
}

fn create_film_input(name: &str, genre_ids: Vec<i64>) -> CreateFilm {
    CreateFilm {
        name: name.to_string(),
        description: format!("About {name}"),
        release_date: NaiveDate::from_ymd_opt(2010, 7, 16).unwrap(),
        duration: 148,
        rating_id: 3,
        genre_ids,
    }
}

async fn register(users: &UserService, login: &str) -> i64 {
    users
        .register_user(CreateUser {
            email: format!("{login}@example.com"),
            login: login.to_string(),
            name: None,
            birthday: NaiveDate::from_ymd_opt(1980, 1, 30).unwrap(),
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn seeds_provide_reference_genres_and_ratings() {
    let db = database().await;

    let genres = db.genres().list().await.unwrap();
    let ratings = db.ratings().list().await.unwrap();

    assert_eq!(genres.len(), 6);
    assert_eq!(ratings.len(), 5);
    assert_eq!(genres[0].name, "Comedy");
    assert_eq!(ratings[2].name, "PG-13");

    // Seeding again must not duplicate or clobber rows.
    db.init().await.unwrap();
    assert_eq!(db.genres().list().await.unwrap().len(), 6);
}

#[tokio::test]
async fn reference_lookups_resolve_seeded_rows() {
    let db = database().await;
    let reference = ReferenceService::new(Arc::new(db.genres()), Arc::new(db.ratings()));

    assert_eq!(reference.get_genre(2).await.unwrap().name, "Drama");
    assert_eq!(reference.get_rating(5).await.unwrap().name, "NC-17");
    assert_matches!(
        reference.get_genre(42).await,
        Err(Error::NotFound { id: 42, .. })
    );
    assert_matches!(
        reference.get_rating(42).await,
        Err(Error::NotFound { id: 42, .. })
    );
    assert_eq!(reference.list_ratings().await.unwrap().len(), 5);
}

#[tokio::test]
async fn films_round_trip_with_ordered_deduplicated_genres() {
    let db = database().await;
    let (films, _) = services(&db);

    let created = films
        .add_film(create_film_input("Inception", vec![4, 6, 4, 1]))
        .await
        .unwrap();

    let fetched = films.get_film(created.id).await.unwrap();
    let genre_ids: Vec<i64> = fetched.genres.iter().map(|g| g.id).collect();
    assert_eq!(genre_ids, vec![4, 6, 1]);
    assert_eq!(fetched.rating.as_ref().unwrap().name, "PG-13");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn update_replaces_all_mutable_fields() {
    let db = database().await;
    let (films, _) = services(&db);

    let created = films
        .add_film(create_film_input("Working Title", vec![1]))
        .await
        .unwrap();

    let updated = films
        .update_film(
            created.id,
            UpdateFilm {
                name: "Final Title".to_string(),
                description: "Recut".to_string(),
                release_date: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
                duration: 150,
                rating_id: 4,
                genre_ids: vec![2, 5],
            },
        )
        .await
        .unwrap();

    let fetched = films.get_film(created.id).await.unwrap();
    assert_eq!(fetched, updated);
    assert_eq!(fetched.name, "Final Title");
    assert_eq!(fetched.rating.as_ref().unwrap().id, 4);
    let genre_ids: Vec<i64> = fetched.genres.iter().map(|g| g.id).collect();
    assert_eq!(genre_ids, vec![2, 5]);
}

#[tokio::test]
async fn films_without_genres_still_aggregate() {
    let db = database().await;
    let (films, _) = services(&db);

    let created = films
        .add_film(create_film_input("Bare", vec![]))
        .await
        .unwrap();

    let fetched = films.get_film(created.id).await.unwrap();
    assert!(fetched.genres.is_empty());

    let listed = films.list_films().await.unwrap();
    assert_eq!(listed, vec![fetched]);
}

#[tokio::test]
async fn unresolved_references_fail_film_registration() {
    let db = database().await;
    let (films, _) = services(&db);

    let mut bad_rating = create_film_input("X", vec![1]);
    bad_rating.rating_id = 99;
    assert_matches!(
        films.add_film(bad_rating).await,
        Err(Error::NotFound { id: 99, .. })
    );

    assert_matches!(
        films.add_film(create_film_input("Y", vec![99])).await,
        Err(Error::NotFound { id: 99, .. })
    );
}

#[tokio::test]
async fn deleting_a_film_cascades_to_its_like_edges() {
    let db = database().await;
    let (films, users) = services(&db);

    let film = films
        .add_film(create_film_input("Doomed", vec![2]))
        .await
        .unwrap();
    let user = register(&users, "viewer").await;
    films.add_like(film.id, user).await.unwrap();

    films.delete_film(film.id).await.unwrap();

    assert_matches!(
        films.get_film(film.id).await,
        Err(Error::NotFound { .. })
    );
    assert!(db.likes().users_for_film(film.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_user_cascades_to_friendships_and_likes() {
    let db = database().await;
    let (films, users) = services(&db);

    let a = register(&users, "alice").await;
    let b = register(&users, "bob").await;
    let film = films
        .add_film(create_film_input("Shared", vec![1]))
        .await
        .unwrap();

    users.send_friend_request(a, b).await.unwrap();
    users.accept_friend_request(b, a).await.unwrap();
    films.add_like(film.id, a).await.unwrap();

    users.delete_user(a).await.unwrap();

    assert!(users.friends_of(b).await.unwrap().is_empty());
    assert!(db.likes().users_for_film(film.id).await.unwrap().is_empty());
    assert_eq!(db.friendships().find(b, a).await.unwrap(), None);
}

#[tokio::test]
async fn friendship_uniqueness_is_enforced_by_the_table() {
    let db = database().await;
    let (_, users) = services(&db);

    let a = register(&users, "alice").await;
    let b = register(&users, "bob").await;

    // Drive the repository directly, past the service pre-checks, so
    // the composite primary key is what rejects the duplicate.
    db.friendships().insert_pending(a, b).await.unwrap();
    assert_matches!(
        db.friendships().insert_pending(a, b).await,
        Err(Error::FriendRequestExists { .. })
    );
}

#[tokio::test]
async fn like_uniqueness_is_enforced_by_the_table() {
    let db = database().await;
    let (films, users) = services(&db);

    let film = films
        .add_film(create_film_input("Liked", vec![1]))
        .await
        .unwrap();
    let user = register(&users, "viewer").await;

    db.likes().add(film.id, user).await.unwrap();
    assert_matches!(
        db.likes().add(film.id, user).await,
        Err(Error::AlreadyLiked { .. })
    );
    assert_eq!(db.likes().users_for_film(film.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn top_films_rank_by_count_then_ascending_id() {
    let db = database().await;
    let (films, users) = services(&db);

    let f1 = films
        .add_film(create_film_input("One", vec![1]))
        .await
        .unwrap()
        .id;
    let f2 = films
        .add_film(create_film_input("Two", vec![1]))
        .await
        .unwrap()
        .id;
    let f3 = films
        .add_film(create_film_input("Three", vec![1]))
        .await
        .unwrap()
        .id;

    let u1 = register(&users, "u1").await;
    let u2 = register(&users, "u2").await;

    // f2 and f3 tie on one like; f1 leads with two; ties resolve to
    // the lower film id.
    films.add_like(f1, u1).await.unwrap();
    films.add_like(f1, u2).await.unwrap();
    films.add_like(f3, u1).await.unwrap();
    films.add_like(f2, u2).await.unwrap();

    let top: Vec<i64> = films
        .most_liked(None)
        .await
        .unwrap()
        .iter()
        .map(|f| f.id)
        .collect();
    assert_eq!(top, vec![f1, f2, f3]);
}

#[tokio::test]
async fn film_ids_are_not_reused_after_delete() {
    let db = database().await;
    let (films, _) = services(&db);

    let first = films
        .add_film(create_film_input("First", vec![]))
        .await
        .unwrap();
    films.delete_film(first.id).await.unwrap();

    let second = films
        .add_film(create_film_input("Second", vec![]))
        .await
        .unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn display_name_defaults_to_login_on_registration() {
    let db = database().await;
    let (_, users) = services(&db);

    let user = users
        .register_user(CreateUser {
            email: "quiet@example.com".to_string(),
            login: "quiet".to_string(),
            name: Some("   ".to_string()),
            birthday: NaiveDate::from_ymd_opt(1975, 5, 5).unwrap(),
        })
        .await
        .unwrap();

    assert_eq!(user.name, "quiet");
    assert_eq!(users.get_user(user.id).await.unwrap().name, "quiet");
}
