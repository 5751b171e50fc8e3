//! In-memory repositories for service tests.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::database::models::{Actor, ActorWithFilms, Film, FilmInput, Gender, NewActor, Role, User};
use crate::database::{ActorRepository, FilmRepository, RepositoryError, UserRepository};
use crate::filter::{ActorsFilter, FilmFilter, FilmSortField, Pagination, SortDirection};

#[derive(Default)]
struct State {
    next_id: i32,
    users: Vec<User>,
    actors: BTreeMap<i32, Actor>,
    films: BTreeMap<i32, Film>,
    /// `(film_id, actor_id)` pairs.
    links: BTreeSet<(i32, i32)>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn check_links(&self, film_id: i32, actor_ids: &[i32]) -> Result<(), RepositoryError> {
        let mut seen = BTreeSet::new();
        for &actor_id in actor_ids {
            if !self.actors.contains_key(&actor_id) {
                return Err(RepositoryError::NotFound("actor"));
            }
            if !seen.insert(actor_id) || self.links.contains(&(film_id, actor_id)) {
                return Err(RepositoryError::DuplicateActors);
            }
        }
        Ok(())
    }

    fn actor_mut(&mut self, id: i32) -> Result<&mut Actor, RepositoryError> {
        self.actors.get_mut(&id).ok_or(RepositoryError::NotFound("actor"))
    }

    fn film_mut(&mut self, id: i32) -> Result<&mut Film, RepositoryError> {
        self.films.get_mut(&id).ok_or(RepositoryError::NotFound("film"))
    }
}

/// Implements every repository trait over plain collections and counts
/// how many repository calls it served.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    pub fn user(&self, login: &str) -> Option<User> {
        self.lock().users.iter().find(|u| u.login == login).cloned()
    }

    /// Seeds a film without going through the repository API.
    pub fn insert_film(&self, name: &str) -> i32 {
        let mut state = self.lock();
        let id = state.next_id();
        state.films.insert(
            id,
            Film {
                id,
                name: name.to_string(),
                description: String::new(),
                release_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
                rating: 5,
            },
        );
        id
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn enter(&self) -> std::sync::MutexGuard<'_, State> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        self.lock()
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn page<T>(items: Vec<T>, pagination: &Pagination) -> Vec<T> {
    items
        .into_iter()
        .skip(pagination.offset() as usize)
        .take(pagination.limit() as usize)
        .collect()
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn add_user(&self, login: &str, password_hash: &str, role: Role) -> Result<User, RepositoryError> {
        let mut state = self.enter();
        if state.users.iter().any(|u| u.login == login) {
            return Err(RepositoryError::AlreadyExists("user"));
        }
        let user = User {
            id: state.next_id(),
            login: login.to_string(),
            password_hash: password_hash.to_string(),
            role,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn user_by_login(&self, login: &str) -> Result<User, RepositoryError> {
        self.enter()
            .users
            .iter()
            .find(|u| u.login == login)
            .cloned()
            .ok_or(RepositoryError::NotFound("user"))
    }
}

#[async_trait]
impl ActorRepository for MemoryStore {
    async fn add_actor(&self, actor: &NewActor) -> Result<i32, RepositoryError> {
        let mut state = self.enter();
        let id = state.next_id();
        state.actors.insert(
            id,
            Actor {
                id,
                full_name: actor.full_name.clone(),
                gender: actor.gender,
                birthday: actor.birthday,
            },
        );
        Ok(id)
    }

    async fn add_actors_to_film(&self, film_id: i32, actor_ids: &[i32]) -> Result<(), RepositoryError> {
        let mut state = self.enter();
        if actor_ids.is_empty() {
            return Ok(());
        }
        if !state.films.contains_key(&film_id) {
            return Err(RepositoryError::NotFound("film"));
        }
        state.check_links(film_id, actor_ids)?;
        state.links.extend(actor_ids.iter().map(|&a| (film_id, a)));
        Ok(())
    }

    async fn update_actor_full_name(&self, id: i32, full_name: &str) -> Result<(), RepositoryError> {
        self.enter().actor_mut(id)?.full_name = full_name.to_string();
        Ok(())
    }

    async fn update_actor_gender(&self, id: i32, gender: Gender) -> Result<(), RepositoryError> {
        self.enter().actor_mut(id)?.gender = gender;
        Ok(())
    }

    async fn update_actor_birthday(&self, id: i32, birthday: NaiveDate) -> Result<(), RepositoryError> {
        self.enter().actor_mut(id)?.birthday = birthday;
        Ok(())
    }

    async fn update_actor(&self, id: i32, actor: &NewActor) -> Result<(), RepositoryError> {
        let mut state = self.enter();
        let stored = state.actor_mut(id)?;
        stored.full_name = actor.full_name.clone();
        stored.gender = actor.gender;
        stored.birthday = actor.birthday;
        Ok(())
    }

    async fn delete_actor(&self, id: i32) -> Result<(), RepositoryError> {
        let mut state = self.enter();
        state.actors.remove(&id).ok_or(RepositoryError::NotFound("actor"))?;
        state.links.retain(|&(_, actor_id)| actor_id != id);
        Ok(())
    }

    async fn delete_actor_from_film(&self, actor_id: i32, film_id: i32) -> Result<(), RepositoryError> {
        if self.enter().links.remove(&(film_id, actor_id)) {
            Ok(())
        } else {
            Err(RepositoryError::NotFound("actor"))
        }
    }

    async fn actors_with_films(&self, filter: &ActorsFilter) -> Result<Vec<ActorWithFilms>, RepositoryError> {
        let state = self.enter();

        // One row per (actor, film) pair, or a single film-less row.
        let mut rows: Vec<(&Actor, Option<&Film>)> = Vec::new();
        for actor in state.actors.values() {
            if !contains(&actor.full_name, &filter.full_name_contains) {
                continue;
            }
            let films: Vec<&Film> = state
                .films
                .values()
                .filter(|f| state.links.contains(&(f.id, actor.id)))
                .collect();
            if films.is_empty() {
                rows.push((actor, None));
            } else {
                rows.extend(films.into_iter().map(|f| (actor, Some(f))));
            }
        }

        let mut grouped: Vec<ActorWithFilms> = Vec::new();
        for (actor, film) in page(rows, &filter.pagination) {
            if grouped.last().map(|g| g.actor.id) != Some(actor.id) {
                grouped.push(ActorWithFilms { actor: actor.clone(), films: Vec::new() });
            }
            if let (Some(film), Some(last)) = (film, grouped.last_mut()) {
                last.films.push(film.clone());
            }
        }
        Ok(grouped)
    }
}

#[async_trait]
impl FilmRepository for MemoryStore {
    async fn add_film(&self, film: &FilmInput, actor_ids: &[i32]) -> Result<i32, RepositoryError> {
        let mut state = self.enter();
        if state.films.values().any(|f| f.name == film.name) {
            return Err(RepositoryError::AlreadyExists("film"));
        }
        let id = state.next_id();
        state.check_links(id, actor_ids)?;
        state.films.insert(
            id,
            Film {
                id,
                name: film.name.clone(),
                description: film.description.clone(),
                release_date: film.release_date,
                rating: film.rating,
            },
        );
        state.links.extend(actor_ids.iter().map(|&a| (id, a)));
        Ok(id)
    }

    async fn update_film_name(&self, id: i32, name: &str) -> Result<(), RepositoryError> {
        let mut state = self.enter();
        if state.films.values().any(|f| f.name == name && f.id != id) {
            return Err(RepositoryError::AlreadyExists("film"));
        }
        state.film_mut(id)?.name = name.to_string();
        Ok(())
    }

    async fn update_film_description(&self, id: i32, description: &str) -> Result<(), RepositoryError> {
        self.enter().film_mut(id)?.description = description.to_string();
        Ok(())
    }

    async fn update_film_release_date(&self, id: i32, release_date: NaiveDate) -> Result<(), RepositoryError> {
        self.enter().film_mut(id)?.release_date = release_date;
        Ok(())
    }

    async fn update_film_rating(&self, id: i32, rating: i32) -> Result<(), RepositoryError> {
        self.enter().film_mut(id)?.rating = rating;
        Ok(())
    }

    async fn update_film(&self, id: i32, film: &FilmInput) -> Result<(), RepositoryError> {
        let mut state = self.enter();
        if state.films.values().any(|f| f.name == film.name && f.id != id) {
            return Err(RepositoryError::AlreadyExists("film"));
        }
        let stored = state.film_mut(id)?;
        stored.name = film.name.clone();
        stored.description = film.description.clone();
        stored.release_date = film.release_date;
        stored.rating = film.rating;
        Ok(())
    }

    async fn delete_film(&self, id: i32) -> Result<(), RepositoryError> {
        let mut state = self.enter();
        state.films.remove(&id).ok_or(RepositoryError::NotFound("film"))?;
        state.links.retain(|&(film_id, _)| film_id != id);
        Ok(())
    }

    async fn films(&self, filter: &FilmFilter) -> Result<Vec<Film>, RepositoryError> {
        let state = self.enter();
        let mut films: Vec<Film> = state
            .films
            .values()
            .filter(|f| contains(&f.name, &filter.name_contains))
            .filter(|f| {
                filter.actor_name_contains.is_empty()
                    || state.links.iter().any(|&(film_id, actor_id)| {
                        film_id == f.id
                            && state
                                .actors
                                .get(&actor_id)
                                .is_some_and(|a| contains(&a.full_name, &filter.actor_name_contains))
                    })
            })
            .cloned()
            .collect();

        films.sort_by(|a, b| {
            let ord = match filter.order_by {
                FilmSortField::Name => a.name.cmp(&b.name),
                FilmSortField::Rating => a.rating.cmp(&b.rating),
                FilmSortField::ReleaseDate => a.release_date.cmp(&b.release_date),
            };
            let ord = match filter.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            match ord {
                Ordering::Equal => a.id.cmp(&b.id),
                other => other,
            }
        });

        Ok(page(films, &filter.pagination))
    }
}
