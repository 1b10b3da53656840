//! The signed-in user, persisted across reloads.

use std::rc::Rc;

use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::{Store, Subscription};
use crate::core::storage::{self, KeyValueStore};

/// Storage key holding the JSON-encoded [`UserState`].
pub const USER_STORAGE_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(deserialize_with = "id_as_string")]
    pub org_id: String,
    #[serde(default)]
    pub org_name: Option<String>,
    #[serde(default)]
    pub role_in_org: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discipline {
    #[serde(deserialize_with = "id_as_number")]
    pub discipline_id: i64,
    #[serde(default)]
    pub discipline_code: Option<String>,
    #[serde(default)]
    pub discipline_name: Option<String>,
    #[serde(default)]
    pub is_primary: Option<bool>,
}

impl Discipline {
    pub fn is_primary(&self) -> bool {
        self.is_primary.unwrap_or(false)
    }
}

/// Identity plus the UI's current discipline/organization selection.
///
/// The all-empty value (no id, no email, no orgs, no roles) means signed out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub orgs: Vec<Organization>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub disciplines: Vec<Discipline>,
    #[serde(default, rename = "currentDiscipline")]
    pub current_discipline: Option<Discipline>,
    #[serde(default, rename = "currentOrg")]
    pub current_org: Option<Organization>,
}

impl UserState {
    pub fn is_logged_out(&self) -> bool {
        self.user_id.is_none() && self.email.is_none() && self.orgs.is_empty() && self.roles.is_empty()
    }

    /// Primary-flagged discipline, else the first one.
    pub fn default_discipline(&self) -> Option<&Discipline> {
        self.disciplines
            .iter()
            .find(|d| d.is_primary())
            .or_else(|| self.disciplines.first())
    }

    pub fn default_org(&self) -> Option<&Organization> {
        self.orgs.first()
    }

    fn has_discipline(&self, id: i64) -> bool {
        self.disciplines.iter().any(|d| d.discipline_id == id)
    }

    fn has_org(&self, id: &str) -> bool {
        self.orgs.iter().any(|o| o.org_id == id)
    }

    /// Keep selections that still point into their lists; replace the rest
    /// with the defaults (or clear them when the list is empty).
    pub fn with_valid_selections(mut self) -> Self {
        let discipline_ok = self
            .current_discipline
            .as_ref()
            .is_some_and(|d| self.has_discipline(d.discipline_id));
        if !discipline_ok {
            self.current_discipline = self.default_discipline().cloned();
        }

        let org_ok = self
            .current_org
            .as_ref()
            .is_some_and(|o| self.has_org(&o.org_id));
        if !org_ok {
            self.current_org = self.default_org().cloned();
        }

        self
    }
}

/// Reactive user state, hydrated from and persisted to a [`KeyValueStore`].
#[derive(Clone)]
pub struct UserStore {
    state: Store<UserState>,
    _persist: Rc<Subscription>,
}

impl PartialEq for UserStore {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl UserStore {
    /// Hydrate from `storage` and write every later change back to it.
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Self {
        let stored: Option<UserState> = storage::load_json(storage.as_ref(), USER_STORAGE_KEY);
        let state = Store::new(stored.unwrap_or_default().with_valid_selections());

        let persistence = state.subscribe(move |user: &UserState| persist(storage.as_ref(), user));

        Self {
            state,
            _persist: Rc::new(persistence),
        }
    }

    pub fn state(&self) -> &Store<UserState> {
        &self.state
    }

    pub fn get(&self) -> UserState {
        self.state.get()
    }

    /// Replace the state. Selections that are not in their lists are
    /// repaired before anyone sees them.
    pub fn set(&self, user: UserState) {
        self.state.set(user.with_valid_selections());
    }

    pub fn update(&self, f: impl FnOnce(&mut UserState)) {
        self.state.update(|user| {
            f(user);
            *user = std::mem::take(user).with_valid_selections();
        });
    }

    pub fn subscribe(&self, f: impl Fn(&UserState) + 'static) -> Subscription {
        self.state.subscribe(f)
    }

    pub fn sign_in(&self, user: UserState) {
        self.state.set(user.with_valid_selections());
    }

    pub fn sign_out(&self) {
        self.state.set(UserState::default());
    }

    /// Select a discipline by id. Unknown ids fall back to the primary (or
    /// first) discipline. Returns the resulting selection.
    pub fn set_current_discipline_by_id(&self, discipline_id: i64) -> Option<Discipline> {
        self.state.update(|user| {
            let found = user
                .disciplines
                .iter()
                .find(|d| d.discipline_id == discipline_id)
                .or_else(|| user.default_discipline())
                .cloned();
            user.current_discipline = found.clone();
            found
        })
    }

    /// Select an organization by id. Unknown ids fall back to the first org.
    pub fn set_current_org_by_id(&self, org_id: &str) -> Option<Organization> {
        self.state.update(|user| {
            let found = user
                .orgs
                .iter()
                .find(|o| o.org_id == org_id)
                .or_else(|| user.default_org())
                .cloned();
            user.current_org = found.clone();
            found
        })
    }

    /// Make sure a valid discipline is selected. No-op (and no notification)
    /// when the current one is still listed.
    pub fn ensure_current_discipline(&self) {
        let valid = self.state.with(|user| {
            user.current_discipline
                .as_ref()
                .is_some_and(|d| user.has_discipline(d.discipline_id))
        });
        if !valid {
            self.state.update(|user| {
                user.current_discipline = user.default_discipline().cloned();
            });
        }
    }

    pub fn ensure_current_org(&self) {
        let valid = self.state.with(|user| {
            user.current_org
                .as_ref()
                .is_some_and(|o| user.has_org(&o.org_id))
        });
        if !valid {
            self.state.update(|user| {
                user.current_org = user.default_org().cloned();
            });
        }
    }
}

fn persist(storage: &dyn KeyValueStore, user: &UserState) {
    let result = if user.is_logged_out() {
        storage.remove(USER_STORAGE_KEY)
    } else {
        storage::save_json(storage, USER_STORAGE_KEY, user)
    };

    if let Err(err) = result {
        warn!(target: "kaizen::stores::user", %err, "could not persist user state");
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

fn id_as_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match RawId::deserialize(deserializer)? {
        RawId::Int(n) => Ok(n),
        RawId::Float(n) if n.fract() == 0.0 => Ok(n as i64),
        RawId::Float(n) => Err(de::Error::custom(format!("non-integer id {n}"))),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("non-numeric id {s:?}"))),
    }
}
