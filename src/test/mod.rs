//! Test support. `MemoryStore` backs the service tests: each mutation runs
//! under one lock so conditional updates and pair uniqueness behave like the
//! Postgres constraints they stand in for. The `seed_*` helpers insert rows
//! for the `#[sqlx::test]` repository tests.
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::api::error;
use crate::modules::{
    friend::{
        model::{FriendRequestRow, NewFriendRequest},
        repository::{FriendRepo, FriendRepository, FriendRequestRepository},
        schema::{FriendRequestEntity, RequestStatus},
    },
    message::{model::InsertMessage, repository::MessageRepository, schema::MessageEntity},
    pantry_invite::{
        model::{NewPantryInvite, PantryInviteRow},
        repository::{PantryInviteRepo, PantryInviteRepository, PantryRepository},
        schema::{PantryEntity, PantryInviteEntity},
    },
    user::{model::UserResponse, repository::UserRepository, schema::UserEntity},
};

pub async fn seed_user(pool: &sqlx::PgPool, name: &str) -> Uuid {
    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO users (id, name, email) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(name)
        .bind(format!("{}@example.com", name.to_lowercase()))
        .execute(pool)
        .await
        .unwrap();
    id
}

pub async fn seed_pantry(pool: &sqlx::PgPool, name: &str, owner_id: Uuid) -> Uuid {
    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO pantries (id, name, owner_id) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(name)
        .bind(owner_id)
        .execute(pool)
        .await
        .unwrap();
    id
}

#[derive(Default)]
struct State {
    clock: Option<DateTime<Utc>>,
    users: HashMap<Uuid, UserEntity>,
    friend_requests: Vec<FriendRequestEntity>,
    messages: Vec<MessageEntity>,
    pantries: HashMap<Uuid, PantryEntity>,
    members: HashSet<(Uuid, Uuid)>,
    invites: Vec<PantryInviteEntity>,
    races: HashMap<Uuid, RequestStatus>,
}

impl State {
    /// Strictly increasing timestamps, so insertion order is observable.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.clock {
            Some(last) if now <= last => last + chrono::Duration::microseconds(1),
            _ => now,
        };
        self.clock = Some(next);
        next
    }

    fn profile(&self, user_id: &Uuid) -> Option<UserEntity> {
        self.users.get(user_id).cloned()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::default())
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_user(&self, name: &str) -> Uuid {
        let id = Uuid::now_v7();
        let email = format!("{}@example.com", name.to_lowercase());
        self.lock().users.insert(id, UserEntity { id, name: name.to_string(), email });
        id
    }

    pub fn add_friendship(&self, user_a: Uuid, user_b: Uuid) {
        let mut state = self.lock();
        let created_at = state.tick();
        state.friend_requests.push(FriendRequestEntity {
            id: Uuid::now_v7(),
            sender_id: user_a,
            receiver_id: user_b,
            status: RequestStatus::Accepted,
            created_at,
        });
    }

    pub fn insert_message_at(
        &self,
        id: Uuid,
        sender_id: Uuid,
        receiver_id: Uuid,
        content: &str,
        created_at: DateTime<Utc>,
    ) {
        self.lock().messages.push(MessageEntity {
            id,
            sender_id,
            receiver_id,
            content: content.to_string(),
            read: false,
            created_at,
        });
    }

    pub fn add_pantry(&self, name: &str, owner_id: Uuid) -> Uuid {
        let id = Uuid::now_v7();
        self.lock().pantries.insert(id, PantryEntity { id, name: name.to_string(), owner_id });
        id
    }

    pub fn add_member(&self, pantry_id: Uuid, user_id: Uuid) {
        self.lock().members.insert((pantry_id, user_id));
    }

    /// The next lookup of the friend request or invite `id` returns the row
    /// as it is, then a competing decision lands before the caller can act.
    pub fn decide_on_next_read(&self, id: Uuid, decision: RequestStatus) {
        self.lock().races.insert(id, decision);
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.lock().profile(id))
    }
}

#[async_trait::async_trait]
impl FriendRepository for MemoryStore {
    async fn find_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        Ok(self
            .lock()
            .friend_requests
            .iter()
            .find(|r| r.status == RequestStatus::Accepted && same_pair(r, user_id_a, user_id_b))
            .cloned())
    }

    async fn find_friends(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<UserResponse>, error::SystemError> {
        let state = self.lock();
        let ids: HashSet<Uuid> = state
            .friend_requests
            .iter()
            .filter(|r| r.status == RequestStatus::Accepted)
            .filter_map(|r| {
                if r.sender_id == *user_id {
                    Some(r.receiver_id)
                } else if r.receiver_id == *user_id {
                    Some(r.sender_id)
                } else {
                    None
                }
            })
            .collect();

        let mut friends: Vec<UserResponse> =
            ids.iter().filter_map(|id| state.profile(id)).map(UserResponse::from).collect();
        friends.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(friends)
    }
}

fn same_pair(request: &FriendRequestEntity, user_a: &Uuid, user_b: &Uuid) -> bool {
    (request.sender_id == *user_a && request.receiver_id == *user_b)
        || (request.sender_id == *user_b && request.receiver_id == *user_a)
}

fn request_row(request: &FriendRequestEntity, user: UserEntity) -> FriendRequestRow {
    FriendRequestRow {
        id: request.id,
        sender_id: request.sender_id,
        receiver_id: request.receiver_id,
        status: request.status,
        created_at: request.created_at,
        user_id: user.id,
        user_name: user.name,
        user_email: user.email,
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for MemoryStore {
    async fn find_pending_friend_request(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        Ok(self
            .lock()
            .friend_requests
            .iter()
            .find(|r| r.status.is_pending() && same_pair(r, user_id_a, user_id_b))
            .cloned())
    }

    async fn find_friend_request_by_id(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let mut state = self.lock();
        let snapshot = state.friend_requests.iter().find(|r| r.id == *request_id).cloned();

        if let Some(decision) = state.races.remove(request_id) {
            if let Some(row) = state.friend_requests.iter_mut().find(|r| r.id == *request_id) {
                row.status = decision;
            }
        }

        Ok(snapshot)
    }

    async fn find_friend_request_from_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestRow>, error::SystemError> {
        let state = self.lock();
        let mut rows: Vec<FriendRequestRow> = state
            .friend_requests
            .iter()
            .filter(|r| r.sender_id == *user_id && r.status.is_pending())
            .filter_map(|r| state.profile(&r.receiver_id).map(|u| request_row(r, u)))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn find_friend_request_to_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestRow>, error::SystemError> {
        let state = self.lock();
        let mut rows: Vec<FriendRequestRow> = state
            .friend_requests
            .iter()
            .filter(|r| r.receiver_id == *user_id && r.status.is_pending())
            .filter_map(|r| state.profile(&r.sender_id).map(|u| request_row(r, u)))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn create_friend_request(
        &self,
        request: &NewFriendRequest,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let mut state = self.lock();
        let (a, b) = (request.sender_id, request.receiver_id);

        let for_pair = |status: RequestStatus| {
            state.friend_requests.iter().any(|r| r.status == status && same_pair(r, &a, &b))
        };

        if for_pair(RequestStatus::Accepted) {
            return Ok(None);
        }
        if for_pair(RequestStatus::Pending) {
            return Err(error::SystemError::conflict("A pending friend request already exists"));
        }

        let created_at = state.tick();
        let entity = FriendRequestEntity {
            id: request.id,
            sender_id: a,
            receiver_id: b,
            status: RequestStatus::Pending,
            created_at,
        };
        state.friend_requests.push(entity.clone());
        Ok(Some(entity))
    }
}

#[async_trait::async_trait]
impl FriendRepo for MemoryStore {
    async fn decide_friend_request_atomic(
        &self,
        request_id: &Uuid,
        decision: RequestStatus,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        // lets a concurrent caller read the row before this update lands
        tokio::task::yield_now().await;

        let mut state = self.lock();
        let row = state
            .friend_requests
            .iter_mut()
            .find(|r| r.id == *request_id && r.status.is_pending());

        Ok(row.map(|r| {
            r.status = decision;
            r.clone()
        }))
    }
}

#[async_trait::async_trait]
impl MessageRepository for MemoryStore {
    async fn create(&self, message: &InsertMessage) -> Result<MessageEntity, error::SystemError> {
        let mut state = self.lock();
        let created_at = state.tick();
        let entity = MessageEntity {
            id: message.id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: message.content.clone(),
            read: false,
            created_at,
        };
        state.messages.push(entity.clone());
        Ok(entity)
    }

    async fn find_by_id(
        &self,
        message_id: &Uuid,
    ) -> Result<Option<MessageEntity>, error::SystemError> {
        Ok(self.lock().messages.iter().find(|m| m.id == *message_id).cloned())
    }

    async fn find_conversation(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Vec<MessageEntity>, error::SystemError> {
        let mut messages: Vec<MessageEntity> = self
            .lock()
            .messages
            .iter()
            .filter(|m| {
                (m.sender_id == *user_id_a && m.receiver_id == *user_id_b)
                    || (m.sender_id == *user_id_b && m.receiver_id == *user_id_a)
            })
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(messages)
    }

    async fn mark_read(
        &self,
        message_id: &Uuid,
    ) -> Result<Option<MessageEntity>, error::SystemError> {
        let mut state = self.lock();
        Ok(state.messages.iter_mut().find(|m| m.id == *message_id).map(|m| {
            m.read = true;
            m.clone()
        }))
    }

    async fn mark_conversation_read(
        &self,
        receiver_id: &Uuid,
        sender_id: &Uuid,
    ) -> Result<u64, error::SystemError> {
        let mut state = self.lock();
        let mut updated = 0;
        for m in state.messages.iter_mut() {
            if m.receiver_id == *receiver_id && m.sender_id == *sender_id && !m.read {
                m.read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn count_unread(
        &self,
        receiver_id: &Uuid,
        sender_id: &Uuid,
    ) -> Result<i64, error::SystemError> {
        let count = self
            .lock()
            .messages
            .iter()
            .filter(|m| m.receiver_id == *receiver_id && m.sender_id == *sender_id && !m.read)
            .count();
        Ok(count as i64)
    }
}

#[async_trait::async_trait]
impl PantryRepository for MemoryStore {
    async fn find_pantry_by_id(
        &self,
        pantry_id: &Uuid,
    ) -> Result<Option<PantryEntity>, error::SystemError> {
        Ok(self.lock().pantries.get(pantry_id).cloned())
    }

    async fn is_member(
        &self,
        pantry_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        Ok(self.lock().members.contains(&(*pantry_id, *user_id)))
    }
}

#[async_trait::async_trait]
impl PantryInviteRepository for MemoryStore {
    async fn find_invite_by_id(
        &self,
        invite_id: &Uuid,
    ) -> Result<Option<PantryInviteEntity>, error::SystemError> {
        let mut state = self.lock();
        let snapshot = state.invites.iter().find(|i| i.id == *invite_id).cloned();

        if let Some(decision) = state.races.remove(invite_id) {
            let decided = state.invites.iter_mut().find(|i| i.id == *invite_id).map(|i| {
                i.status = decision;
                (i.pantry_id, i.invitee_id)
            });
            if let (Some(membership), RequestStatus::Accepted) = (decided, decision) {
                state.members.insert(membership);
            }
        }

        Ok(snapshot)
    }

    async fn find_pending_invite(
        &self,
        pantry_id: &Uuid,
        invitee_id: &Uuid,
    ) -> Result<Option<PantryInviteEntity>, error::SystemError> {
        Ok(self
            .lock()
            .invites
            .iter()
            .find(|i| {
                i.pantry_id == *pantry_id && i.invitee_id == *invitee_id && i.status.is_pending()
            })
            .cloned())
    }

    async fn find_pending_invites_to_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<PantryInviteRow>, error::SystemError> {
        let state = self.lock();
        let mut rows: Vec<PantryInviteRow> = state
            .invites
            .iter()
            .filter(|i| i.invitee_id == *user_id && i.status.is_pending())
            .filter_map(|i| {
                let pantry = state.pantries.get(&i.pantry_id)?;
                let inviter = state.profile(&i.invited_by_id)?;
                Some(PantryInviteRow {
                    id: i.id,
                    pantry_id: i.pantry_id,
                    invited_by_id: i.invited_by_id,
                    invitee_id: i.invitee_id,
                    status: i.status,
                    created_at: i.created_at,
                    pantry_name: pantry.name.clone(),
                    inviter_name: inviter.name,
                    inviter_email: inviter.email,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn create_invite(
        &self,
        invite: &NewPantryInvite,
    ) -> Result<PantryInviteEntity, error::SystemError> {
        let mut state = self.lock();

        let duplicate = state.invites.iter().any(|i| {
            i.pantry_id == invite.pantry_id
                && i.invitee_id == invite.invitee_id
                && i.status.is_pending()
        });
        if duplicate {
            return Err(error::SystemError::conflict("A pending invite already exists"));
        }

        let created_at = state.tick();
        let entity = PantryInviteEntity {
            id: invite.id,
            pantry_id: invite.pantry_id,
            invited_by_id: invite.invited_by_id,
            invitee_id: invite.invitee_id,
            status: RequestStatus::Pending,
            created_at,
        };
        state.invites.push(entity.clone());
        Ok(entity)
    }
}

#[async_trait::async_trait]
impl PantryInviteRepo for MemoryStore {
    async fn accept_invite_atomic(
        &self,
        invite_id: &Uuid,
    ) -> Result<Option<PantryInviteEntity>, error::SystemError> {
        tokio::task::yield_now().await;

        let mut state = self.lock();
        let accepted = state
            .invites
            .iter_mut()
            .find(|i| i.id == *invite_id && i.status.is_pending())
            .map(|i| {
                i.status = RequestStatus::Accepted;
                i.clone()
            });

        if let Some(invite) = &accepted {
            state.members.insert((invite.pantry_id, invite.invitee_id));
        }
        Ok(accepted)
    }

    async fn reject_invite_atomic(
        &self,
        invite_id: &Uuid,
    ) -> Result<Option<PantryInviteEntity>, error::SystemError> {
        tokio::task::yield_now().await;

        let mut state = self.lock();
        let rejected = state
            .invites
            .iter_mut()
            .find(|i| i.id == *invite_id && i.status.is_pending())
            .map(|i| {
                i.status = RequestStatus::Rejected;
                i.clone()
            });
        Ok(rejected)
    }
}
